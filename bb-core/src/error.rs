//! Error types, re-exported from bb-error

pub use bb_error::{BoardError, Result};
