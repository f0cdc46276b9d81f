//! Kernel platform detection
//!
//! The legacy 3.2 kernel muxes pins from board files and needs explicit
//! GPIO exports; the 3.8 kernel uses device-tree overlays.

use serde::Serialize;
use std::ffi::CStr;
use std::fs;
use std::io;
use tracing::{debug, info, warn};

use crate::constants::{kernel, paths};

/// Kernel family the board runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformVariant {
    /// OS query has not succeeded yet
    Unknown,
    /// 3.2-class kernel, board-file pin muxing
    KernelA,
    /// 3.8-class kernel, device tree
    KernelB,
    /// Any other release
    Other,
}

impl PlatformVariant {
    /// Classify a kernel release string by its leading version components
    pub fn from_release(release: &str) -> Self {
        if release.starts_with(kernel::LEGACY_PREFIX) {
            PlatformVariant::KernelA
        } else if release.starts_with(kernel::DEVICE_TREE_PREFIX) {
            PlatformVariant::KernelB
        } else {
            PlatformVariant::Other
        }
    }

    /// Pins are configured by the device tree, no export needed
    pub fn has_device_tree(&self) -> bool {
        matches!(self, PlatformVariant::KernelB | PlatformVariant::Other)
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlatformVariant::Unknown => "unknown",
            PlatformVariant::KernelA => "3.2",
            PlatformVariant::KernelB => "3.8",
            PlatformVariant::Other => "other",
        }
    }
}

/// Source of the running kernel's release string
pub trait ReleaseSource {
    fn kernel_release(&self) -> io::Result<String>;
}

impl<F> ReleaseSource for F
where
    F: Fn() -> io::Result<String>,
{
    fn kernel_release(&self) -> io::Result<String> {
        self()
    }
}

/// uname(2), falling back to /proc/sys/kernel/osrelease
#[derive(Debug, Default, Clone, Copy)]
pub struct UnameRelease;

impl ReleaseSource for UnameRelease {
    fn kernel_release(&self) -> io::Result<String> {
        // SAFETY: utsname is plain old data; uname fills it with NUL-terminated strings.
        let mut uts: libc::utsname = unsafe { std::mem::zeroed() };
        // SAFETY: uts is a valid, writable utsname.
        if unsafe { libc::uname(&mut uts) } == 0 {
            // SAFETY: release is NUL-terminated on success.
            let release = unsafe { CStr::from_ptr(uts.release.as_ptr()) };
            return Ok(release.to_string_lossy().into_owned());
        }

        let uname_err = io::Error::last_os_error();
        debug!("uname() failed: {}, trying {}", uname_err, paths::KERNEL_RELEASE);
        let release = fs::read_to_string(paths::KERNEL_RELEASE)?;
        let release = release.trim();
        if release.is_empty() {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "empty kernel release"));
        }
        Ok(release.to_string())
    }
}

/// Memoizing platform detector
///
/// Resolves once; a failed OS query leaves it `Unknown` and the next call retries.
pub struct PlatformDetector {
    source: Box<dyn ReleaseSource>,
    variant: PlatformVariant,
    release: String,
}

impl PlatformDetector {
    pub fn new(source: Box<dyn ReleaseSource>) -> Self {
        Self {
            source,
            variant: PlatformVariant::Unknown,
            release: String::new(),
        }
    }

    /// Detector backed by uname(2)
    pub fn from_uname() -> Self {
        Self::new(Box::new(UnameRelease))
    }

    /// Resolve the platform variant
    pub fn resolve(&mut self) -> PlatformVariant {
        if self.variant != PlatformVariant::Unknown {
            return self.variant;
        }

        match self.source.kernel_release() {
            Ok(release) => {
                self.variant = PlatformVariant::from_release(&release);
                self.release = truncate_release(&release);
                info!(
                    release = %self.release,
                    variant = self.variant.label(),
                    "Resolved kernel platform"
                );
            }
            Err(e) => {
                warn!("Failed to query kernel release: {}", e);
            }
        }
        self.variant
    }

    /// Last resolved variant without querying the OS
    pub fn variant(&self) -> PlatformVariant {
        self.variant
    }

    /// Raw release string for diagnostics, empty until resolved
    pub fn release(&self) -> &str {
        &self.release
    }
}

fn truncate_release(release: &str) -> String {
    if release.len() <= kernel::MAX_RELEASE_LEN {
        return release.to_string();
    }
    let mut end = kernel::MAX_RELEASE_LEN;
    while !release.is_char_boundary(end) {
        end -= 1;
    }
    release[..end].to_string()
}
