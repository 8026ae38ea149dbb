//! Scan capture
//!
//! A capture device produces code payloads (a camera, a keyboard-wedge scanner,
//! a canned value). Capturing is a bounded wait: the device is started, asked
//! for one code, and stopped again on every exit path.
//!
//! # Resource handling
//!
//! [`ActiveCapture`] owns a started device and calls `stop()` when dropped, so
//! the device is released on success, failure, timeout, and when the capture
//! future is dropped before completion.
//!
//! # Fallback
//!
//! [`capture_with_fallback`] tries the real device once. If it is unavailable
//! or times out, the fallback device (usually a [`SimulatedCapture`]) supplies
//! the code and the outcome is flagged as simulated.

pub mod devices;

pub use devices::{SimulatedCapture, StdinCapture};

use crate::types::ScanError;
use futures::future::BoxFuture;
use std::time::Duration;
use tracing::{debug, warn};

/// Default capture window in milliseconds
pub const DEFAULT_CAPTURE_WINDOW_MS: u64 = 10_000;

/// A source of scanned codes
pub trait CaptureDevice: Send {
    /// Acquire the device
    fn start(&mut self) -> Result<(), ScanError>;

    /// Wait for the next code
    fn next_code(&mut self) -> BoxFuture<'_, Result<String, ScanError>>;

    /// Release the device; calling it on a stopped device is a no-op
    fn stop(&mut self);
}

/// Where a captured code came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureSource {
    Device,
    Simulated,
}

/// A captured code and its source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub code: String,
    pub source: CaptureSource,
}

impl ScanOutcome {
    pub fn is_simulated(&self) -> bool {
        self.source == CaptureSource::Simulated
    }
}

/// Guard over a started device
pub struct ActiveCapture<'a, D: CaptureDevice + ?Sized> {
    device: &'a mut D,
}

impl<'a, D: CaptureDevice + ?Sized> ActiveCapture<'a, D> {
    /// Start `device` and wrap it
    ///
    /// If starting fails the device is stopped before the error is returned.
    pub fn start(device: &'a mut D) -> Result<Self, ScanError> {
        if let Err(e) = device.start() {
            device.stop();
            return Err(e);
        }
        debug!("capture device started");
        Ok(ActiveCapture { device })
    }

    pub fn next_code(&mut self) -> BoxFuture<'_, Result<String, ScanError>> {
        self.device.next_code()
    }
}

impl<D: CaptureDevice + ?Sized> Drop for ActiveCapture<'_, D> {
    fn drop(&mut self) {
        self.device.stop();
        debug!("capture device stopped");
    }
}

/// Capture one code, waiting at most `window`
///
/// # Errors
///
/// Returns `ScanError::TimedOut` when the window elapses, or whatever the
/// device reports when it cannot start or read.
pub async fn capture_code<D>(device: &mut D, window: Duration) -> Result<String, ScanError>
where
    D: CaptureDevice + ?Sized,
{
    let mut capture = ActiveCapture::start(device)?;
    match tokio::time::timeout(window, capture.next_code()).await {
        Ok(result) => result,
        Err(_) => Err(ScanError::timed_out(window)),
    }
}

/// Capture from `device`, falling back to `fallback` when it is unavailable or
/// times out
///
/// The real device is tried once; there are no retries.
pub async fn capture_with_fallback<D, F>(
    device: &mut D,
    fallback: &mut F,
    window: Duration,
) -> Result<ScanOutcome, ScanError>
where
    D: CaptureDevice + ?Sized,
    F: CaptureDevice + ?Sized,
{
    match capture_code(device, window).await {
        Ok(code) => Ok(ScanOutcome {
            code,
            source: CaptureSource::Device,
        }),
        Err(e) if e.allows_fallback() => {
            warn!(error = %e, "capture device failed, using simulated capture");
            let code = capture_code(fallback, window).await?;
            Ok(ScanOutcome {
                code,
                source: CaptureSource::Simulated,
            })
        }
        Err(e) => Err(e),
    }
}
