//! Capture device implementations

use crate::scanner::CaptureDevice;
use crate::types::ScanError;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::io::{BufRead, BufReader, Read};
use std::thread;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::debug;

/// Deterministic capture that yields a fixed code, or nothing
///
/// Stands in for a real device when none is available.
#[derive(Debug, Clone, Default)]
pub struct SimulatedCapture {
    code: Option<String>,
    active: bool,
}

impl SimulatedCapture {
    /// Simulation that always detects `code`
    pub fn with_code(code: impl Into<String>) -> Self {
        SimulatedCapture {
            code: Some(code.into()),
            active: false,
        }
    }

    /// Simulation that never detects anything
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl CaptureDevice for SimulatedCapture {
    fn start(&mut self) -> Result<(), ScanError> {
        self.active = true;
        Ok(())
    }

    fn next_code(&mut self) -> BoxFuture<'_, Result<String, ScanError>> {
        let result = self.code.clone().ok_or(ScanError::NothingDetected);
        futures::future::ready(result).boxed()
    }

    fn stop(&mut self) {
        self.active = false;
    }
}

/// Opens the byte source a [`StdinCapture`] reads lines from
type InputSource = Box<dyn Fn() -> Box<dyn Read + Send> + Send>;

/// Line read by the input thread; `None` means the source is closed
type InputLine = std::io::Result<Option<String>>;

/// Keyboard-wedge scanner: reads one line per code from standard input
///
/// Lines are read on a dedicated thread that feeds a channel, so a capture
/// that times out never waits on the terminal. Closed input makes the device
/// unavailable; a blank line means nothing was detected. A line typed after
/// `stop` is discarded.
pub struct StdinCapture {
    open: InputSource,
    lines: Option<UnboundedReceiver<InputLine>>,
}

impl StdinCapture {
    pub fn new() -> Self {
        Self::with_input(|| Box::new(std::io::stdin()))
    }

    /// Read lines from another source, opened on every `start`
    pub fn with_input<F>(open: F) -> Self
    where
        F: Fn() -> Box<dyn Read + Send> + Send + 'static,
    {
        StdinCapture {
            open: Box::new(open),
            lines: None,
        }
    }
}

impl Default for StdinCapture {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawn the thread that forwards lines until the source closes or the
/// receiver is dropped
fn spawn_reader(source: Box<dyn Read + Send>) -> Result<UnboundedReceiver<InputLine>, ScanError> {
    let (sender, receiver) = mpsc::unbounded_channel();

    thread::Builder::new()
        .name("scanner-input".to_string())
        .spawn(move || {
            let mut reader = BufReader::new(source);
            loop {
                let mut line = String::new();
                let result = reader
                    .read_line(&mut line)
                    .map(|read| (read > 0).then_some(line));
                let finished = !matches!(result, Ok(Some(_)));
                if sender.send(result).is_err() || finished {
                    break;
                }
            }
        })
        .map_err(|e| ScanError::unavailable(e.to_string()))?;

    Ok(receiver)
}

impl CaptureDevice for StdinCapture {
    fn start(&mut self) -> Result<(), ScanError> {
        if self.lines.is_none() {
            self.lines = Some(spawn_reader((self.open)())?);
        }
        Ok(())
    }

    fn next_code(&mut self) -> BoxFuture<'_, Result<String, ScanError>> {
        async move {
            let lines = self
                .lines
                .as_mut()
                .ok_or_else(|| ScanError::unavailable("capture not started"))?;

            let line = match lines.recv().await {
                Some(Ok(Some(line))) => line,
                Some(Ok(None)) | None => return Err(ScanError::unavailable("input closed")),
                Some(Err(e)) => return Err(ScanError::unavailable(e.to_string())),
            };

            let code = line.trim();
            debug!(bytes = line.len(), "line read from scanner input");
            if code.is_empty() {
                Err(ScanError::NothingDetected)
            } else {
                Ok(code.to_string())
            }
        }
        .boxed()
    }

    fn stop(&mut self) {
        self.lines = None;
    }
}
