//! Observational progress sinks. Nothing reported here feeds back into the
//! totals.

use std::time::Duration;

/// Receives per-file progress while the scan runs.
///
/// `advance` is called with a percentage increment once per data row; the
/// increments for one file sum to 100. Zero-row files never see `advance`.
/// Every `begin` is closed by exactly one of `finish` (the file was totalled)
/// or `abandon` (a row was unreadable and the file is skipped).
pub trait ProgressReporter {
    fn begin(&mut self, _file_name: &str) {}
    fn advance(&mut self, _increment: f64) {}
    fn finish(&mut self) {}
    fn abandon(&mut self) {}
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl ProgressReporter for Silent {}

/// Wraps another reporter and sleeps after each row. Purely cosmetic.
pub struct Paced<R> {
    inner: R,
    delay: Duration,
}

impl<R: ProgressReporter> Paced<R> {
    pub fn new(inner: R, delay: Duration) -> Self {
        Self { inner, delay }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R: ProgressReporter> ProgressReporter for Paced<R> {
    fn begin(&mut self, file_name: &str) {
        self.inner.begin(file_name);
    }

    fn advance(&mut self, increment: f64) {
        self.inner.advance(increment);
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
    }

    fn finish(&mut self) {
        self.inner.finish();
    }

    fn abandon(&mut self) {
        self.inner.abandon();
    }
}

/// Records every event; handy for assertions.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Recorder {
    pub events: Vec<ProgressEvent>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    Begin(String),
    Advance(f64),
    Finish,
    Abandon,
}

impl Recorder {
    /// Event that closed the last run of `file_name`, if any.
    pub fn outcome_for(&self, file_name: &str) -> Option<&ProgressEvent> {
        let mut current = None;
        let mut outcome = None;
        for event in &self.events {
            match event {
                ProgressEvent::Begin(name) => current = Some(name.as_str()),
                ProgressEvent::Finish | ProgressEvent::Abandon => {
                    if current == Some(file_name) {
                        outcome = Some(event);
                    }
                    current = None;
                }
                ProgressEvent::Advance(_) => {}
            }
        }
        outcome
    }

    /// Increments reported for `file_name`.
    pub fn increments_for(&self, file_name: &str) -> Vec<f64> {
        let mut current = None;
        let mut increments = Vec::new();
        for event in &self.events {
            match event {
                ProgressEvent::Begin(name) => current = Some(name.as_str()),
                ProgressEvent::Advance(step) if current == Some(file_name) => {
                    increments.push(*step)
                }
                ProgressEvent::Finish | ProgressEvent::Abandon => current = None,
                ProgressEvent::Advance(_) => {}
            }
        }
        increments
    }
}

impl ProgressReporter for Recorder {
    fn begin(&mut self, file_name: &str) {
        self.events.push(ProgressEvent::Begin(file_name.to_string()));
    }

    fn advance(&mut self, increment: f64) {
        self.events.push(ProgressEvent::Advance(increment));
    }

    fn finish(&mut self) {
        self.events.push(ProgressEvent::Finish);
    }

    fn abandon(&mut self) {
        self.events.push(ProgressEvent::Abandon);
    }
}
