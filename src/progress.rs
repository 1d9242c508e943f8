//! Progress bookkeeping for a single move.
//!
//! `ProgressState` remembers the last value handed to observers (`was`) and the
//! latest value reported (`now`). An emission happens only when the two differ,
//! and reaching [`COMPLETE`] marks the emission as terminal.

/// Reserved value meaning "no work remains".
pub const COMPLETE: u8 = 100;

/// What observers should see after an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Emission {
    pub value: u8,
    /// True when `value` reached [`COMPLETE`]; the move must end right after.
    pub complete: bool,
}

#[derive(Debug, Default, Clone)]
pub struct ProgressState {
    now: u8,
    was: Option<u8>,
}

impl ProgressState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new value without emitting. Lower values are ignored.
    pub fn record(&mut self, now: u8) {
        self.now = self.now.max(now.min(COMPLETE));
    }

    /// Emit the recorded value if observers haven't seen it yet.
    pub fn flush(&mut self) -> Option<Emission> {
        if self.was == Some(self.now) {
            return None;
        }
        self.was = Some(self.now);
        Some(Emission {
            value: self.now,
            complete: self.now == COMPLETE,
        })
    }

    /// `record` followed by `flush`.
    pub fn advance(&mut self, now: u8) -> Option<Emission> {
        self.record(now);
        self.flush()
    }

    pub fn now(&self) -> u8 {
        self.now
    }

    pub fn was(&self) -> Option<u8> {
        self.was
    }
}
