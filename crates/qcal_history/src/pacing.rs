//! Pacing between remote calls
//!
//! Gantree: L3_History → Pacer

use qcal_core::constants::walker::DEFAULT_PACING_MS;
use std::fmt;
use std::time::Duration;

/// Pause policy applied after every walker step
/// Gantree: Pacer // 호출 간격
pub trait Pacer {
    /// Block until the next step may start
    fn pause(&self);
}

/// Sleep for a fixed interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay {
    /// Interval between steps
    pub delay: Duration,
}

impl FixedDelay {
    /// Create pacer sleeping `millis` milliseconds
    pub fn from_millis(millis: u64) -> Self {
        Self {
            delay: Duration::from_millis(millis),
        }
    }
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self::from_millis(DEFAULT_PACING_MS)
    }
}

impl Pacer for FixedDelay {
    fn pause(&self) {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
    }
}

impl fmt::Display for FixedDelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedDelay({}ms)", self.delay.as_millis())
    }
}

/// Never pause
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoDelay;

impl Pacer for NoDelay {
    fn pause(&self) {}
}

impl<P: Pacer + ?Sized> Pacer for &P {
    fn pause(&self) {
        (**self).pause()
    }
}

impl<P: Pacer + ?Sized> Pacer for Box<P> {
    fn pause(&self) {
        (**self).pause()
    }
}
