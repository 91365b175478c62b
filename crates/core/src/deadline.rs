//! A monotonic deadline shared by the Myers and DP algorithms (spec §5).
//!
//! `max_computation_time_ms == 0` means unlimited; everything else is converted into an absolute
//! `Instant` once per [`crate::compute_diff`] call and threaded down into whichever raw algorithm
//! runs. Checked only between outer iterations (once per `d` in Myers, once per row in DP) —
//! never in the inner snake/cell loops, per the "no dynamic dispatch in hot loops" design note
//! (a deadline check is cheap, but checking it per-element would still be wasted work).

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    pub fn unlimited() -> Self {
        Self { at: None }
    }

    pub fn from_millis(max_computation_time_ms: u64) -> Self {
        if max_computation_time_ms == 0 {
            Self::unlimited()
        } else {
            Self { at: Some(Instant::now() + Duration::from_millis(max_computation_time_ms)) }
        }
    }

    pub fn expired(&self) -> bool {
        match self.at {
            Some(at) => Instant::now() >= at,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_never_expires() {
        let d = Deadline::unlimited();
        assert!(!d.expired());
    }

    #[test]
    fn zero_millis_means_unlimited() {
        let d = Deadline::from_millis(0);
        assert!(!d.expired());
    }

    #[test]
    fn short_deadline_eventually_expires() {
        let d = Deadline::from_millis(1);
        std::thread::sleep(Duration::from_millis(10));
        assert!(d.expired());
    }
}
