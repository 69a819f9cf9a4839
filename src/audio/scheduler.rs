//! Repeating step timer for the playback loop
//!
//! Holds at most one pending step. The owner asks for the deadline, waits until
//! it passes (or something else happens), then takes the due step and decides
//! whether to re-arm it. Which run of the loop a step belongs to is carried by
//! its [`StepToken`]; the timer itself never checks it.

use std::time::{Duration, Instant};
use warmup_core::StepToken;

/// A step waiting for its deadline
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledStep {
    pub token: StepToken,
    pub due: Instant,
}

pub struct Scheduler {
    interval: Duration,
    pending: Option<ScheduledStep>,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Schedule the first step of a run to fire right away
    ///
    /// Replaces any step that was still pending.
    pub fn arm(&mut self, token: StepToken) {
        self.arm_at(token, Instant::now());
    }

    pub fn arm_at(&mut self, token: StepToken, due: Instant) {
        self.pending = Some(ScheduledStep { token, due });
    }

    /// Schedule the step after `fired`, one interval after its deadline
    ///
    /// If the loop fell more than an interval behind, the next step is due
    /// immediately instead of bursting to catch up.
    pub fn rearm(&mut self, fired: ScheduledStep, now: Instant) {
        let due = (fired.due + self.interval).max(now);
        self.pending = Some(ScheduledStep {
            token: fired.token,
            due,
        });
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|step| step.due)
    }

    /// Take the pending step if its deadline has passed
    pub fn take_due(&mut self, now: Instant) -> Option<ScheduledStep> {
        match self.pending {
            Some(step) if step.due <= now => self.pending.take(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(600);

    #[test]
    fn test_arm_is_due_immediately() {
        let mut scheduler = Scheduler::new(INTERVAL);
        assert!(!scheduler.is_armed());

        let now = Instant::now();
        scheduler.arm_at(StepToken::from_raw(1), now);
        assert_eq!(scheduler.deadline(), Some(now));

        let step = scheduler.take_due(now).expect("due now");
        assert_eq!(step.token, StepToken::from_raw(1));
        assert!(!scheduler.is_armed());
    }

    #[test]
    fn test_not_due_before_deadline() {
        let mut scheduler = Scheduler::new(INTERVAL);
        let now = Instant::now();
        scheduler.arm_at(StepToken::from_raw(1), now + INTERVAL);

        assert!(scheduler.take_due(now).is_none());
        assert!(scheduler.is_armed());
    }

    #[test]
    fn test_rearm_keeps_cadence() {
        let mut scheduler = Scheduler::new(INTERVAL);
        let start = Instant::now();
        scheduler.arm_at(StepToken::from_raw(7), start);

        // fired a little late; the next deadline still lines up with the grid
        let late = start + Duration::from_millis(15);
        let fired = scheduler.take_due(late).unwrap();
        scheduler.rearm(fired, late);

        assert_eq!(scheduler.deadline(), Some(start + INTERVAL));
        assert_eq!(scheduler.take_due(late), None);
    }

    #[test]
    fn test_rearm_after_stall_does_not_burst() {
        let mut scheduler = Scheduler::new(INTERVAL);
        let start = Instant::now();
        scheduler.arm_at(StepToken::from_raw(1), start);

        let stalled = start + Duration::from_secs(3);
        let fired = scheduler.take_due(stalled).unwrap();
        scheduler.rearm(fired, stalled);
        assert_eq!(scheduler.deadline(), Some(stalled));
    }

    #[test]
    fn test_arm_replaces_pending() {
        let mut scheduler = Scheduler::new(INTERVAL);
        let now = Instant::now();
        scheduler.arm_at(StepToken::from_raw(1), now + INTERVAL);
        scheduler.arm_at(StepToken::from_raw(2), now);

        assert_eq!(scheduler.take_due(now).unwrap().token, StepToken::from_raw(2));
        assert_eq!(scheduler.deadline(), None);
    }
}
