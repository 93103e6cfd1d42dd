//! Status poller: owns the single recurring timer of the session.
//!
//! `Idle → Active → {Completed, Failed}`. Only `Active` holds a live timer,
//! and every transition out of `Active` emits exactly one `CancelTimer`.

use std::time::Duration;

use tracker_logging::{tracker_debug, tracker_info, tracker_warn};

use crate::{Effect, JobId, PollHandle};

/// Default period between status checks.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Consecutive failed checks that end the poll loop.
pub const FATAL_POLL_FAILURES: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PollPhase {
    #[default]
    Idle,
    Active {
        handle: PollHandle,
        job_id: JobId,
    },
    Completed {
        job_id: JobId,
    },
    Failed {
        job_id: JobId,
    },
}

/// Outcome of recording a failed status check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureVerdict {
    /// The loop keeps running; the failure was below the threshold.
    Tolerated,
    /// The loop was stopped; carries the cancel effect.
    Fatal(Vec<Effect>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poller {
    phase: PollPhase,
    period: Duration,
    next_handle: u64,
    consecutive_failures: u32,
}

impl Default for Poller {
    fn default() -> Self {
        Self::new(POLL_INTERVAL)
    }
}

impl Poller {
    pub fn new(period: Duration) -> Self {
        Self {
            phase: PollPhase::Idle,
            period,
            next_handle: 1,
            consecutive_failures: 0,
        }
    }

    pub fn phase(&self) -> &PollPhase {
        &self.phase
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// The live timer, if any.
    pub fn handle(&self) -> Option<PollHandle> {
        match &self.phase {
            PollPhase::Active { handle, .. } => Some(*handle),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle().is_some()
    }

    /// True when `job_id` is the job the live timer polls.
    pub fn is_polling(&self, job_id: &JobId) -> bool {
        matches!(&self.phase, PollPhase::Active { job_id: active, .. } if active == job_id)
    }

    /// Starts polling `job_id`: cancels any previous timer, schedules a new
    /// one and requests one check right away.
    pub fn start(&mut self, job_id: JobId) -> Vec<Effect> {
        let mut effects = self.cancel_timer();
        let handle = PollHandle(self.next_handle);
        self.next_handle += 1;
        self.consecutive_failures = 0;
        tracker_info!("Polling job {} every {:?} (timer {:?})", job_id, self.period, handle);
        self.phase = PollPhase::Active {
            handle,
            job_id: job_id.clone(),
        };
        effects.push(Effect::StartTimer {
            handle,
            period: self.period,
        });
        effects.push(Effect::FetchStatus { job_id });
        effects
    }

    /// Translates a timer tick into a status check. Ticks from any handle
    /// other than the live one are dropped.
    pub fn on_tick(&self, handle: PollHandle) -> Vec<Effect> {
        match &self.phase {
            PollPhase::Active {
                handle: live,
                job_id,
            } if *live == handle => vec![Effect::FetchStatus {
                job_id: job_id.clone(),
            }],
            _ => {
                tracker_debug!("Dropping tick from stale timer {:?}", handle);
                Vec::new()
            }
        }
    }

    /// A check succeeded; resets the failure marker.
    pub fn record_success(&mut self) {
        self.consecutive_failures = 0;
    }

    /// A check failed to fetch or parse.
    pub fn record_failure(&mut self) -> FailureVerdict {
        self.consecutive_failures += 1;
        if self.consecutive_failures < FATAL_POLL_FAILURES {
            tracker_warn!(
                "Status check failed ({} consecutive), continuing",
                self.consecutive_failures
            );
            return FailureVerdict::Tolerated;
        }
        tracker_warn!(
            "Status check failed ({} consecutive), stopping poll loop",
            self.consecutive_failures
        );
        FailureVerdict::Fatal(self.finish(false))
    }

    /// Terminal status observed: stop and record the outcome.
    pub fn complete(&mut self) -> Vec<Effect> {
        self.finish(true)
    }

    /// Backend reported failure: stop and record the outcome.
    pub fn fail(&mut self) -> Vec<Effect> {
        self.finish(false)
    }

    /// Cancels the timer if present and returns to `Idle`. Idempotent.
    pub fn stop(&mut self) -> Vec<Effect> {
        let effects = self.cancel_timer();
        self.phase = PollPhase::Idle;
        self.consecutive_failures = 0;
        effects
    }

    fn finish(&mut self, completed: bool) -> Vec<Effect> {
        let job_id = match &self.phase {
            PollPhase::Active { job_id, .. } => job_id.clone(),
            _ => return Vec::new(),
        };
        let effects = self.cancel_timer();
        self.phase = if completed {
            PollPhase::Completed { job_id }
        } else {
            PollPhase::Failed { job_id }
        };
        effects
    }

    fn cancel_timer(&self) -> Vec<Effect> {
        match self.handle() {
            Some(handle) => vec![Effect::CancelTimer { handle }],
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_emits_timer_and_immediate_check() {
        let mut poller = Poller::default();
        let effects = poller.start(JobId::from("J1"));
        assert_eq!(
            effects,
            vec![
                Effect::StartTimer {
                    handle: PollHandle(1),
                    period: POLL_INTERVAL,
                },
                Effect::FetchStatus {
                    job_id: JobId::from("J1"),
                },
            ]
        );
        assert_eq!(poller.handle(), Some(PollHandle(1)));
    }

    #[test]
    fn restart_cancels_previous_timer_first() {
        let mut poller = Poller::default();
        poller.start(JobId::from("J1"));
        let effects = poller.start(JobId::from("J2"));
        assert_eq!(
            effects[0],
            Effect::CancelTimer {
                handle: PollHandle(1)
            }
        );
        assert_eq!(poller.handle(), Some(PollHandle(2)));
        assert!(poller.is_polling(&JobId::from("J2")));
        assert!(!poller.is_polling(&JobId::from("J1")));
    }

    #[test]
    fn stop_is_idempotent() {
        let mut poller = Poller::default();
        assert!(poller.stop().is_empty());
        poller.start(JobId::from("J1"));
        assert_eq!(poller.stop().len(), 1);
        assert!(poller.stop().is_empty());
        assert_eq!(poller.phase(), &PollPhase::Idle);
    }

    #[test]
    fn stale_tick_is_dropped() {
        let mut poller = Poller::default();
        poller.start(JobId::from("J1"));
        poller.start(JobId::from("J2"));
        assert!(poller.on_tick(PollHandle(1)).is_empty());
        assert_eq!(poller.on_tick(PollHandle(2)).len(), 1);
    }

    #[test]
    fn first_failure_is_fatal() {
        let mut poller = Poller::default();
        poller.start(JobId::from("J1"));
        match poller.record_failure() {
            FailureVerdict::Fatal(effects) => assert_eq!(
                effects,
                vec![Effect::CancelTimer {
                    handle: PollHandle(1)
                }]
            ),
            FailureVerdict::Tolerated => panic!("expected fatal verdict"),
        }
        assert_eq!(
            poller.phase(),
            &PollPhase::Failed {
                job_id: JobId::from("J1")
            }
        );
        assert_eq!(poller.handle(), None);
    }
}
