use std::time::Duration;

use crate::poller::Poller;
use crate::{Effect, JobId};

/// The page's single job-tracking context.
///
/// `current_job_id` is set when a creation succeeds and cleared on a
/// terminal outcome or a reset. The poller is the only owner of the timer;
/// the session can force it to stop but never touches the timer itself.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    current_job_id: Option<JobId>,
    poller: Poller,
}

impl Session {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            current_job_id: None,
            poller: Poller::new(poll_interval),
        }
    }

    pub fn current_job_id(&self) -> Option<&JobId> {
        self.current_job_id.as_ref()
    }

    pub fn poller(&self) -> &Poller {
        &self.poller
    }

    pub(crate) fn poller_mut(&mut self) -> &mut Poller {
        &mut self.poller
    }

    /// Begins tracking a freshly created job.
    pub(crate) fn track(&mut self, job_id: JobId) -> Vec<Effect> {
        self.current_job_id = Some(job_id.clone());
        self.poller.start(job_id)
    }

    /// A response belongs to this session only if it targets the tracked
    /// job and the poll loop for it is still live.
    pub fn accepts(&self, job_id: &JobId) -> bool {
        self.current_job_id.as_ref() == Some(job_id) && self.poller.is_polling(job_id)
    }

    /// Drops the tracked id once the poll loop has ended.
    pub(crate) fn release(&mut self) -> Option<JobId> {
        self.current_job_id.take()
    }

    /// Forgets the job and force-stops polling. Safe from any state.
    pub(crate) fn reset(&mut self) -> Vec<Effect> {
        self.current_job_id = None;
        self.poller.stop()
    }
}
