use game_types::ScheduledAdvance;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

/// Runs at most one feedback window at a time. When the window elapses the
/// ticket is sent on the channel returned by [`FeedbackTimer::new`]. Arming a
/// new window, cancelling or dropping the timer aborts the previous task.
#[derive(Debug)]
pub struct FeedbackTimer {
    fired: mpsc::UnboundedSender<Uuid>,
    handle: Option<JoinHandle<()>>,
}

impl FeedbackTimer {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Uuid>) {
        let (fired, receiver) = mpsc::unbounded_channel();
        (
            Self {
                fired,
                handle: None,
            },
            receiver,
        )
    }

    pub fn arm(&mut self, pending: &ScheduledAdvance) {
        self.cancel();

        let fired = self.fired.clone();
        let ticket = pending.ticket;
        let delay = Duration::from_millis(u64::from(pending.delay_ms));
        debug!("Arming feedback window {} for {:?}", ticket, delay);

        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if fired.send(ticket).is_err() {
                debug!("Feedback ticket {} fired after controller shut down", ticket);
            }
        }));
    }

    /// Returns `true` if a window was still running.
    pub fn cancel(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                let running = !handle.is_finished();
                handle.abort();
                running
            }
            None => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for FeedbackTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
