//! Fire-and-forget channel for user-facing failure messages.

use tokio::sync::mpsc;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
}

#[derive(Clone)]
pub struct Notifier {
    sender: mpsc::UnboundedSender<Notice>,
}

/// Receiving side, drained by whatever renders the toasts.
pub struct NotificationFeed {
    receiver: mpsc::UnboundedReceiver<Notice>,
}

impl Notifier {
    pub fn new() -> (Self, NotificationFeed) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, NotificationFeed { receiver })
    }

    /// Never blocks and never fails from the caller's point of view.
    pub fn report_error(&self, message: impl Into<String>) {
        let notice = Notice { message: message.into() };
        debug!(message = %notice.message, "Queueing notice");
        if self.sender.send(notice).is_err() {
            debug!("Notification feed closed, notice dropped");
        }
    }
}

impl NotificationFeed {
    /// Waits for the next notice; `None` once every notifier is gone.
    pub async fn recv(&mut self) -> Option<Notice> {
        self.receiver.recv().await
    }

    /// Everything queued right now, without waiting.
    pub fn drain(&mut self) -> Vec<Notice> {
        let mut notices = Vec::new();
        while let Ok(notice) = self.receiver.try_recv() {
            notices.push(notice);
        }
        notices
    }
}
