//! Outbound mail seam.

use crate::compose::Notification;
use crate::error::SchedulerResult;

/// Delivers composed notifications.
pub trait MailTransport: Send + Sync {
    /// Returns `true` if `address` (a bare e-mail address) can receive mail.
    fn validate_address(&self, address: &str) -> bool;

    /// Sends `notification` once.
    ///
    /// Returns the recipients that could not be reached.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Transport`](crate::SchedulerError::Transport)
    /// when nothing could be sent at all.
    fn send(&self, notification: &Notification) -> SchedulerResult<Vec<String>>;
}
