use async_trait::async_trait;

use crate::domain::{EmailJob, EmailSender, NotificationError};

/// Records each delivery in the log instead of talking to a mail server.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, job: &EmailJob) -> Result<(), NotificationError> {
        tracing::info!(to = %job.to, subject = %job.subject, "email delivered");
        Ok(())
    }
}
