//! UseCase: メール送信ジョブの手動投入

use std::sync::Arc;

use crate::domain::{EmailJob, NotificationQueue};

use super::error::QueueEmailError;

pub struct QueueEmailUseCase {
    queue: Arc<dyn NotificationQueue>,
}

impl QueueEmailUseCase {
    pub fn new(queue: Arc<dyn NotificationQueue>) -> Self {
        Self { queue }
    }

    /// 必須項目を検証してジョブを投入する（配信完了は待たない）
    pub fn execute(&self, job: EmailJob) -> Result<(), QueueEmailError> {
        if job.to.is_empty() || job.subject.is_empty() || job.body.is_empty() {
            return Err(QueueEmailError::MissingFields);
        }
        self.queue.enqueue(job)?;
        Ok(())
    }
}
