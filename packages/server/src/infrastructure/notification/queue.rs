//! In-process notification queue.
//!
//! ジョブは有界の MPMC チャネル（flume）に積まれ、固定数のワーカーがそれぞれ
//! 受信側のクローンから取り出して配信します。
//! 1 回の配信試行にはタイムアウトがあり、失敗したジョブは指数バックオフで
//! 最大試行回数まで再試行されます。使い切ったジョブはログに残して破棄します。

use std::{sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;

use crate::domain::{EmailJob, EmailSender, NotificationError, NotificationQueue};

/// Default number of jobs waiting for a worker
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts per job, including the first one
    pub max_attempts: u32,
    pub attempt_timeout: Duration,
    /// Delay before the second attempt; doubled for each further attempt
    pub backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            attempt_timeout: Duration::from_secs(30),
            backoff_base: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    /// Delay after the failed `attempt` (1-based)
    fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.backoff_base.saturating_mul(1 << exponent)
    }
}

/// Queue backed by a bounded channel and a pool of worker tasks.
#[derive(Debug, Clone)]
pub struct InProcessNotificationQueue {
    jobs: flume::Sender<EmailJob>,
}

impl InProcessNotificationQueue {
    /// Spawn `workers` tasks delivering through `sender`.
    ///
    /// Workers stop when `shutdown` is cancelled or every queue handle is dropped.
    pub fn spawn(
        sender: Arc<dyn EmailSender>,
        workers: usize,
        capacity: usize,
        policy: RetryPolicy,
        shutdown: CancellationToken,
    ) -> Self {
        let (jobs, receiver) = flume::bounded(capacity.max(1));

        for worker in 0..workers.max(1) {
            let sender = Arc::clone(&sender);
            let receiver = receiver.clone();
            let shutdown = shutdown.clone();
            tokio::spawn(async move {
                tracing::debug!(worker, "notification worker started");
                loop {
                    let job = tokio::select! {
                        _ = shutdown.cancelled() => break,
                        job = receiver.recv_async() => match job {
                            Ok(job) => job,
                            Err(_) => break,
                        },
                    };
                    if let Err(error) = deliver(sender.as_ref(), &job, &policy).await {
                        tracing::error!(
                            worker,
                            to = %job.to,
                            subject = %job.subject,
                            attempts = policy.max_attempts,
                            %error,
                            "giving up on email delivery"
                        );
                    }
                }
                tracing::debug!(worker, "notification worker stopped");
            });
        }

        Self { jobs }
    }
}

impl NotificationQueue for InProcessNotificationQueue {
    fn enqueue(&self, job: EmailJob) -> Result<(), NotificationError> {
        self.jobs.try_send(job).map_err(|error| match error {
            flume::TrySendError::Full(_) => NotificationError::QueueFull,
            flume::TrySendError::Disconnected(_) => NotificationError::QueueClosed,
        })?;
        tracing::debug!("email job queued");
        Ok(())
    }
}

/// Run one job to completion under `policy`
async fn deliver(
    sender: &dyn EmailSender,
    job: &EmailJob,
    policy: &RetryPolicy,
) -> Result<(), NotificationError> {
    let mut attempt = 1;
    loop {
        let result = tokio::time::timeout(policy.attempt_timeout, sender.send(job))
            .await
            .unwrap_or(Err(NotificationError::Timeout));

        match result {
            Ok(()) => return Ok(()),
            Err(error) if attempt >= policy.max_attempts => return Err(error),
            Err(error) => {
                tracing::warn!(to = %job.to, attempt, %error, "email delivery failed, retrying");
                tokio::time::sleep(policy.backoff(attempt)).await;
                attempt += 1;
            }
        }
    }
}
