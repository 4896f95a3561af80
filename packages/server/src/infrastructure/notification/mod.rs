//! Notification 実装
//!
//! オフラインの購読者へのメール通知を非同期に処理します。
//! - `queue`: ワーカープール付きのプロセス内ジョブキュー
//! - `mailer`: 配信処理（ログ出力のみ）
//! - `directory`: ルームの購読者一覧とオフライン判定

mod directory;
mod mailer;
mod queue;

pub use directory::{InMemorySubscriberDirectory, SubscriptionEntry};
pub use mailer::LogEmailSender;
pub use queue::{DEFAULT_QUEUE_CAPACITY, InProcessNotificationQueue, RetryPolicy};
