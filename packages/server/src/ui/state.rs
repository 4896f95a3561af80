//! Server state shared by all handlers.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::{
    config::SessionConfig,
    hub::HubHandle,
    usecase::{
        GetRoomMembersUseCase, GetRoomMessagesUseCase, ListRoomsUseCase, QueueEmailUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// ハブのイベントループへの入口
    pub hub: HubHandle,
    /// クライアントセッションの上限値
    pub session: SessionConfig,
    /// サーバー全体のシャットダウン通知（セッションは子トークンを使う）
    pub shutdown: CancellationToken,
    /// GetRoomMembersUseCase（ルームメンバー取得のユースケース）
    pub get_room_members_usecase: Arc<GetRoomMembersUseCase>,
    /// ListRoomsUseCase（ルーム一覧取得のユースケース）
    pub list_rooms_usecase: Arc<ListRoomsUseCase>,
    /// GetRoomMessagesUseCase（メッセージ履歴取得のユースケース）
    pub get_room_messages_usecase: Arc<GetRoomMessagesUseCase>,
    /// QueueEmailUseCase（メール送信ジョブ投入のユースケース）
    pub queue_email_usecase: Arc<QueueEmailUseCase>,
}
