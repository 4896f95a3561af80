//! UseCase: ルームの接続中メンバー一覧の取得

use crate::{
    domain::{MemberProfile, RoomId},
    hub::RegistryView,
};

/// ルームメンバー取得のユースケース
pub struct GetRoomMembersUseCase {
    view: RegistryView,
}

impl GetRoomMembersUseCase {
    pub fn new(view: RegistryView) -> Self {
        Self { view }
    }

    /// 参加順のメンバー一覧を返す
    ///
    /// 誰も接続していないルームはエラーではなく空の一覧になります。
    pub fn execute(&self, room_id: &RoomId) -> Vec<MemberProfile> {
        self.view
            .room(room_id)
            .map(|room| room.members)
            .unwrap_or_default()
    }
}
