//! UseCase: 接続中のルーム一覧の取得

use crate::hub::{RegistryView, RoomSnapshot};

pub struct ListRoomsUseCase {
    view: RegistryView,
}

impl ListRoomsUseCase {
    pub fn new(view: RegistryView) -> Self {
        Self { view }
    }

    /// ルーム ID 順のスナップショット
    pub fn execute(&self) -> Vec<RoomSnapshot> {
        self.view.rooms()
    }
}
