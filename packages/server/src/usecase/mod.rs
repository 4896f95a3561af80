//! UseCase 層
//!
//! HTTP API から呼ばれる読み取り中心の操作を定義します。
//! ルームの状態は [`RegistryView`](crate::hub::RegistryView) から読み、
//! ハブのイベントループには触れません。

pub mod error;
pub mod get_room_members;
pub mod get_room_messages;
pub mod list_rooms;
pub mod queue_email;

pub use error::{GetRoomMessagesError, QueueEmailError};
pub use get_room_members::GetRoomMembersUseCase;
pub use get_room_messages::GetRoomMessagesUseCase;
pub use list_rooms::ListRoomsUseCase;
pub use queue_email::QueueEmailUseCase;
