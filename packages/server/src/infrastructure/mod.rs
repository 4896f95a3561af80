//! Infrastructure layer.
//!
//! ドメイン層が定義するインターフェースの具体的な実装と、ワイヤフォーマット
//! （DTO）を提供します。

pub mod dto;
pub mod notification;
pub mod repository;
