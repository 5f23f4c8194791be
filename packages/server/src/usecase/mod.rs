//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。
//! 各ユースケースは通知すべき宛先チャンネルを返し、送信は UI 層が行います。

pub mod change_user_name;
pub mod connect_session;
pub mod disconnect_session;
pub mod error;
pub mod send_global_message;
pub mod send_private_message;

pub use change_user_name::{ChangeUserNameUseCase, RenamedSession};
pub use connect_session::{ConnectSessionUseCase, ConnectedSession};
pub use disconnect_session::DisconnectSessionUseCase;
pub use error::{ChangeUserNameError, ConnectError, SendPrivateMessageError};
pub use send_global_message::SendGlobalMessageUseCase;
pub use send_private_message::SendPrivateMessageUseCase;
