//! UseCase: 個人メッセージ送信処理
//!
//! 宛先の表示名を Registry で解決するだけの薄いユースケースです。
//! 送信者と宛先が同じ名前でも禁止しません。

use std::sync::Arc;

use crate::domain::{OutboundChannel, SessionRegistry};

use super::error::SendPrivateMessageError;

/// 個人メッセージ送信のユースケース
pub struct SendPrivateMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    registry: Arc<dyn SessionRegistry>,
}

impl SendPrivateMessageUseCase {
    /// 新しい SendPrivateMessageUseCase を作成
    pub fn new(registry: Arc<dyn SessionRegistry>) -> Self {
        Self { registry }
    }

    /// 宛先チャンネルを解決する
    ///
    /// # Returns
    ///
    /// * `Ok(OutboundChannel)` - 宛先のチャンネル
    /// * `Err(SendPrivateMessageError::UserNotFound)` - その名前のセッションが存在しない
    pub async fn execute(&self, target: &str) -> Result<OutboundChannel, SendPrivateMessageError> {
        self.registry
            .lookup(target)
            .await
            .ok_or_else(|| SendPrivateMessageError::UserNotFound(target.to_string()))
    }
}
