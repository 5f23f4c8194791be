//! UseCase: 全体メッセージ送信処理

use std::sync::Arc;

use crate::domain::{OutboundChannel, Session, SessionRegistry};

/// 全体メッセージ送信のユースケース
pub struct SendGlobalMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    registry: Arc<dyn SessionRegistry>,
}

impl SendGlobalMessageUseCase {
    /// 新しい SendGlobalMessageUseCase を作成
    pub fn new(registry: Arc<dyn SessionRegistry>) -> Self {
        Self { registry }
    }

    /// ブロードキャスト対象を取得
    ///
    /// 送信者自身のチャンネルは決して含まれない
    pub async fn execute(&self, sender: &Session) -> Vec<OutboundChannel> {
        self.registry.snapshot_channels_except(&sender.id).await
    }
}
