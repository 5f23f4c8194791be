//! UseCase: 表示名変更処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ChangeUserNameUseCase::execute() メソッド
//! - Registry.rename の結果に応じたセッション状態の更新
//!
//! ### なぜこのテストが必要か
//! - 改名が失敗した場合、セッションの名前も Registry も変わってはいけない
//! - 改名成功時は他の全員に通知する必要がある
//!
//! ### どのような状況を想定しているか
//! - 正常系：改名成功と通知対象の選定
//! - 異常系：使用中の名前、空白を含む名前
//! - エッジケース：Active でないセッションからの改名

use std::sync::Arc;

use crate::domain::{DisplayName, OutboundChannel, Session, SessionRegistry};

use super::error::ChangeUserNameError;

/// Result of a successful rename
#[derive(Debug)]
pub struct RenamedSession {
    /// Name held before the rename
    pub previous: DisplayName,
    /// Every other channel, to be told about the new name
    pub peers: Vec<OutboundChannel>,
}

/// 表示名変更のユースケース
pub struct ChangeUserNameUseCase {
    /// Repository（データアクセス層の抽象化）
    registry: Arc<dyn SessionRegistry>,
}

impl ChangeUserNameUseCase {
    /// 新しい ChangeUserNameUseCase を作成
    pub fn new(registry: Arc<dyn SessionRegistry>) -> Self {
        Self { registry }
    }

    /// 表示名変更を実行
    ///
    /// # Arguments
    ///
    /// * `session` - 改名するセッション（成功時に名前が更新される）
    /// * `channel` - セッション自身の送信チャンネル
    /// * `new_name` - 要求された名前（未検証）
    ///
    /// # Returns
    ///
    /// * `Ok(RenamedSession)` - 改名成功
    /// * `Err(ChangeUserNameError)` - 改名失敗（セッションと Registry は変更されない）
    pub async fn execute(
        &self,
        session: &mut Session,
        channel: &OutboundChannel,
        new_name: &str,
    ) -> Result<RenamedSession, ChangeUserNameError> {
        if !session.is_active() {
            return Err(ChangeUserNameError::SessionNotActive);
        }

        let renamed = self
            .registry
            .rename(&session.display_name, new_name, channel.clone())
            .await?;
        let previous = session.display_name.clone();
        session.rename(renamed);

        let peers = self.registry.snapshot_channels_except(&session.id).await;
        Ok(RenamedSession { previous, peers })
    }
}
