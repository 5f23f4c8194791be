//! UseCase: セッション接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectSessionUseCase::execute() メソッド
//! - デフォルト名の生成と Registry への claim、通知対象の選定
//!
//! ### なぜこのテストが必要か
//! - 接続直後のセッションは必ず一意な名前で Registry に登録されていなければならない
//! - 他のユーザーが Usuario<N> に改名していても接続が失敗しないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：最初の接続、2 人目の接続
//! - エッジケース：デフォルト名が既に使われている場合は次の番号を使う
//! - 異常系：全ての試行でデフォルト名が使われている場合

use std::sync::Arc;

use crate::domain::{
    DefaultNameFactory, OutboundChannel, RegistryError, Session, SessionRegistry, SessionState,
    Timestamp,
};

use super::error::ConnectError;

/// How many default names are tried before giving up
pub const MAX_CLAIM_ATTEMPTS: usize = 64;

/// Result of a successful connection
#[derive(Debug)]
pub struct ConnectedSession {
    /// The new session, in the `Active` state
    pub session: Session,
    /// Every other channel, to be told about the arrival
    pub peers: Vec<OutboundChannel>,
}

/// セッション接続のユースケース
pub struct ConnectSessionUseCase {
    /// Repository（データアクセス層の抽象化）
    registry: Arc<dyn SessionRegistry>,
    /// Usuario<N> の生成器（サーバー全体で共有）
    names: Arc<DefaultNameFactory>,
}

impl ConnectSessionUseCase {
    /// 新しい ConnectSessionUseCase を作成
    pub fn new(registry: Arc<dyn SessionRegistry>, names: Arc<DefaultNameFactory>) -> Self {
        Self { registry, names }
    }

    /// セッション接続を実行
    ///
    /// # Arguments
    ///
    /// * `channel` - 新しいセッションの送信チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(ConnectedSession)` - 接続成功（Active 状態のセッションと通知対象）
    /// * `Err(ConnectError)` - 接続失敗
    pub async fn execute(&self, channel: OutboundChannel) -> Result<ConnectedSession, ConnectError> {
        let mut session = Session::new(
            channel.session_id().clone(),
            self.names.generate()?,
            Timestamp::now(),
        );

        for _ in 0..MAX_CLAIM_ATTEMPTS {
            match self
                .registry
                .claim(session.display_name.clone(), channel.clone())
                .await
            {
                Ok(()) => {
                    session.transition(SessionState::Active)?;
                    let peers = self.registry.snapshot_channels_except(&session.id).await;
                    return Ok(ConnectedSession { session, peers });
                }
                Err(RegistryError::NameTaken(taken)) => {
                    tracing::debug!(name = %taken, "default name already claimed, drawing another");
                    session.rename(self.names.generate()?);
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(ConnectError::NoAvailableName {
            attempts: MAX_CLAIM_ATTEMPTS,
        })
    }
}
