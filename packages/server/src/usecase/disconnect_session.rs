//! UseCase: セッション切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectSessionUseCase::execute() メソッド
//! - 名前の解放と通知対象の選定、二重実行の防止
//!
//! ### なぜこのテストが必要か
//! - 切断後に Registry に名前が残ってはいけない
//! - 読み込みエラーと salir が競合しても「退出」通知は 1 回だけでなければならない
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の切断と通知
//! - エッジケース：最後の参加者の切断（通知対象なし）、二重呼び出し

use std::sync::Arc;

use crate::domain::{OutboundChannel, Session, SessionRegistry};

/// セッション切断のユースケース
pub struct DisconnectSessionUseCase {
    /// Repository（データアクセス層の抽象化）
    registry: Arc<dyn SessionRegistry>,
}

impl DisconnectSessionUseCase {
    /// 新しい DisconnectSessionUseCase を作成
    pub fn new(registry: Arc<dyn SessionRegistry>) -> Self {
        Self { registry }
    }

    /// セッション切断を実行
    ///
    /// セッションを Closing に移し、名前を解放する。
    ///
    /// # Returns
    ///
    /// * `Some(peers)` - 今回の呼び出しで切断した（peers は退出通知の宛先）
    /// * `None` - 既に切断処理済み
    pub async fn execute(&self, session: &mut Session) -> Option<Vec<OutboundChannel>> {
        if !session.begin_closing() {
            return None;
        }

        let released = self.registry.release(&session.display_name).await;
        if !released {
            // Never made it into the registry; nobody saw it join.
            return Some(Vec::new());
        }

        Some(self.registry.snapshot_channels_except(&session.id).await)
    }

    /// 残りのセッション数を取得
    pub async fn count_remaining_sessions(&self) -> usize {
        self.registry.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            DefaultNameFactory, DisplayName, SessionIdFactory, SessionState, Timestamp,
            repository::MockSessionRegistry,
        },
        infrastructure::repository::InMemorySessionRegistry,
        usecase::ConnectSessionUseCase,
    };
    use tokio::sync::mpsc;

    async fn connect_many(
        registry: Arc<InMemorySessionRegistry>,
        count: usize,
    ) -> (Vec<Session>, Vec<mpsc::Receiver<String>>) {
        let connect = ConnectSessionUseCase::new(registry, Arc::new(DefaultNameFactory::new()));
        let mut sessions = Vec::new();
        let mut receivers = Vec::new();
        for _ in 0..count {
            let (tx, rx) = mpsc::channel(16);
            let channel = OutboundChannel::new(SessionIdFactory::generate(), tx);
            sessions.push(connect.execute(channel).await.unwrap().session);
            receivers.push(rx);
        }
        (sessions, receivers)
    }

    #[tokio::test]
    async fn test_disconnect_session_success() {
        // テスト項目: 切断すると名前が解放され、残りの参加者が通知対象になる
        // given (前提条件):
        let registry = Arc::new(InMemorySessionRegistry::new());
        let (mut sessions, _receivers) = connect_many(registry.clone(), 3).await;
        let usecase = DisconnectSessionUseCase::new(registry.clone());

        // when (操作):
        let result = usecase.execute(&mut sessions[0]).await;

        // then (期待する結果):
        let peers = result.unwrap();
        assert_eq!(peers.len(), 2);
        assert!(peers.iter().all(|c| c.session_id() != &sessions[0].id));
        assert!(registry.lookup("Usuario1").await.is_none());
        assert_eq!(usecase.count_remaining_sessions().await, 2);
        assert_eq!(sessions[0].state(), SessionState::Closing);
    }

    #[tokio::test]
    async fn test_disconnect_last_session() {
        // テスト項目: 最後の参加者が切断すると通知対象は空
        let registry = Arc::new(InMemorySessionRegistry::new());
        let (mut sessions, _receivers) = connect_many(registry.clone(), 1).await;
        let usecase = DisconnectSessionUseCase::new(registry);

        let peers = usecase.execute(&mut sessions[0]).await.unwrap();

        assert!(peers.is_empty());
        assert_eq!(usecase.count_remaining_sessions().await, 0);
    }

    #[tokio::test]
    async fn test_disconnect_runs_exactly_once() {
        // テスト項目: 2 回目の切断呼び出しは何もしない
        // given (前提条件):
        let mut registry = MockSessionRegistry::new();
        registry.expect_release().times(1).returning(|_| true);
        registry
            .expect_snapshot_channels_except()
            .times(1)
            .returning(|_| Vec::new());
        let usecase = DisconnectSessionUseCase::new(Arc::new(registry));
        let mut session = Session::new(
            SessionIdFactory::generate(),
            DisplayName::try_from("Usuario1").unwrap(),
            Timestamp::new(0),
        );
        session.transition(SessionState::Active).unwrap();

        // when (操作):
        let first = usecase.execute(&mut session).await;
        let second = usecase.execute(&mut session).await;

        // then (期待する結果):
        assert!(first.is_some());
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn test_disconnect_unregistered_session_notifies_nobody() {
        // テスト項目: 登録前に切断されたセッションは誰にも通知しない
        let mut registry = MockSessionRegistry::new();
        registry.expect_release().times(1).returning(|_| false);
        registry.expect_snapshot_channels_except().never();
        let usecase = DisconnectSessionUseCase::new(Arc::new(registry));
        let mut session = Session::new(
            SessionIdFactory::generate(),
            DisplayName::try_from("Usuario9").unwrap(),
            Timestamp::new(0),
        );

        let peers = usecase.execute(&mut session).await;

        assert_eq!(peers.map(|p| p.len()), Some(0));
    }
}
