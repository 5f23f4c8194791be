//! InMemory Session Registry 実装
//!
//! ドメイン層が定義する SessionRegistry trait の具体的な実装。
//! Mutex で保護された BTreeMap をインメモリ DB として使用します。
//!
//! 全ての操作は同じロックを 1 回だけ取得するため、claim / release / rename /
//! lookup / snapshot は互いにアトミックです。

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    DisplayName, OutboundChannel, RegistryError, SessionId, SessionRegistry,
};

/// インメモリ Session Registry 実装
#[derive(Debug, Default)]
pub struct InMemorySessionRegistry {
    /// 表示名 → 送信チャンネル
    entries: Mutex<BTreeMap<DisplayName, OutboundChannel>>,
}

impl InMemorySessionRegistry {
    /// 新しい InMemorySessionRegistry を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRegistry for InMemorySessionRegistry {
    async fn claim(
        &self,
        name: DisplayName,
        channel: OutboundChannel,
    ) -> Result<(), RegistryError> {
        let mut entries = self.entries.lock().await;
        if let Some(existing) = entries.get(&name)
            && !existing.is_same_channel(&channel)
        {
            return Err(RegistryError::NameTaken(name.into_string()));
        }
        entries.insert(name, channel);
        Ok(())
    }

    async fn release(&self, name: &DisplayName) -> bool {
        let mut entries = self.entries.lock().await;
        entries.remove(name).is_some()
    }

    async fn rename(
        &self,
        old_name: &DisplayName,
        new_name: &str,
        channel: OutboundChannel,
    ) -> Result<DisplayName, RegistryError> {
        let new_name =
            DisplayName::new(new_name.to_string()).map_err(|source| RegistryError::InvalidName {
                name: new_name.to_string(),
                source,
            })?;

        let mut entries = self.entries.lock().await;
        if let Some(existing) = entries.get(&new_name)
            && !existing.is_same_channel(&channel)
        {
            return Err(RegistryError::NameTaken(new_name.into_string()));
        }

        // Only drop the old entry if it really belongs to the renaming channel.
        if entries
            .get(old_name)
            .is_some_and(|bound| bound.is_same_channel(&channel))
        {
            entries.remove(old_name);
        }
        entries.insert(new_name.clone(), channel);
        Ok(new_name)
    }

    async fn lookup(&self, name: &str) -> Option<OutboundChannel> {
        let entries = self.entries.lock().await;
        entries.get(name).cloned()
    }

    async fn snapshot_channels_except(&self, session_id: &SessionId) -> Vec<OutboundChannel> {
        let entries = self.entries.lock().await;
        entries
            .values()
            .filter(|channel| channel.session_id() != session_id)
            .cloned()
            .collect()
    }

    async fn names(&self) -> Vec<DisplayName> {
        let entries = self.entries.lock().await;
        entries.keys().cloned().collect()
    }

    async fn count(&self) -> usize {
        let entries = self.entries.lock().await;
        entries.len()
    }
}
