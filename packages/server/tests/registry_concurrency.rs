//! Concurrency properties of the session registry and outbound channels.

mod fixtures;

use std::{
    collections::HashSet,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use fixtures::TestServer;
use tertulia_server::{
    domain::{DisplayName, OutboundChannel, RegistryError, SessionIdFactory, SessionRegistry},
    infrastructure::repository::InMemorySessionRegistry,
};
use tokio::sync::mpsc;

fn channel() -> (OutboundChannel, mpsc::Receiver<String>) {
    let (tx, rx) = mpsc::channel(16);
    (OutboundChannel::new(SessionIdFactory::generate(), tx), rx)
}

fn name(s: &str) -> DisplayName {
    DisplayName::try_from(s).unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_claims_of_one_name_have_one_winner() {
    // テスト項目: 同じ名前への同時 claim は 1 つだけ成功する
    // given (前提条件):
    let registry = Arc::new(InMemorySessionRegistry::new());
    let mut receivers = Vec::new();
    let mut tasks = Vec::new();

    // when (操作):
    for _ in 0..32 {
        let (ch, rx) = channel();
        receivers.push(rx);
        let registry = registry.clone();
        tasks.push(tokio::spawn(async move {
            registry.claim(name("Alice"), ch).await
        }));
    }
    let mut winners = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(()) => winners += 1,
            Err(RegistryError::NameTaken(taken)) => assert_eq!(taken, "Alice"),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    // then (期待する結果):
    assert_eq!(winners, 1);
    assert_eq!(registry.count().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_claim_rename_release_stress_keeps_names_unique() {
    // テスト項目: claim/rename/release を並行に繰り返しても名前は一意で、解放後は lookup されない
    // given (前提条件):
    let registry = Arc::new(InMemorySessionRegistry::new());
    let shared_names = ["Alice", "Bob", "Carol"];
    let mut tasks = Vec::new();

    // when (操作):
    for worker in 0..16 {
        let registry = registry.clone();
        tasks.push(tokio::spawn(async move {
            let (ch, _rx) = channel();
            for round in 0..50 {
                let mut current = name(&format!("Usuario{}", worker * 1000 + round));
                registry.claim(current.clone(), ch.clone()).await.unwrap();

                let wanted = shared_names[(worker + round) % shared_names.len()];
                if let Ok(renamed) = registry.rename(&current, wanted, ch.clone()).await {
                    current = renamed;
                }
                let bound = registry.lookup(current.as_str()).await.unwrap();
                assert!(bound.is_same_channel(&ch));

                assert!(registry.release(&current).await);
                if let Some(after) = registry.lookup(current.as_str()).await {
                    assert!(!after.is_same_channel(&ch), "released channel still bound");
                }
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    // then (期待する結果):
    assert_eq!(registry.count().await, 0);
    assert!(registry.names().await.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_rename_is_never_observed_half_applied() {
    // テスト項目: 改名中の観測では旧名か新名のどちらか一方だけが存在する
    // given (前提条件):
    let registry = Arc::new(InMemorySessionRegistry::new());
    let (ch, _rx) = channel();
    registry.claim(name("Ping"), ch.clone()).await.unwrap();
    let done = Arc::new(AtomicBool::new(false));

    let renamer = {
        let registry = registry.clone();
        let done = done.clone();
        tokio::spawn(async move {
            let mut current = name("Ping");
            for _ in 0..500 {
                let next = if current.as_str() == "Ping" { "Pong" } else { "Ping" };
                current = registry.rename(&current, next, ch.clone()).await.unwrap();
                tokio::task::yield_now().await;
            }
            done.store(true, Ordering::SeqCst);
        })
    };

    // when (操作):
    let mut observations = 0;
    while !done.load(Ordering::SeqCst) {
        let names: HashSet<String> = registry
            .names()
            .await
            .into_iter()
            .map(DisplayName::into_string)
            .collect();

        // then (期待する結果):
        assert_eq!(names.len(), 1, "observed {names:?}");
        assert!(names.contains("Ping") || names.contains("Pong"));
        observations += 1;
        tokio::task::yield_now().await;
    }
    renamer.await.unwrap();

    assert!(observations > 0);
    assert_eq!(registry.count().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writers_do_not_interleave() {
    // テスト項目: 複数の送信者が同じ相手に同時送信しても、各メッセージは 1 行のまま届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut target = server.connect().await;
    let senders_count = 6;
    let per_sender = 40;
    let mut senders = Vec::new();
    for _ in 0..senders_count {
        senders.push(server.connect().await);
    }
    for _ in 0..senders_count {
        assert!(target.recv().await.ends_with("joined the chat."));
    }
    let body = "x".repeat(2048);

    // when (操作):
    let mut tasks = Vec::new();
    for (i, mut sender) in senders.into_iter().enumerate() {
        let body = body.clone();
        tasks.push(tokio::spawn(async move {
            for n in 0..per_sender {
                let line = if n % 2 == 0 {
                    format!("send-msg Usuario1 {i}:{n}:{body}")
                } else {
                    format!("global-msg {i}:{n}:{body}")
                };
                sender.send(&line).await;
            }
            sender
        }));
    }

    // then (期待する結果):
    let mut seen = HashSet::new();
    while seen.len() < senders_count * per_sender {
        let line = target.recv().await;
        if line.ends_with("joined the chat.") || line.ends_with(" left the chat.") {
            continue;
        }
        let (prefix, payload) = line.split_once("]: ").expect("tagged message");
        assert!(prefix.starts_with('['), "malformed line: {prefix}");
        let mut parts = payload.splitn(3, ':');
        let i = parts.next().unwrap().to_string();
        let n = parts.next().unwrap().to_string();
        assert_eq!(parts.next().unwrap(), body, "message body was corrupted");
        assert!(seen.insert((i, n)), "duplicate delivery");
    }

    for task in tasks {
        drop(task.await.unwrap());
    }
}
