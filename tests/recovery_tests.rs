//! Recovery Tests
//!
//! Restarting the engine over an existing operation log.

use std::fs;
use std::path::Path;
use std::time::Duration;

use ring_cache::{cache::CacheStore, oplog, CacheError, CacheHandle, Config};
use tempfile::TempDir;

fn config_for(path: &Path, capacity: usize, slots: usize) -> Config {
    Config {
        sync_writes: false,
        ..Config::with_bounds(capacity, slots, path)
    }
}

#[tokio::test]
async fn test_replay_put_del_put_written_by_hand() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cache_log.txt");
    fs::write(&path, "PUT,x,10\nDEL,x\nPUT,x,20\n").unwrap();

    let cache = CacheHandle::open(&config_for(&path, 2, 100)).await.unwrap();

    assert_eq!(cache.get("x").await.unwrap(), 20);
}

#[tokio::test]
async fn test_missing_log_starts_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("logs").join("cache_log.txt");

    let cache = CacheHandle::open(&config_for(&path, 2, 100)).await.unwrap();

    assert_eq!(cache.stats().await.unwrap().total_entries, 0);
    // The log and its directory are created for appending
    assert!(path.exists());
}

#[tokio::test]
async fn test_truncated_last_line_is_ignored() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cache_log.txt");
    fs::write(&path, "PUT,a,1\nPUT,b,2\nPUT,c,").unwrap();

    let cache = CacheHandle::open(&config_for(&path, 2, 100)).await.unwrap();

    assert_eq!(cache.get("a").await.unwrap(), 1);
    assert_eq!(cache.get("b").await.unwrap(), 2);
    assert!(matches!(cache.get("c").await, Err(CacheError::NotFound(_))));
}

#[tokio::test]
async fn test_state_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cache_log.txt");
    let config = config_for(&path, 2, 100);

    let cache = CacheHandle::open(&config).await.unwrap();
    cache.put("a", 1).await.unwrap();
    cache.put("b", 2).await.unwrap();
    cache.put("c", 3).await.unwrap();
    cache.del("b").await.unwrap();
    cache.del("missing").await.unwrap();
    cache.shutdown(Duration::from_secs(5)).await.unwrap();

    let log = fs::read_to_string(&path).unwrap();
    assert_eq!(log, "PUT,a,1\nPUT,b,2\nPUT,c,3\nDEL,b\n");

    let restarted = CacheHandle::open(&config).await.unwrap();
    assert!(matches!(restarted.get("a").await, Err(CacheError::NotFound(_))));
    assert!(matches!(restarted.get("b").await, Err(CacheError::NotFound(_))));
    assert_eq!(restarted.get("c").await.unwrap(), 3);

    // New writes land after the recovered history
    restarted.put("d", 4).await.unwrap();
    restarted.shutdown(Duration::from_secs(5)).await.unwrap();
    let log = fs::read_to_string(&path).unwrap();
    assert!(log.ends_with("DEL,b\nPUT,d,4\n"));
}

#[tokio::test]
async fn test_replay_respects_capacity() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cache_log.txt");
    fs::write(&path, "PUT,a,1\nPUT,b,2\nPUT,c,3\nPUT,d,4\n").unwrap();

    let cache = CacheHandle::open(&config_for(&path, 2, 100)).await.unwrap();

    let stats = cache.stats().await.unwrap();
    assert_eq!(stats.total_entries, 2);
    assert_eq!(stats.evictions, 2);
    assert_eq!(cache.get("c").await.unwrap(), 3);
    assert_eq!(cache.get("d").await.unwrap(), 4);
}

#[tokio::test]
async fn test_replaying_same_log_twice_gives_same_state() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cache_log.txt");
    fs::write(
        &path,
        "PUT,Aa,1\nPUT,BB,2\nPUT,a,3\nDEL,Aa\nPUT,C#,4\nPUT,BB,5\nDEL,zz\n",
    )
    .unwrap();

    let mut first = CacheStore::new(3, 100);
    let mut second = CacheStore::new(3, 100);
    let first_report = oplog::replay(&path, &mut first).await;
    let second_report = oplog::replay(&path, &mut second).await;

    assert_eq!(first_report, second_report);
    assert_eq!(first.eviction().keys(), second.eviction().keys());
    let layout = |store: &CacheStore| {
        store
            .slots()
            .iter()
            .map(|(slot, entry)| (slot, entry.key.clone(), entry.value))
            .collect::<Vec<_>>()
    };
    assert_eq!(layout(&first), layout(&second));
    assert!(first.is_consistent());
}

#[tokio::test]
async fn test_put_after_torn_tail_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cache_log.txt");
    fs::write(&path, "PUT,a,1\nPUT,b,").unwrap();
    let config = config_for(&path, 2, 100);

    let cache = CacheHandle::open(&config).await.unwrap();
    cache.put("e", 5).await.unwrap();
    cache.shutdown(Duration::from_secs(5)).await.unwrap();

    // The fragment stays on its own line and the new record follows it
    let log = fs::read_to_string(&path).unwrap();
    assert_eq!(log, "PUT,a,1\nPUT,b,\nPUT,e,5\n");

    let restarted = CacheHandle::open(&config).await.unwrap();
    assert_eq!(restarted.get("e").await.unwrap(), 5);
    assert_eq!(restarted.get("a").await.unwrap(), 1);
    assert!(matches!(restarted.get("b").await, Err(CacheError::NotFound(_))));
}
