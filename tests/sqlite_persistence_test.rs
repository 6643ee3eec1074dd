mod helpers;

use helpers::{items, key_for};
use memlog::config::StorageConfig;
use memlog::memory::{AppendOutcome, MemoryStore};
use memlog::store::create_store;
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::TempDir;

#[test]
fn lists_survive_reopen() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("subdir").join("memory.db");
    let config = StorageConfig {
        backend: "sqlite".into(),
        db_path: db_path.to_string_lossy().into_owned(),
    };
    let key = key_for("ada@example.com");

    {
        let memory = MemoryStore::new(create_store(&config).unwrap());
        memory.append(&key, "likes tea");
        memory.append(&key, "works at Acme");
        memory.remove_at(&key, 0);
    }
    assert!(db_path.exists());

    let memory = MemoryStore::new(create_store(&config).unwrap());
    assert_eq!(memory.backend(), "sqlite");
    assert_eq!(items(&memory, &key), ["works at Acme"]);
}

#[test]
fn busy_timeout_is_set() {
    let tmp = TempDir::new().unwrap();
    let conn = memlog::db::open_database(tmp.path().join("test.db")).unwrap();

    let timeout: i64 = conn
        .pragma_query_value(None, "busy_timeout", |row| row.get(0))
        .unwrap();
    assert_eq!(timeout, 5000);
}

#[test]
fn two_handles_on_one_file_share_lists() {
    let tmp = TempDir::new().unwrap();
    let config = StorageConfig {
        backend: "sqlite".into(),
        db_path: tmp.path().join("shared.db").to_string_lossy().into_owned(),
    };
    let key = key_for("shared@example.com");

    let a = MemoryStore::new(create_store(&config).unwrap());
    let b = MemoryStore::new(create_store(&config).unwrap());

    a.append(&key, "from a");
    b.append(&key, "from b");

    assert_eq!(items(&a, &key), ["from a", "from b"]);
    assert_eq!(items(&a, &key), items(&b, &key));
}

#[test]
fn concurrent_handles_on_one_file_keep_every_append() {
    const HANDLES: usize = 8;
    const APPENDS: usize = 20;

    let tmp = TempDir::new().unwrap();
    let config = StorageConfig {
        backend: "sqlite".into(),
        db_path: tmp.path().join("contended.db").to_string_lossy().into_owned(),
    };
    let key = key_for("contended@example.com");
    let barrier = Arc::new(Barrier::new(HANDLES));

    let workers: Vec<_> = (0..HANDLES)
        .map(|h| {
            // Each thread opens its own connection to the same file.
            let memory = MemoryStore::new(create_store(&config).unwrap());
            let key = key.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                (0..APPENDS)
                    .filter(|i| {
                        !matches!(
                            memory.append(&key, &format!("handle {h} item {i}")),
                            AppendOutcome::Stored { .. }
                        )
                    })
                    .count()
            })
        })
        .collect();

    let failures: usize = workers.into_iter().map(|w| w.join().unwrap()).sum();
    assert_eq!(failures, 0);

    let memory = MemoryStore::new(create_store(&config).unwrap());
    let stored = items(&memory, &key);
    assert_eq!(stored.len(), HANDLES * APPENDS);
    for h in 0..HANDLES {
        let mine: Vec<&String> = stored
            .iter()
            .filter(|s| s.starts_with(&format!("handle {h} ")))
            .collect();
        let expected: Vec<String> = (0..APPENDS).map(|i| format!("handle {h} item {i}")).collect();
        assert_eq!(mine, expected.iter().collect::<Vec<_>>(), "per-handle order kept");
    }
}
