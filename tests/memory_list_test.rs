mod helpers;

use helpers::{all_backends, items, key_for};
use memlog::memory::{AppendOutcome, MemoryStore, RecallOutcome, RemoveOutcome};

#[test]
fn remember_forget_scenario() {
    for store in all_backends() {
        let backend = store.backend();
        let memory = MemoryStore::new(store);
        let key = key_for("ada@example.com");

        assert!(matches!(memory.append(&key, "likes tea"), AppendOutcome::Stored { .. }));
        assert_eq!(items(&memory, &key), ["likes tea"], "{backend}");

        memory.append(&key, "works at Acme");
        assert_eq!(items(&memory, &key), ["likes tea", "works at Acme"], "{backend}");

        assert_eq!(
            memory.remove_at(&key, 0),
            RemoveOutcome::Removed {
                index: 0,
                record: "likes tea".into()
            },
            "{backend}"
        );
        assert_eq!(items(&memory, &key), ["works at Acme"], "{backend}");

        assert_eq!(
            memory.remove_at(&key, 5),
            RemoveOutcome::NotFound { index: 5 },
            "{backend}"
        );
        assert_eq!(items(&memory, &key), ["works at Acme"], "{backend}");
    }
}

#[test]
fn appends_keep_insertion_order() {
    for store in all_backends() {
        let memory = MemoryStore::new(store);
        let key = key_for("order");
        let records: Vec<String> = (0..20).map(|i| format!("fact {i}")).collect();

        for (i, record) in records.iter().enumerate() {
            match memory.append(&key, record) {
                AppendOutcome::Stored { len, .. } => assert_eq!(len, i + 1),
                other => panic!("append failed: {other:?}"),
            }
        }
        assert_eq!(items(&memory, &key), records);
    }
}

#[test]
fn remove_shifts_later_items_down() {
    for store in all_backends() {
        let memory = MemoryStore::new(store);
        let key = key_for("shift");
        for record in ["a", "b", "c", "d"] {
            memory.append(&key, record);
        }

        assert_eq!(
            memory.remove_at(&key, 1),
            RemoveOutcome::Removed { index: 1, record: "b".into() }
        );
        assert_eq!(items(&memory, &key), ["a", "c", "d"]);

        // Index 1 now names what used to be index 2.
        assert_eq!(
            memory.remove_at(&key, 1),
            RemoveOutcome::Removed { index: 1, record: "c".into() }
        );
        assert_eq!(memory.remove_at(&key, 2), RemoveOutcome::NotFound { index: 2 });
        assert_eq!(items(&memory, &key), ["a", "d"]);
    }
}

#[test]
fn absent_list_reads_empty_and_removes_nothing() {
    for store in all_backends() {
        let memory = MemoryStore::new(store.clone());
        let key = key_for("nobody");

        assert_eq!(memory.recall(&key), RecallOutcome::Items { items: vec![] });
        assert_eq!(memory.remove_at(&key, 0), RemoveOutcome::NotFound { index: 0 });
        // Neither call creates the list.
        assert!(!store.exists(key.as_str()).unwrap());
    }
}

#[test]
fn emptied_list_stays_present_and_reads_empty() {
    for store in all_backends() {
        let memory = MemoryStore::new(store.clone());
        let key = key_for("emptied");

        memory.append(&key, "only item");
        memory.remove_at(&key, 0);

        assert!(store.exists(key.as_str()).unwrap());
        assert!(items(&memory, &key).is_empty());

        memory.append(&key, "again");
        assert_eq!(items(&memory, &key), ["again"]);
    }
}

#[test]
fn recall_is_idempotent() {
    for store in all_backends() {
        let memory = MemoryStore::new(store);
        let key = key_for("stable");
        memory.append(&key, "x");
        memory.append(&key, "y");

        assert_eq!(memory.recall(&key), memory.recall(&key));
    }
}

#[test]
fn users_do_not_see_each_other() {
    for store in all_backends() {
        let memory = MemoryStore::new(store);
        let ada = key_for("ada@example.com");
        let bob = key_for("bob@example.com");

        memory.append(&ada, "likes tea");
        memory.append(&bob, "likes coffee");
        memory.remove_at(&bob, 0);

        assert_eq!(items(&memory, &ada), ["likes tea"]);
        assert!(items(&memory, &bob).is_empty());
    }
}
