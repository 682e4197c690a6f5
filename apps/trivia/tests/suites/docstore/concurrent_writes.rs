use std::sync::Arc;

use serde_json::{json, Value};
use trivia::{DocPath, DocumentStore, InMemoryStore};

/// Increment a counter with compare-and-set, re-reading on conflict.
async fn increment(store: &InMemoryStore, p: &DocPath) -> u32 {
    let mut conflicts = 0;
    loop {
        let current = store.get(p).await.unwrap();
        let (version, n) = match &current {
            Some(doc) => (doc.version, doc.value.as_u64().unwrap()),
            None => (0, 0),
        };
        match store.compare_and_set(p, version, json!(n + 1)).await {
            Ok(_) => return conflicts,
            Err(e) if e.is_optimistic_lock() => {
                conflicts += 1;
                tokio::task::yield_now().await;
            }
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn compare_and_set_loses_no_increments() {
    let store = Arc::new(InMemoryStore::new());
    let p = DocPath::parse("counters/c").unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            let p = p.clone();
            tokio::spawn(async move {
                for _ in 0..25 {
                    increment(&store, &p).await;
                }
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    let doc = store.get(&p).await.unwrap().unwrap();
    assert_eq!(doc.value, Value::from(200u64));
    assert_eq!(doc.version, 200);
}

#[tokio::test]
async fn push_keys_sort_in_insertion_order() {
    let store = InMemoryStore::new();
    let parent = DocPath::parse("matches").unwrap();
    let mut keys = Vec::new();
    for n in 0..20 {
        keys.push(store.push(&parent, json!(n)).await.unwrap());
    }
    let listed: Vec<String> = store
        .list(&parent)
        .await
        .unwrap()
        .into_iter()
        .map(|(key, _)| key)
        .collect();
    assert_eq!(listed, keys);
}
