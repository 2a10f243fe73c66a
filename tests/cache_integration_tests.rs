//! Integration tests for the public cache API.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::thread;

use serde::{Deserialize, Serialize};
use serde_json::json;

use tiny_lru::console::{Command, ConsoleCache};
use tiny_lru::{CopyMode, Copier, LruCache, LruConfig, LruError, SharedLruCache};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Profile {
    name: String,
    scores: Vec<u32>,
    attributes: HashMap<String, String>,
}

fn profile() -> Profile {
    let mut attributes = HashMap::new();
    attributes.insert("team".to_string(), "red".to_string());
    Profile {
        name: "ada".to_string(),
        scores: vec![3, 1, 4],
        attributes,
    }
}

// == Capacity And Order ==

#[test]
fn test_capacity_bound_holds_after_every_set() {
    let mut cache = LruCache::new(5);
    for i in 0..50u32 {
        cache.set(i % 17, i);
        assert!(cache.len() <= 5);
    }
    assert_eq!(cache.len(), 5);
}

#[test]
fn test_recency_refresh_via_get() {
    let mut cache = LruCache::new(2);
    cache.set("a", 1u32).set("b", 2);
    assert_eq!(cache.get("a"), Some(1));
    cache.set("c", 3);

    assert!(!cache.has("b"));
    assert!(cache.has("a"));
    assert!(cache.has("c"));
    assert_eq!(cache.keys().copied().collect::<Vec<_>>(), vec!["c", "a"]);
}

#[test]
fn test_empty_cache_noops() {
    let mut cache: LruCache<String, u32> = LruCache::new(3);
    cache.evict();
    assert!(cache.remove("missing").is_none());
    assert!(cache.delete("missing").is_none());
    assert!(cache.is_empty());
    assert!(cache.most_recent().is_none());
    assert!(cache.least_recent().is_none());
}

// == Value Isolation ==

#[test]
fn test_composite_value_isolation() {
    let mut cache = LruCache::new(10);
    let mut original = profile();
    cache.set("x".to_string(), original.clone());

    original.scores.push(99);
    let mut returned = cache.get("x").unwrap();
    assert_eq!(returned, profile());

    returned.name = "mutated".to_string();
    assert_eq!(cache.get("x").unwrap().name, "ada");
}

#[test]
fn test_shared_handles_are_copied_in_deep_mode() {
    let mut cache = LruCache::new(10);
    let handle = Rc::new(RefCell::new(profile()));
    cache.set("x".to_string(), Rc::clone(&handle));

    handle.borrow_mut().scores.clear();

    let stored = cache.get("x").unwrap();
    assert!(!Rc::ptr_eq(&stored, &handle));
    assert_eq!(RefCell::borrow(&stored).scores, vec![3, 1, 4]);
}

#[test]
fn test_custom_copier_runs_on_every_crossing() {
    fn tagged(value: &String) -> String {
        format!("{}+", value)
    }

    let mut cache = LruCache::with_copier(4, Copier::<String>::custom(tagged));
    cache.set("k", "v".to_string());

    // set copies once; get copies for the caller and once more to re-store
    assert_eq!(cache.peek("k").as_deref(), Some("v++"));
    assert_eq!(cache.get("k").as_deref(), Some("v++"));
    assert_eq!(cache.peek("k").as_deref(), Some("v+++"));
}

// == Configuration ==

#[test]
fn test_from_config() {
    let config = LruConfig {
        capacity: 2,
        copy_mode: CopyMode::Shallow,
    };
    let cache: LruCache<String, u32> = LruCache::from_config(&config);

    assert_eq!(cache.capacity(), 2);
    assert_eq!(cache.copier().mode(), CopyMode::Shallow);
}

// == Dump ==

#[test]
fn test_dump_text_and_state() {
    let mut cache = LruCache::new(3);
    cache
        .set("a".to_string(), json!({"n": 1}))
        .set("b".to_string(), json!([1, 2]));

    let text = cache.dump(true).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(text.as_text().unwrap()).unwrap();
    assert_eq!(parsed["table"]["a"]["value"], json!({"n": 1}));
    assert_eq!(parsed["most_recent"], "b");

    let state = cache.dump(false).unwrap().into_state().unwrap();
    cache.set("a".to_string(), json!(null));
    assert_eq!(state.table["a"].value, json!({"n": 1}));
    assert_eq!(state.keys_by_recency(), vec!["b", "a"]);
}

#[test]
fn test_dump_text_error_is_reported() {
    let mut cache: LruCache<Vec<u8>, u8> = LruCache::new(3);
    cache.set(vec![1], 1);

    assert!(matches!(cache.dump(true), Err(LruError::Serialization(_))));
}

// == Shared Wrapper ==

#[test]
fn test_shared_cache_across_threads() {
    let shared = SharedLruCache::new(LruCache::new(8));

    let writers: Vec<_> = (0..4u32)
        .map(|t| {
            let shared = shared.clone();
            thread::spawn(move || {
                for i in 0..100u32 {
                    shared.set((t, i % 10), i);
                    let _ = shared.get(&(t, (i + 3) % 10));
                    let _ = shared.has(&(t, i % 5));
                }
            })
        })
        .collect();

    for writer in writers {
        writer.join().unwrap();
    }

    assert_eq!(shared.len(), 8);
    let snapshot = shared.with(|cache| cache.snapshot());
    assert_eq!(snapshot.keys_by_recency().len(), 8);
    assert_eq!(shared.stats().total_entries, 8);
}

// == Console ==

#[test]
fn test_console_round() {
    let mut cache = ConsoleCache::new(2);
    let lines = ["set a {\"x\": 1}", "set b 2", "get a", "set c 3", "has b", "len"];

    let replies: Vec<String> = lines
        .iter()
        .map(|line| {
            Command::parse(line)
                .unwrap()
                .unwrap()
                .execute(&mut cache)
                .unwrap()
        })
        .collect();

    assert_eq!(replies, vec!["OK", "OK", r#"{"x":1}"#, "OK", "false", "2"]);
}

#[test]
fn test_console_rejects_bad_input() {
    assert!(matches!(
        Command::parse("set k not-json"),
        Err(LruError::InvalidCommand(_))
    ));
}
