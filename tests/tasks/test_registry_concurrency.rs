// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Registry behavior under concurrent access
//!
//! These tests verify that:
//! - Concurrent submissions from many threads are all retained
//! - A reader never observes a result on a non-terminal record
//! - Snapshots returned by get() are isolated from later mutations

use fabstir_assist_node::tasks::{TaskKind, TaskPayload, TaskRegistry, TaskStatus};
use serde_json::json;
use std::sync::Arc;
use std::thread;
use uuid::Uuid;

fn payload() -> TaskPayload {
    TaskPayload {
        model: "llama3".to_string(),
        messages: vec![],
        stream: false,
        url: None,
        search_query: None,
        options: None,
        images: None,
        input: None,
        truncate: None,
    }
}

#[test]
fn test_concurrent_submissions_all_retained() {
    let registry = Arc::new(TaskRegistry::new(3600, 10_000));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = registry.clone();
            thread::spawn(move || {
                for _ in 0..25 {
                    registry
                        .create(Uuid::new_v4(), TaskKind::Embed, payload())
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(registry.len(), 200);
}

#[test]
fn test_reader_never_sees_result_on_non_terminal_record() {
    let registry = Arc::new(TaskRegistry::new(3600, 1000));
    let id = Uuid::new_v4();
    registry.create(id, TaskKind::Embed, payload()).unwrap();

    let reader_registry = registry.clone();
    let reader = thread::spawn(move || {
        loop {
            let record = reader_registry.get(id).unwrap();
            if record.result.is_some() {
                // Result is only ever visible together with a terminal status
                assert!(record.status.is_terminal());
            }
            if record.status.is_terminal() {
                break;
            }
            thread::yield_now();
        }
    });

    registry.mark_running(id).unwrap();
    registry
        .complete(id, TaskStatus::Done, json!({"embeddings": [[0.5]]}))
        .unwrap();

    reader.join().unwrap();
}

#[test]
fn test_snapshots_are_isolated_from_later_mutations() {
    let registry = TaskRegistry::new(3600, 1000);
    let id = Uuid::new_v4();
    registry.create(id, TaskKind::SearchWeb, payload()).unwrap();

    let before = registry.get(id).unwrap();

    registry.mark_running(id).unwrap();
    registry
        .complete(id, TaskStatus::Failed, json!({"error": "boom"}))
        .unwrap();

    assert_eq!(before.status, TaskStatus::Scheduled);
    assert!(before.result.is_none());

    let after = registry.get(id).unwrap();
    assert_eq!(after.status, TaskStatus::Failed);
}
