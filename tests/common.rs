//! Shared test helpers for the zfs-resource integration tests.
#![allow(dead_code)]

use log::Level;
use serde_json::Value;
use std::sync::{Arc, Mutex};

use zfs_resource::adapters::MemoryEngine;
use zfs_resource::logging::{AuditSink, FactsEmitter};
use zfs_resource::policy::Policy;
use zfs_resource::ZfsResource;

/// A simple in-memory emitter to capture facts during tests.
#[derive(Clone, Default, Debug)]
pub struct TestEmitter {
    pub events: Arc<Mutex<Vec<(String, String, String, Value)>>>,
}

impl FactsEmitter for TestEmitter {
    fn emit(&self, subsystem: &str, event: &str, decision: &str, fields: Value) {
        self.events
            .lock()
            .unwrap()
            .push((subsystem.into(), event.into(), decision.into(), fields));
    }
}

impl TestEmitter {
    /// Captured facts for one stage, in emission order.
    pub fn stage(&self, event: &str) -> Vec<(String, Value)> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, e, _, _)| e == event)
            .map(|(_, _, d, f)| (d.clone(), f.clone()))
            .collect()
    }
}

/// Captures audit lines so tests can assert on warnings.
#[derive(Clone, Default)]
pub struct TestAudit {
    pub lines: Arc<Mutex<Vec<(Level, String)>>>,
}

impl AuditSink for TestAudit {
    fn log(&self, level: Level, msg: &str) {
        self.lines.lock().unwrap().push((level, msg.to_string()));
    }
}

pub struct Harness {
    pub api: ZfsResource<TestEmitter, TestAudit>,
    pub engine: Arc<MemoryEngine>,
    pub facts: TestEmitter,
    pub audit: TestAudit,
}

/// Facade over a shared in-memory engine with the default policy.
pub fn harness(engine: MemoryEngine) -> Harness {
    harness_with(engine, Policy::default())
}

pub fn harness_with(engine: MemoryEngine, policy: Policy) -> Harness {
    let engine = Arc::new(engine);
    let facts = TestEmitter::default();
    let audit = TestAudit::default();
    let api = ZfsResource::new(
        facts.clone(),
        audit.clone(),
        policy,
        Box::new(Arc::clone(&engine)),
    );
    Harness {
        api,
        engine,
        facts,
        audit,
    }
}
