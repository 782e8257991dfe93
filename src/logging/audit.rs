// Audit helpers that emit facts across the destroy and query stages.
//
// Side-effects:
// - Emits JSON facts via `FactsEmitter` for `destroy.plan`, `destroy.attempt`,
//   `destroy.result`, `destroy.summary` and `query`.
// - Ensures a minimal envelope is present on every fact: `schema_version`, `ts`,
//   `plan_id`, `path`.
// - Applies redaction when the policy asks for deterministic facts.
use crate::constants::SUBSYSTEM;
use crate::logging::{redact_event, FactsEmitter};
use serde_json::{json, Value};

pub(crate) const SCHEMA_VERSION: i64 = 1;

#[derive(Clone, Debug, Default)]
pub(crate) struct AuditMode {
    pub redact: bool,
}

pub(crate) struct AuditCtx<'a> {
    pub facts: &'a dyn FactsEmitter,
    pub plan_id: String,
    pub ts: String,
    pub mode: AuditMode,
}

impl<'a> AuditCtx<'a> {
    pub(crate) fn new(
        facts: &'a dyn FactsEmitter,
        plan_id: String,
        ts: String,
        mode: AuditMode,
    ) -> Self {
        Self {
            facts,
            plan_id,
            ts,
            mode,
        }
    }
}

/// Stage for typed audit emission.
#[derive(Clone, Copy, Debug)]
pub enum Stage {
    DestroyPlan,
    DestroyAttempt,
    DestroyResult,
    DestroySummary,
    Query,
}

impl Stage {
    fn as_event(&self) -> &'static str {
        match self {
            Stage::DestroyPlan => "destroy.plan",
            Stage::DestroyAttempt => "destroy.attempt",
            Stage::DestroyResult => "destroy.result",
            Stage::DestroySummary => "destroy.summary",
            Stage::Query => "query",
        }
    }
}

/// Decision severity for audit events.
#[derive(Clone, Copy, Debug)]
pub enum Decision {
    Success,
    Failure,
}

impl Decision {
    fn as_str(&self) -> &'static str {
        match self {
            Decision::Success => "success",
            Decision::Failure => "failure",
        }
    }
}

/// Builder facade over audit emission with centralized envelope+redaction.
pub struct StageLogger<'a> {
    ctx: &'a AuditCtx<'a>,
}

impl<'a> StageLogger<'a> {
    pub(crate) fn new(ctx: &'a AuditCtx<'a>) -> Self {
        Self { ctx }
    }

    pub fn destroy_plan(&self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::DestroyPlan)
    }
    pub fn destroy_attempt(&self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::DestroyAttempt)
    }
    pub fn destroy_result(&self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::DestroyResult)
    }
    pub fn destroy_summary(&self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::DestroySummary)
    }
    pub fn query(&self) -> EventBuilder<'a> {
        EventBuilder::new(self.ctx, Stage::Query)
    }
}

pub struct EventBuilder<'a> {
    ctx: &'a AuditCtx<'a>,
    stage: Stage,
    fields: serde_json::Map<String, Value>,
}

impl<'a> EventBuilder<'a> {
    fn new(ctx: &'a AuditCtx<'a>, stage: Stage) -> Self {
        let mut fields = serde_json::Map::new();
        fields.insert("stage".to_string(), json!(stage.as_event()));
        Self { ctx, stage, fields }
    }

    pub fn step(mut self, step_id: impl Into<String>) -> Self {
        self.fields.insert("step_id".into(), json!(step_id.into()));
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.fields.insert("path".into(), json!(path.into()));
        self
    }

    pub fn field(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    pub fn merge(mut self, extra: &Value) -> Self {
        if let Some(obj) = extra.as_object() {
            for (k, v) in obj {
                self.fields.insert(k.clone(), v.clone());
            }
        }
        self
    }

    pub fn emit(self, decision: Decision) {
        let mut fields = Value::Object(self.fields);
        if let Some(obj) = fields.as_object_mut() {
            obj.entry("decision").or_insert(json!(decision.as_str()));
        }
        redact_and_emit(self.ctx, self.stage.as_event(), decision.as_str(), fields);
    }

    pub fn emit_success(self) {
        self.emit(Decision::Success);
    }
    pub fn emit_failure(self) {
        self.emit(Decision::Failure);
    }
}

fn redact_and_emit(ctx: &AuditCtx, event: &str, decision: &str, mut fields: Value) {
    if let Some(obj) = fields.as_object_mut() {
        obj.entry("schema_version").or_insert(json!(SCHEMA_VERSION));
        obj.entry("ts").or_insert(json!(ctx.ts));
        obj.entry("plan_id").or_insert(json!(ctx.plan_id));
        obj.entry("path").or_insert(json!(""));
    }
    let out = if ctx.mode.redact {
        redact_event(fields)
    } else {
        fields
    };
    ctx.facts.emit(SUBSYSTEM, event, decision, out);
}
