use crate::adapters::{InternalPathPredicate, StorageEngine};
use crate::logging::{AuditSink, FactsEmitter};
use crate::policy::Policy;

/// Builder for constructing a `ZfsResource` with ergonomic chaining.
pub struct ApiBuilder<E: FactsEmitter, A: AuditSink> {
    facts: E,
    audit: A,
    policy: Policy,
    engine: Box<dyn StorageEngine>,
    internal: Option<Box<dyn InternalPathPredicate>>,
}

impl<E: FactsEmitter, A: AuditSink> ApiBuilder<E, A> {
    pub fn new(facts: E, audit: A, engine: Box<dyn StorageEngine>) -> Self {
        Self {
            facts,
            audit,
            policy: Policy::default(),
            engine,
            internal: None,
        }
    }

    #[must_use]
    pub fn policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn internal_predicate(mut self, internal: Box<dyn InternalPathPredicate>) -> Self {
        self.internal = Some(internal);
        self
    }

    pub fn build(self) -> super::ZfsResource<E, A> {
        let api = super::ZfsResource::new(self.facts, self.audit, self.policy, self.engine);
        match self.internal {
            Some(p) => api.with_internal_predicate(p),
            None => api,
        }
    }
}
