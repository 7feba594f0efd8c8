//! Runtime orchestrator for concurrent check execution.
//!
//! - Fan-out: each check runs in its own blocking task
//! - Fan-in: `join_all` keeps definition order, then the core `Aggregator`
//!   folds the outcomes exactly as the sequential validator does
//! - Isolation: a panicking or cancelled task fails only its own check
//! - Caching: results are memoized per `(knowledge version, query, response)`

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::task::JoinError;

use lexguard_core::{
    default_checks, run_isolated, Aggregator, Check, CheckKind, CheckOutcome, KnowledgeBase,
    ValidationError, ValidationResult,
};

use crate::cache::{CacheKey, ValidationCache};
use crate::config::RuntimeConfig;
use crate::RuntimeError;

/// Validates responses concurrently against a shared knowledge base.
pub struct RuntimeValidator {
    knowledge: Arc<KnowledgeBase>,

    /// Checks in definition order
    checks: Vec<Arc<dyn Check>>,

    aggregator: Aggregator,

    cache: Option<ValidationCache>,

    config: RuntimeConfig,
}

impl RuntimeValidator {
    /// A runtime validator with the seven standard checks.
    pub fn new(knowledge: Arc<KnowledgeBase>, config: RuntimeConfig) -> Self {
        Self::with_checks(knowledge, config, default_checks())
    }

    /// A runtime validator with a custom set of checks.
    pub fn with_checks(
        knowledge: Arc<KnowledgeBase>,
        config: RuntimeConfig,
        checks: Vec<Arc<dyn Check>>,
    ) -> Self {
        let cache = (config.cache_capacity > 0)
            .then(|| ValidationCache::new(config.cache_capacity, config.cache_ttl));

        Self {
            aggregator: Aggregator::new(&knowledge.thresholds),
            knowledge,
            checks,
            cache,
            config,
        }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn cache(&self) -> Option<&ValidationCache> {
        self.cache.as_ref()
    }

    /// Validate, reporting aggregation failures as errors.
    pub async fn try_validate(
        &self,
        query: &str,
        response: &str,
    ) -> Result<ValidationResult, ValidationError> {
        if response.trim().is_empty() {
            tracing::info!("Empty response, skipping checks");
            return Ok(self.aggregator.empty_response(response));
        }

        let key = CacheKey::new(&self.knowledge.version, query, response);
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(&key).await {
                tracing::debug!("Validation cache hit");
                return Ok(hit);
            }
        }

        let outcomes = self.run_checks(query, response).await;
        let result = self.aggregator.aggregate(response, outcomes)?;

        tracing::info!(
            valid = result.is_valid,
            confidence = result.confidence,
            issues = result.issues.len(),
            sources = result.sources.len(),
            "Validation complete"
        );

        if let Some(cache) = &self.cache {
            cache.insert(key, result.clone()).await;
        }

        Ok(result)
    }

    /// Validate. Never fails: internal errors yield the fail-closed result.
    pub async fn validate(&self, query: &str, response: &str) -> ValidationResult {
        match self.try_validate(query, response).await {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(error = %err, "Validation failed, returning fallback result");
                self.aggregator.fallback(response, &err.to_string())
            }
        }
    }

    /// Validate, abandoning the call once `deadline` elapses.
    ///
    /// Checks already running on the blocking pool finish in the
    /// background; their outcomes are discarded.
    pub async fn validate_with_deadline(
        &self,
        query: &str,
        response: &str,
        deadline: Duration,
    ) -> Result<ValidationResult, RuntimeError> {
        tokio::time::timeout(deadline, self.validate(query, response))
            .await
            .map_err(|_| {
                tracing::warn!(deadline = ?deadline, "Validation deadline exceeded");
                RuntimeError::DeadlineExceeded(deadline)
            })
    }

    /// Validate under the configured default deadline, if any.
    pub async fn validate_bounded(
        &self,
        query: &str,
        response: &str,
    ) -> Result<ValidationResult, RuntimeError> {
        match self.config.deadline {
            Some(deadline) => self.validate_with_deadline(query, response, deadline).await,
            None => Ok(self.validate(query, response).await),
        }
    }

    /// Fan out every check, fan in by definition order.
    async fn run_checks(&self, query: &str, response: &str) -> Vec<CheckOutcome> {
        let query: Arc<str> = Arc::from(query);
        let response: Arc<str> = Arc::from(response);

        let tasks = self.checks.iter().map(|check| {
            let kind = check.kind();
            let check = Arc::clone(check);
            let knowledge = Arc::clone(&self.knowledge);
            let query = Arc::clone(&query);
            let response = Arc::clone(&response);

            async move {
                let joined = tokio::task::spawn_blocking(move || {
                    run_isolated(check.as_ref(), &query, &response, &knowledge)
                })
                .await;
                outcome_or_failure(kind, joined)
            }
        });

        join_all(tasks).await
    }
}

fn outcome_or_failure(kind: CheckKind, joined: Result<CheckOutcome, JoinError>) -> CheckOutcome {
    match joined {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::warn!(check = %kind, error = %err, "Check task failed, isolating failure");
            CheckOutcome::failed(kind, err.to_string())
        }
    }
}
