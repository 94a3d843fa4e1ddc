//! Fail-fast rule chains.
//!
//! A chain owns an immutable, ordered list of rules and walks it with a plain
//! loop: rule `i + 1` only runs when rule `i` passed. The first failure is
//! final for that run and is returned attributed to the rule that produced
//! it. Panics raised by a rule are not caught; they signal a programming
//! error, not a validation failure.
use std::sync::Arc;

use tracing::{debug, warn};

use super::context::ValidationContext;
use super::outcome::ValidationOutcome;
use super::rules::{Rule, RuleKey};

#[derive(Clone, Default)]
pub struct RuleChain {
    rules: Vec<Arc<dyn Rule>>,
}

/// Assembles a [`RuleChain`]; equivalent to handing `RuleChain::new` a list.
#[derive(Default)]
pub struct ChainBuilder {
    rules: Vec<Arc<dyn Rule>>,
}

impl RuleChain {
    pub fn new(rules: Vec<Arc<dyn Rule>>) -> Self {
        Self { rules }
    }

    pub fn from_keys(keys: &[RuleKey]) -> Self {
        Self::new(keys.iter().map(|key| key.rule()).collect())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule names in execution order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Run every rule in order against `ctx`, stopping at the first failure.
    ///
    /// Before a rule is evaluated its normalisation step is applied to the
    /// proposed bid, so later rules and the caller see the tidied payload.
    pub fn run(&self, ctx: &mut ValidationContext) -> ValidationOutcome {
        for rule in &self.rules {
            if let Some(bid) = ctx.proposed.as_mut() {
                rule.normalize(bid);
            }

            let outcome = rule.evaluate(ctx);
            if !outcome.is_valid() {
                warn!(
                    rule = rule.name(),
                    code = outcome.error_code().map(|c| c.as_str()),
                    "bid validation failed"
                );
                return outcome.attributed_to(rule.name());
            }

            debug!(rule = rule.name(), "rule passed");
        }

        ValidationOutcome::success()
    }
}

impl std::fmt::Debug for RuleChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleChain")
            .field("rules", &self.rule_names())
            .finish()
    }
}

impl ChainBuilder {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn then(mut self, rule: Arc<dyn Rule>) -> Self {
        self.rules.push(rule);
        self
    }
    pub fn then_key(self, key: RuleKey) -> Self {
        self.then(key.rule())
    }
    /// Insert at `index`, appending when the index is past the end.
    pub fn insert(mut self, index: usize, rule: Arc<dyn Rule>) -> Self {
        let index = index.min(self.rules.len());
        self.rules.insert(index, rule);
        self
    }
    pub fn build(self) -> RuleChain {
        RuleChain::new(self.rules)
    }
}
