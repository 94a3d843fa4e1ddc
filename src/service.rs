//! Service layer API: one pre-assembled chain per bid use case
use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use super::actor::Actor;
use super::bid::Bid;
use super::chain::RuleChain;
use super::context::ValidationContext;
use super::error::StoreError;
use super::outcome::ValidationOutcome;
use super::rules::{Rule, RuleKey};
use super::store::{BidRepository, load_context};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UseCase {
    CreateBid,
    UpdateBid,
    ApproveBid,
    ExtendDeadline,
}

impl UseCase {
    pub const ALL: [UseCase; 4] = [
        UseCase::CreateBid,
        UseCase::UpdateBid,
        UseCase::ApproveBid,
        UseCase::ExtendDeadline,
    ];

    /// Rule order for the use case. Cheapest and most fundamental gates come
    /// first: who is asking, then whether the data is there, then whether it
    /// makes sense.
    pub fn rule_keys(&self) -> &'static [RuleKey] {
        match self {
            UseCase::CreateBid | UseCase::UpdateBid => &[
                RuleKey::ContextGuard,
                RuleKey::Authorization,
                RuleKey::RequiredFields,
                RuleKey::Dates,
                RuleKey::Price,
            ],
            UseCase::ApproveBid => &[
                RuleKey::ContextGuard,
                RuleKey::Approver,
                RuleKey::RequiredFields,
                RuleKey::Dates,
                RuleKey::Price,
            ],
            UseCase::ExtendDeadline => &[
                RuleKey::ContextGuard,
                RuleKey::Authorization,
                RuleKey::Dates,
            ],
        }
    }
}

/// Facade over the named chains. Chains are built once and shared; rules
/// are stateless so one service can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct ValidationService {
    chains: HashMap<UseCase, RuleChain>,
}

impl Default for ValidationService {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationService {
    pub fn new() -> Self {
        let chains = UseCase::ALL
            .into_iter()
            .map(|use_case| (use_case, RuleChain::from_keys(use_case.rule_keys())))
            .collect();

        Self { chains }
    }

    pub fn chain(&self, use_case: UseCase) -> &RuleChain {
        // every variant is inserted by `new`
        &self.chains[&use_case]
    }

    /// Run the chain registered for `use_case`.
    pub fn validate(&self, use_case: UseCase, ctx: &mut ValidationContext) -> ValidationOutcome {
        self.chain(use_case).run(ctx)
    }

    pub fn validate_create_bid(&self, ctx: &mut ValidationContext) -> ValidationOutcome {
        self.validate(UseCase::CreateBid, ctx)
    }

    pub fn validate_update_bid(&self, ctx: &mut ValidationContext) -> ValidationOutcome {
        self.validate(UseCase::UpdateBid, ctx)
    }

    pub fn validate_approve_bid(&self, ctx: &mut ValidationContext) -> ValidationOutcome {
        self.validate(UseCase::ApproveBid, ctx)
    }

    pub fn validate_extend_deadline(&self, ctx: &mut ValidationContext) -> ValidationOutcome {
        self.validate(UseCase::ExtendDeadline, ctx)
    }

    /// Ad-hoc chain for callers that only need part of the validation.
    pub fn validate_with(
        &self,
        rules: Vec<Arc<dyn Rule>>,
        ctx: &mut ValidationContext,
    ) -> ValidationOutcome {
        RuleChain::new(rules).run(ctx)
    }

    pub fn validate_with_keys(&self, keys: &[RuleKey], ctx: &mut ValidationContext) -> ValidationOutcome {
        RuleChain::from_keys(keys).run(ctx)
    }

    /// Build the context from `repo` and validate `proposed` against it.
    ///
    /// Returns the outcome together with the normalised proposal the caller
    /// should persist on success. Store failures are errors; rule failures
    /// are in the outcome.
    pub fn validate_stored<R: BidRepository + ?Sized>(
        &self,
        repo: &R,
        use_case: UseCase,
        proposed: Bid,
        actor: Option<Actor>,
    ) -> Result<(ValidationOutcome, Bid), StoreError> {
        let mut ctx = load_context(repo, proposed, actor)?;
        let outcome = self.validate(use_case, &mut ctx);

        info!(
            ?use_case,
            update = ctx.is_update(),
            valid = outcome.is_valid(),
            "validated stored bid"
        );

        // the guard only fails on a missing proposal, which load_context never builds
        let bid = ctx.into_proposed().unwrap_or_default();
        Ok((outcome, bid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_chain_starts_with_the_guard() {
        let service = ValidationService::new();

        for use_case in UseCase::ALL {
            let chain = service.chain(use_case);

            assert!(!chain.is_empty());
            assert_eq!(chain.len(), use_case.rule_keys().len());
            assert_eq!(chain.rule_names()[0], "context_guard");
        }
    }

    #[test]
    fn create_chain_order() {
        let service = ValidationService::new();

        assert_eq!(
            service.chain(UseCase::CreateBid).rule_names(),
            vec!["context_guard", "authorization", "required_fields", "dates", "price"]
        );
    }

    #[test]
    fn extend_deadline_only_rechecks_dates() {
        let service = ValidationService::new();

        assert_eq!(
            service.chain(UseCase::ExtendDeadline).rule_names(),
            vec!["context_guard", "authorization", "dates"]
        );
    }
}
