//! Business rules a bid must pass before it can be persisted.
//!
//! Each rule is a stateless unit: it reads a [`ValidationContext`] and
//! returns a [`ValidationOutcome`]. A rule that has to tidy the payload (the
//! price rule clearing insurance fields on bid types that cannot carry them)
//! does so in [`Rule::normalize`], which the chain runs right before
//! [`Rule::evaluate`]. Rules never panic on well-shaped input; a missing
//! proposed bid is reported as `CONTEXT_INVALID`.
use std::sync::Arc;

use tracing::debug;

use super::bid::Bid;
use super::context::ValidationContext;
use super::error::ErrorCode;
use super::outcome::ValidationOutcome;

pub trait Rule: Send + Sync {
    /// Identity used in diagnostics and as the failing-rule name.
    fn name(&self) -> &'static str;

    /// Idempotent clean-up of fields that do not apply to the proposal.
    fn normalize(&self, _bid: &mut Bid) {}

    fn evaluate(&self, ctx: &ValidationContext) -> ValidationOutcome;
}

/// Fixed registry of the rules the service knows how to assemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKey {
    ContextGuard,
    Authorization,
    RequiredFields,
    Dates,
    Price,
    Approver,
}

impl RuleKey {
    pub const ALL: [RuleKey; 6] = [
        RuleKey::ContextGuard,
        RuleKey::Authorization,
        RuleKey::RequiredFields,
        RuleKey::Dates,
        RuleKey::Price,
        RuleKey::Approver,
    ];

    pub fn rule(self) -> Arc<dyn Rule> {
        match self {
            RuleKey::ContextGuard => Arc::new(ContextGuardRule),
            RuleKey::Authorization => Arc::new(AuthorizationRule),
            RuleKey::RequiredFields => Arc::new(RequiredFieldsRule),
            RuleKey::Dates => Arc::new(DatesRule),
            RuleKey::Price => Arc::new(PriceRule),
            RuleKey::Approver => Arc::new(ApproverRule),
        }
    }
}

fn missing_proposal(rule: &str) -> ValidationOutcome {
    ValidationOutcome::failure(rule, ErrorCode::ContextInvalid)
}

// =========================================================================
// Context guard: first rule of every chain
// =========================================================================
pub struct ContextGuardRule;

impl Rule for ContextGuardRule {
    fn name(&self) -> &'static str {
        "context_guard"
    }

    fn evaluate(&self, ctx: &ValidationContext) -> ValidationOutcome {
        let Some(bid) = ctx.proposed() else {
            return missing_proposal(self.name());
        };

        if let Some(prior) = ctx.prior() {
            if prior.id.is_none() || prior.id != bid.id {
                return ValidationOutcome::failure_message(
                    self.name(),
                    ErrorCode::ContextInvalid,
                    "Persisted bid does not match the proposed bid",
                );
            }
        }

        ValidationOutcome::success()
    }
}

// =========================================================================
// Authorization: who may create or edit a bid
// =========================================================================
pub struct AuthorizationRule;

impl Rule for AuthorizationRule {
    fn name(&self) -> &'static str {
        "authorization"
    }

    fn evaluate(&self, ctx: &ValidationContext) -> ValidationOutcome {
        let Some(bid) = ctx.proposed() else {
            return missing_proposal(self.name());
        };
        let Some(actor) = ctx.actor() else {
            return ValidationOutcome::failure(self.name(), ErrorCode::NotAuthenticated);
        };

        if !actor.role.can_manage_bids() {
            return ValidationOutcome::failure(self.name(), ErrorCode::NotAuthorized);
        }
        // admins only ever edit what an association or donor created
        if actor.role.is_admin() && bid.is_creation() {
            return ValidationOutcome::failure(self.name(), ErrorCode::AdminCannotCreate);
        }

        ValidationOutcome::success()
    }
}

// =========================================================================
// Approver: only administrators approve
// =========================================================================
pub struct ApproverRule;

impl Rule for ApproverRule {
    fn name(&self) -> &'static str {
        "approver"
    }

    fn evaluate(&self, ctx: &ValidationContext) -> ValidationOutcome {
        match ctx.actor() {
            None => ValidationOutcome::failure(self.name(), ErrorCode::NotAuthenticated),
            Some(actor) if !actor.role.is_admin() => ValidationOutcome::failure_message(
                self.name(),
                ErrorCode::NotAuthorized,
                "Only administrators can approve bids",
            ),
            Some(_) => ValidationOutcome::success(),
        }
    }
}

// =========================================================================
// Required fields
// =========================================================================
pub struct RequiredFieldsRule;

impl Rule for RequiredFieldsRule {
    fn name(&self) -> &'static str {
        "required_fields"
    }

    fn evaluate(&self, ctx: &ValidationContext) -> ValidationOutcome {
        let Some(bid) = ctx.proposed() else {
            return missing_proposal(self.name());
        };
        if ctx.is_draft() {
            return ValidationOutcome::success();
        }

        if bid.name.trim().is_empty() {
            return ValidationOutcome::failure(self.name(), ErrorCode::BidNameRequired);
        }
        if bid.enquiry_deadline.is_none()
            || bid.submission_deadline.is_none()
            || bid.offer_opening_date.is_none()
        {
            return ValidationOutcome::failure(self.name(), ErrorCode::RequiredDatesMissing);
        }
        if bid.regions.is_empty() {
            return ValidationOutcome::failure(self.name(), ErrorCode::RegionsRequired);
        }

        ValidationOutcome::success()
    }
}

// =========================================================================
// Dates: deadline ordering and the stopping period
// =========================================================================
pub struct DatesRule;

impl DatesRule {
    // Moving the enquiry deadline into the past is refused; leaving an already
    // passed deadline untouched is fine. Compared by calendar date.
    fn enquiry_moved_into_past(ctx: &ValidationContext, bid: &Bid) -> bool {
        let (Some(prior), Some(proposed)) = (ctx.prior(), bid.enquiry_deadline.as_ref()) else {
            return false;
        };
        let unchanged = prior
            .enquiry_deadline
            .as_ref()
            .is_some_and(|persisted| persisted.date() == proposed.date());

        !unchanged && proposed.date() < ctx.now.date()
    }
}

impl Rule for DatesRule {
    fn name(&self) -> &'static str {
        "dates"
    }

    fn evaluate(&self, ctx: &ValidationContext) -> ValidationOutcome {
        let Some(bid) = ctx.proposed() else {
            return missing_proposal(self.name());
        };
        if ctx.is_draft() {
            return ValidationOutcome::success();
        }

        if Self::enquiry_moved_into_past(ctx, bid) {
            return ValidationOutcome::failure(
                self.name(),
                ErrorCode::LastDateReceivingEnquiriesInPast,
            );
        }

        let enquiry = bid.enquiry_deadline.as_ref();
        let submission = bid.submission_deadline.as_ref();
        let opening = bid.offer_opening_date.as_ref();

        if let (Some(enquiry), Some(submission)) = (enquiry, submission) {
            if enquiry.to_datetime_utc() > submission.to_datetime_utc() {
                return ValidationOutcome::failure(
                    self.name(),
                    ErrorCode::OffersSubmissionDateInvalid,
                );
            }
        }
        if let (Some(submission), Some(opening)) = (submission, opening) {
            if submission.to_datetime_utc() > opening.to_datetime_utc() {
                return ValidationOutcome::failure(self.name(), ErrorCode::OffersOpeningDateInvalid);
            }
        }
        if let (Some(anchoring), Some(opening)) = (bid.anchoring_date.as_ref(), opening) {
            let days = i64::from(ctx.settings.stopping_period_days);
            let too_early = match opening.checked_add_days(days) {
                Some(earliest) => anchoring.date() < earliest.date(),
                None => true,
            };
            if too_early {
                return ValidationOutcome::failure_message(
                    self.name(),
                    ErrorCode::ExpectedAnchoringDateInvalid,
                    format!(
                        "Expected anchoring date must be at least {} days after offers opening",
                        days
                    ),
                );
            }
        }

        ValidationOutcome::success()
    }
}

// =========================================================================
// Price: association fee bounds and financial insurance
// =========================================================================
pub struct PriceRule;

impl Rule for PriceRule {
    fn name(&self) -> &'static str {
        "price"
    }

    fn normalize(&self, bid: &mut Bid) {
        if bid.bid_type.supports_insurance() {
            return;
        }
        if bid.insurance_required || bid.insurance_value.is_some() {
            debug!(bid_type = ?bid.bid_type, "clearing inapplicable financial insurance");
        }
        bid.insurance_required = false;
        bid.insurance_value = None;
    }

    fn evaluate(&self, ctx: &ValidationContext) -> ValidationOutcome {
        let Some(bid) = ctx.proposed() else {
            return missing_proposal(self.name());
        };

        if bid.association_fee.is_negative() {
            return ValidationOutcome::failure(self.name(), ErrorCode::AssociationFeesNegative);
        }

        // evaluated on its own the rule still ignores insurance on ineligible types
        let insurance_applies = bid.insurance_required && bid.bid_type.supports_insurance();
        if insurance_applies && !bid.insurance_value.is_some_and(|v| v.is_positive()) {
            return ValidationOutcome::failure(
                self.name(),
                ErrorCode::FinancialInsuranceValueRequired,
            );
        }

        let max = ctx.settings.max_bid_document_price;
        if bid.association_fee > max {
            return ValidationOutcome::failure_message(
                self.name(),
                ErrorCode::AssociationFeesExceedMaximum,
                format!(
                    "Association fees {} exceed the maximum bid document price {}",
                    bid.association_fee, max
                ),
            );
        }

        ValidationOutcome::success()
    }
}
