//! Snapshot a validation run reads from
use chrono::Utc;

use super::actor::Actor;
use super::bid::{Bid, TimeStamp};
use super::settings::Settings;

#[derive(Debug, Clone)]
pub struct ValidationContext {
    pub proposed: Option<Bid>, // the only field rules may touch, via Rule::normalize
    pub prior: Option<Bid>,    // persisted state, present on update
    pub settings: Settings,
    pub actor: Option<Actor>,
    pub now: TimeStamp<Utc>,
}

impl ValidationContext {
    pub fn new(proposed: Bid, settings: Settings) -> Self {
        Self {
            proposed: Some(proposed),
            prior: None,
            settings,
            actor: None,
            now: TimeStamp::new(),
        }
    }
    /// A context without a proposed bid. Every chain rejects it at its guard.
    pub fn empty(settings: Settings) -> Self {
        Self {
            proposed: None,
            prior: None,
            settings,
            actor: None,
            now: TimeStamp::new(),
        }
    }
    pub fn with_prior(mut self, prior: Bid) -> Self {
        self.prior = Some(prior);
        self
    }
    pub fn with_actor(mut self, actor: Actor) -> Self {
        self.actor = Some(actor);
        self
    }
    /// Pin the clock, mostly for tests.
    pub fn with_now(mut self, now: TimeStamp<Utc>) -> Self {
        self.now = now;
        self
    }
    pub fn is_update(&self) -> bool {
        self.prior.is_some()
    }
    pub fn is_draft(&self) -> bool {
        self.proposed.as_ref().is_some_and(|bid| bid.is_draft)
    }
    pub fn proposed(&self) -> Option<&Bid> {
        self.proposed.as_ref()
    }
    pub fn prior(&self) -> Option<&Bid> {
        self.prior.as_ref()
    }
    pub fn actor(&self) -> Option<&Actor> {
        self.actor.as_ref()
    }
    /// Hand the (possibly normalised) proposal back to the caller.
    pub fn into_proposed(self) -> Option<Bid> {
        self.proposed
    }
}
