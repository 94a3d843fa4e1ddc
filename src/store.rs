//! Repository boundary the validation core reads from.
//!
//! The core itself never writes: [`BidRepository`] is the read-only view a
//! context is built from. [`SledRepository`] is the reference adapter the
//! surrounding application persists through; records are cbor-encoded and
//! each bid is stored next to the sha256 digest of its encoding.
use std::sync::Arc;

use chrono::Utc;
use sled::{Batch, Db};
use tracing::debug;

use super::actor::Actor;
use super::bid::{Bid, BidId, TimeStamp};
use super::context::ValidationContext;
use super::error::StoreError;
use super::settings::Settings;

const SETTINGS_KEY: &[u8] = b"settings";

pub trait BidRepository {
    fn find_bid(&self, id: &BidId) -> Result<Option<Bid>, StoreError>;
    fn settings(&self) -> Result<Settings, StoreError>;
}

pub struct SledRepository {
    instance: Arc<Db>,
}

fn bid_key(id: &BidId) -> Vec<u8> {
    format!("bid:{}", id).into_bytes()
}

fn revision_key(id: &BidId) -> Vec<u8> {
    format!("rev:{}", id).into_bytes()
}

impl SledRepository {
    pub fn new(instance: Arc<Db>) -> Self {
        Self { instance }
    }

    /// Persist a bid. The bid must already carry its id.
    pub fn save_bid(&self, bid: &Bid) -> Result<String, StoreError> {
        let Some(id) = bid.id.as_ref() else {
            return Err(StoreError::MissingId);
        };
        let contents = minicbor::to_vec(bid)?;
        let digest = sha256::digest(&contents);

        // bid and its revision digest land together or not at all
        let mut batch = Batch::default();
        batch.insert(bid_key(id), contents);
        batch.insert(revision_key(id), digest.as_bytes());
        self.instance.apply_batch(batch)?;

        debug!(bid = %id, revision = %digest, "bid saved");
        Ok(digest)
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        self.instance
            .insert(SETTINGS_KEY, minicbor::to_vec(settings)?)?;
        Ok(())
    }

    /// Digest of the currently stored encoding of bid `id`.
    pub fn revision(&self, id: &BidId) -> Result<Option<String>, StoreError> {
        let Some(raw) = self.instance.get(revision_key(id))? else {
            return Ok(None);
        };
        Ok(Some(String::from_utf8_lossy(&raw).into_owned()))
    }
}

impl BidRepository for SledRepository {
    fn find_bid(&self, id: &BidId) -> Result<Option<Bid>, StoreError> {
        match self.instance.get(bid_key(id))? {
            Some(raw) => Ok(Some(minicbor::decode(&raw)?)),
            None => Ok(None),
        }
    }

    fn settings(&self) -> Result<Settings, StoreError> {
        match self.instance.get(SETTINGS_KEY)? {
            Some(raw) => Ok(minicbor::decode(&raw)?),
            None => {
                debug!("no stored settings, falling back to defaults");
                Ok(Settings::default())
            }
        }
    }
}

/// Build a [`ValidationContext`] for `proposed`.
///
/// When the proposal carries an id the persisted bid is loaded as the prior
/// state, making the context an update; a dangling id is an error.
pub fn load_context<R: BidRepository + ?Sized>(
    repo: &R,
    proposed: Bid,
    actor: Option<Actor>,
) -> Result<ValidationContext, StoreError> {
    let settings = repo.settings()?;

    let prior = match proposed.id.as_ref() {
        Some(id) => Some(
            repo.find_bid(id)?
                .ok_or_else(|| StoreError::BidNotFound(id.clone()))?,
        ),
        None => None,
    };

    Ok(ValidationContext {
        proposed: Some(proposed),
        prior,
        settings,
        actor,
        now: TimeStamp::<Utc>::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bid::RegionId;
    use tempfile::tempdir;

    fn repository() -> anyhow::Result<(tempfile::TempDir, SledRepository)> {
        let temp_dir = tempdir()?;
        let db = sled::open(temp_dir.path().join("bids.db"))?;
        Ok((temp_dir, SledRepository::new(Arc::new(db))))
    }

    #[test]
    fn bid_round_trips_and_revision_tracks_content() -> anyhow::Result<()> {
        let (_dir, repo) = repository()?;
        let id = BidId::new()?;
        let bid = Bid::new().set_id(id.clone()).set_name("Well drilling").add_region(RegionId(4));

        let first = repo.save_bid(&bid)?;
        assert_eq!(repo.find_bid(&id)?, Some(bid.clone()));
        assert_eq!(repo.revision(&id)?, Some(first.clone()));

        let second = repo.save_bid(&bid.set_name("Well drilling, phase 2"))?;
        assert_ne!(first, second);
        assert_eq!(repo.revision(&id)?, Some(second));
        Ok(())
    }

    #[test]
    fn saving_without_id_is_refused() -> anyhow::Result<()> {
        let (_dir, repo) = repository()?;

        assert!(matches!(repo.save_bid(&Bid::new()), Err(StoreError::MissingId)));
        Ok(())
    }

    #[test]
    fn settings_default_until_saved() -> anyhow::Result<()> {
        let (_dir, repo) = repository()?;
        assert_eq!(repo.settings()?, Settings::default());

        let custom = Settings::new().set_stopping_period_days(21);
        repo.save_settings(&custom)?;
        assert_eq!(repo.settings()?, custom);
        Ok(())
    }

    #[test]
    fn context_for_known_id_is_an_update() -> anyhow::Result<()> {
        let (_dir, repo) = repository()?;
        let id = BidId::new()?;
        repo.save_bid(&Bid::new().set_id(id.clone()).set_name("Original"))?;

        let ctx = load_context(&repo, Bid::new().set_id(id).set_name("Edited"), None)?;

        assert!(ctx.is_update());
        assert_eq!(ctx.prior().map(|b| b.name.as_str()), Some("Original"));
        Ok(())
    }

    #[test]
    fn context_for_unknown_id_fails() -> anyhow::Result<()> {
        let (_dir, repo) = repository()?;

        let result = load_context(&repo, Bid::new().set_id(BidId::from("bid_missing")), None);

        assert!(matches!(result, Err(StoreError::BidNotFound(_))));
        Ok(())
    }
}
