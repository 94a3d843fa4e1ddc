//! The identity a validation run is performed on behalf of
use super::utils::new_uuid_to_bech32;

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorRole {
    #[n(0)]
    Association, // the submitting organisation
    #[n(1)]
    Donor,
    #[n(2)]
    Admin,
    #[n(3)]
    SuperAdmin,
    #[n(4)]
    Provider,
    #[n(5)]
    Visitor,
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    #[n(0)]
    pub id: String, // bech32 encoded uuid7
    #[n(1)]
    pub role: ActorRole,
}

impl ActorRole {
    /// Roles allowed to create or edit bids at all.
    pub fn can_manage_bids(&self) -> bool {
        matches!(
            self,
            ActorRole::Association | ActorRole::Donor | ActorRole::Admin | ActorRole::SuperAdmin
        )
    }
    pub fn is_admin(&self) -> bool {
        matches!(self, ActorRole::Admin | ActorRole::SuperAdmin)
    }
}

impl Actor {
    pub fn new(id: impl Into<String>, role: ActorRole) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }
    /// Mint an actor with a fresh `user_` identifier.
    pub fn generate(role: ActorRole) -> anyhow::Result<Self> {
        Ok(Self::new(new_uuid_to_bech32("user_")?, role))
    }
}
