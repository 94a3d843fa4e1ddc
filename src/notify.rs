//! Bid notification emails.
//!
//! Each [`EmailType`] is served by one [`EmailStrategy`]. The strategy fills
//! in the hooks (required data keys, audience, subject, body) and inherits
//! the fixed send flow from [`EmailStrategy::send`]: check the data bundle,
//! look up recipients, render, deliver, report. A bundle missing a required
//! key is refused before any lookup or delivery happens.
//!
//! [`Notifier`] is the facade the application calls; it picks the strategy
//! from a fixed registry and supplies the directory and transport.
use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{info, warn};

use super::actor::Actor;
use super::bid::Bid;
use super::error::NotifyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmailType {
    BidCreated,
    BidApproved,
    BidRejected,
    DeadlineExtended,
}

/// Who an email goes to, resolved by a [`RecipientDirectory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Admins,
    BidOwner,
    InterestedProviders,
}

#[derive(Debug, Clone)]
pub struct EmailData {
    pub bid: Bid,
    pub actor: Actor,
    pub data: BTreeMap<String, String>, // template specific values
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendResult {
    pub success: bool,
    pub sent_count: usize,
    pub recipients: Vec<String>,
    pub tracking: BTreeMap<String, String>,
}

pub trait RecipientDirectory: Send + Sync {
    fn lookup(&self, audience: Audience, bid: &Bid) -> Vec<String>;
}

pub trait MailTransport: Send + Sync {
    fn deliver(&self, message: &EmailMessage) -> anyhow::Result<()>;
}

pub trait EmailStrategy: Send + Sync {
    fn email_type(&self) -> EmailType;

    fn audience(&self) -> Audience;

    fn subject(&self, data: &EmailData) -> String;

    fn body(&self, data: &EmailData) -> String;

    /// Keys that must be present and non-blank in [`EmailData::data`].
    fn required_keys(&self) -> &'static [&'static str] {
        &[]
    }

    fn validate(&self, data: &EmailData) -> Result<(), NotifyError> {
        for key in self.required_keys() {
            let present = data.data.get(*key).is_some_and(|v| !v.trim().is_empty());
            if !present {
                return Err(NotifyError::MissingData(*key));
            }
        }
        Ok(())
    }

    fn tracking(&self, data: &EmailData) -> BTreeMap<String, String> {
        let mut tracking = BTreeMap::new();
        tracking.insert("email_type".to_string(), type_label(self.email_type()).to_string());
        tracking.insert("bid_id".to_string(), bid_label(&data.bid));
        tracking.insert("actor_id".to_string(), data.actor.id.clone());
        tracking
    }

    /// The send flow shared by every email type.
    fn send(
        &self,
        data: &EmailData,
        directory: &dyn RecipientDirectory,
        transport: &dyn MailTransport,
    ) -> Result<SendResult, NotifyError> {
        self.validate(data)?;

        let recipients = directory.lookup(self.audience(), &data.bid);
        if recipients.is_empty() {
            return Err(NotifyError::NoRecipients(type_label(self.email_type())));
        }

        let subject = self.subject(data);
        let body = self.body(data);

        let mut sent_count = 0;
        for to in &recipients {
            let message = EmailMessage {
                to: to.clone(),
                subject: subject.clone(),
                body: body.clone(),
            };
            match transport.deliver(&message) {
                Ok(()) => sent_count += 1,
                Err(e) => warn!(to = %to, error = %e, "email delivery failed"),
            }
        }

        let mut tracking = self.tracking(data);
        tracking.insert("sent".to_string(), sent_count.to_string());

        info!(
            email_type = type_label(self.email_type()),
            sent_count,
            recipients = recipients.len(),
            "notification sent"
        );

        Ok(SendResult {
            success: sent_count == recipients.len(),
            sent_count,
            recipients,
            tracking,
        })
    }
}

fn bid_label(bid: &Bid) -> String {
    bid.id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "unsaved".to_string())
}

fn type_label(email_type: EmailType) -> &'static str {
    match email_type {
        EmailType::BidCreated => "bid_created",
        EmailType::BidApproved => "bid_approved",
        EmailType::BidRejected => "bid_rejected",
        EmailType::DeadlineExtended => "deadline_extended",
    }
}

// =========================================================================
// Strategies
// =========================================================================
pub struct BidCreatedEmail;

impl EmailStrategy for BidCreatedEmail {
    fn email_type(&self) -> EmailType {
        EmailType::BidCreated
    }
    fn audience(&self) -> Audience {
        Audience::Admins
    }
    fn subject(&self, data: &EmailData) -> String {
        format!("New bid awaiting review: {}", data.bid.name)
    }
    fn body(&self, data: &EmailData) -> String {
        format!(
            "Bid '{}' ({}) was submitted by {} and is awaiting review.",
            data.bid.name,
            bid_label(&data.bid),
            data.actor.id
        )
    }
}

pub struct BidApprovedEmail;

impl EmailStrategy for BidApprovedEmail {
    fn email_type(&self) -> EmailType {
        EmailType::BidApproved
    }
    fn audience(&self) -> Audience {
        Audience::BidOwner
    }
    fn subject(&self, data: &EmailData) -> String {
        format!("Bid approved: {}", data.bid.name)
    }
    fn body(&self, data: &EmailData) -> String {
        format!("Your bid '{}' has been approved and published.", data.bid.name)
    }
}

pub struct BidRejectedEmail;

impl EmailStrategy for BidRejectedEmail {
    fn email_type(&self) -> EmailType {
        EmailType::BidRejected
    }
    fn audience(&self) -> Audience {
        Audience::BidOwner
    }
    fn required_keys(&self) -> &'static [&'static str] {
        &["rejection_notes"]
    }
    fn subject(&self, data: &EmailData) -> String {
        format!("Bid rejected: {}", data.bid.name)
    }
    fn body(&self, data: &EmailData) -> String {
        let notes = data.data.get("rejection_notes").map(String::as_str).unwrap_or_default();
        format!(
            "Your bid '{}' was rejected.\n\nReviewer notes:\n{}",
            data.bid.name, notes
        )
    }
}

pub struct DeadlineExtendedEmail;

impl EmailStrategy for DeadlineExtendedEmail {
    fn email_type(&self) -> EmailType {
        EmailType::DeadlineExtended
    }
    fn audience(&self) -> Audience {
        Audience::InterestedProviders
    }
    fn required_keys(&self) -> &'static [&'static str] {
        &["new_deadline"]
    }
    fn subject(&self, data: &EmailData) -> String {
        format!("Deadline extended: {}", data.bid.name)
    }
    fn body(&self, data: &EmailData) -> String {
        let deadline = data.data.get("new_deadline").map(String::as_str).unwrap_or_default();
        format!(
            "The submission deadline for '{}' has been extended to {}.",
            data.bid.name, deadline
        )
    }
}

static BID_CREATED: BidCreatedEmail = BidCreatedEmail;
static BID_APPROVED: BidApprovedEmail = BidApprovedEmail;
static BID_REJECTED: BidRejectedEmail = BidRejectedEmail;
static DEADLINE_EXTENDED: DeadlineExtendedEmail = DeadlineExtendedEmail;

impl EmailType {
    pub fn strategy(self) -> &'static dyn EmailStrategy {
        match self {
            EmailType::BidCreated => &BID_CREATED,
            EmailType::BidApproved => &BID_APPROVED,
            EmailType::BidRejected => &BID_REJECTED,
            EmailType::DeadlineExtended => &DEADLINE_EXTENDED,
        }
    }
}

// =========================================================================
// Facade
// =========================================================================
pub struct Notifier {
    directory: Arc<dyn RecipientDirectory>,
    transport: Arc<dyn MailTransport>,
}

impl Notifier {
    pub fn new(directory: Arc<dyn RecipientDirectory>, transport: Arc<dyn MailTransport>) -> Self {
        Self {
            directory,
            transport,
        }
    }

    pub fn send(&self, email_type: EmailType, data: &EmailData) -> Result<SendResult, NotifyError> {
        email_type
            .strategy()
            .send(data, self.directory.as_ref(), self.transport.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::actor::ActorRole;
    use crate::bid::BidId;

    struct FixedDirectory(Vec<String>);

    impl RecipientDirectory for FixedDirectory {
        fn lookup(&self, _audience: Audience, _bid: &Bid) -> Vec<String> {
            self.0.clone()
        }
    }

    #[derive(Default)]
    struct Outbox {
        sent: Mutex<Vec<EmailMessage>>,
        reject: Option<String>,
    }

    impl MailTransport for Outbox {
        fn deliver(&self, message: &EmailMessage) -> anyhow::Result<()> {
            if self.reject.as_deref() == Some(message.to.as_str()) {
                anyhow::bail!("mailbox unavailable");
            }
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    fn data(pairs: &[(&str, &str)]) -> EmailData {
        EmailData {
            bid: Bid::new().set_id(BidId::from("bid_42")).set_name("Clinic expansion"),
            actor: Actor::new("user_admin", ActorRole::Admin),
            data: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn rejection_body_carries_the_notes() {
        let outbox = Arc::new(Outbox::default());
        let notifier = Notifier::new(
            Arc::new(FixedDirectory(vec!["owner@example.org".into()])),
            outbox.clone(),
        );

        let result = notifier
            .send(
                EmailType::BidRejected,
                &data(&[("rejection_notes", "Budget lines are incomplete")]),
            )
            .unwrap();

        assert!(result.success);
        assert_eq!(result.sent_count, 1);
        assert_eq!(result.tracking.get("bid_id").map(String::as_str), Some("bid_42"));

        let sent = outbox.sent.lock().unwrap();
        assert!(sent[0].body.contains("Budget lines are incomplete"));
    }

    #[test]
    fn blank_required_value_counts_as_missing() {
        let strategy = EmailType::DeadlineExtended.strategy();

        assert_eq!(
            strategy.validate(&data(&[("new_deadline", "  ")])),
            Err(NotifyError::MissingData("new_deadline"))
        );
    }

    #[test]
    fn partial_delivery_is_not_a_success() {
        let outbox = Arc::new(Outbox {
            reject: Some("b@example.org".into()),
            ..Default::default()
        });
        let notifier = Notifier::new(
            Arc::new(FixedDirectory(vec!["a@example.org".into(), "b@example.org".into()])),
            outbox,
        );

        let result = notifier.send(EmailType::BidCreated, &data(&[])).unwrap();

        assert!(!result.success);
        assert_eq!(result.sent_count, 1);
        assert_eq!(result.recipients.len(), 2);
    }

    #[test]
    fn no_recipients_is_an_error() {
        let notifier = Notifier::new(Arc::new(FixedDirectory(vec![])), Arc::new(Outbox::default()));

        assert_eq!(
            notifier.send(EmailType::BidApproved, &data(&[])),
            Err(NotifyError::NoRecipients("bid_approved"))
        );
    }
}
