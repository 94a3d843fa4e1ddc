//! Error families.
//!
//! Business-rule failures are described by [`ErrorCode`] and travel as data
//! inside a [`ValidationOutcome`](crate::outcome::ValidationOutcome). The
//! other enums here are ordinary `Err` values for the collaborators around
//! the validation core.
use super::bid::BidId;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    #[error("Validation context is missing the proposed bid")]
    ContextInvalid,
    #[error("No authenticated user")]
    NotAuthenticated,
    #[error("User is not allowed to manage bids")]
    NotAuthorized,
    #[error("Administrators cannot create bids, only edit existing ones")]
    AdminCannotCreate,
    #[error("Bid name is required")]
    BidNameRequired,
    #[error("Enquiry deadline, submission deadline and offer opening date are required")]
    RequiredDatesMissing,
    #[error("At least one region is required")]
    RegionsRequired,
    #[error("Last date for receiving enquiries cannot be moved into the past")]
    LastDateReceivingEnquiriesInPast,
    #[error("Offers submission date must not precede the last date for enquiries")]
    OffersSubmissionDateInvalid,
    #[error("Offers opening date must not precede the offers submission date")]
    OffersOpeningDateInvalid,
    #[error("Expected anchoring date must respect the stopping period after offers opening")]
    ExpectedAnchoringDateInvalid,
    #[error("Association fees cannot be negative")]
    AssociationFeesNegative,
    #[error("Financial insurance value is required when insurance is requested")]
    FinancialInsuranceValueRequired,
    #[error("Association fees exceed the maximum bid document price")]
    AssociationFeesExceedMaximum,
}

/// Transport-level classification a caller maps onto its own protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    NotAuthenticated,
    NotAuthorized,
    InvalidInput,
    Conflict,
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Bid {0} does not exist")]
    BidNotFound(BidId),
    #[error("Bid has no id yet")]
    MissingId,
    #[error("Stored record could not be decoded: {0}")]
    Decode(#[from] minicbor::decode::Error),
    #[error("Record could not be encoded: {0}")]
    Encode(String),
    #[error(transparent)]
    Sled(#[from] sled::Error),
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum NotifyError {
    #[error("Email data is missing required key '{0}'")]
    MissingData(&'static str),
    #[error("No recipients found for {0} email")]
    NoRecipients(&'static str),
}

impl ErrorCode {
    /// Stable identifier clients branch on.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ContextInvalid => "CONTEXT_INVALID",
            ErrorCode::NotAuthenticated => "NOT_AUTHENTICATED",
            ErrorCode::NotAuthorized => "NOT_AUTHORIZED",
            ErrorCode::AdminCannotCreate => "ADMIN_CANNOT_CREATE",
            ErrorCode::BidNameRequired => "BID_NAME_REQUIRED",
            ErrorCode::RequiredDatesMissing => "REQUIRED_DATES_MISSING",
            ErrorCode::RegionsRequired => "REGIONS_REQUIRED",
            ErrorCode::LastDateReceivingEnquiriesInPast => "LAST_DATE_RECEIVING_ENQUIRIES_IN_PAST",
            ErrorCode::OffersSubmissionDateInvalid => "OFFERS_SUBMISSION_DATE_INVALID",
            ErrorCode::OffersOpeningDateInvalid => "OFFERS_OPENING_DATE_INVALID",
            ErrorCode::ExpectedAnchoringDateInvalid => "EXPECTED_ANCHORING_DATE_INVALID",
            ErrorCode::AssociationFeesNegative => "ASSOCIATION_FEES_NEGATIVE",
            ErrorCode::FinancialInsuranceValueRequired => "FINANCIAL_INSURANCE_VALUE_REQUIRED",
            ErrorCode::AssociationFeesExceedMaximum => "ASSOCIATION_FEES_EXCEED_MAXIMUM",
        }
    }
    pub fn kind(&self) -> FailureKind {
        match self {
            ErrorCode::NotAuthenticated => FailureKind::NotAuthenticated,
            ErrorCode::NotAuthorized | ErrorCode::AdminCannotCreate => FailureKind::NotAuthorized,
            // the persisted deadline moved under the caller's feet
            ErrorCode::LastDateReceivingEnquiriesInPast => FailureKind::Conflict,
            _ => FailureKind::InvalidInput,
        }
    }
}

impl FailureKind {
    pub fn http_status(&self) -> u16 {
        match self {
            FailureKind::NotAuthenticated => 401,
            FailureKind::NotAuthorized => 403,
            FailureKind::InvalidInput => 400,
            FailureKind::Conflict => 409,
        }
    }
}

impl<E: std::fmt::Display> From<minicbor::encode::Error<E>> for StoreError {
    fn from(value: minicbor::encode::Error<E>) -> Self {
        StoreError::Encode(value.to_string())
    }
}
