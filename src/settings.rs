//! Global thresholds the rules and the price calculator read.
//!
//! A `Settings` value is a snapshot: it is carried by each
//! [`ValidationContext`](crate::context::ValidationContext) instead of being
//! looked up from shared state, so concurrent runs never observe a change
//! half-way through.
use rust_decimal::Decimal;

use super::bid::Amount;

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    #[n(0)]
    pub min_tanafos_fee: Amount,
    #[n(1)]
    pub max_tanafos_fee: Option<Amount>,
    #[n(2)]
    pub tanafos_percentage: Amount, // percent of the association fee
    #[n(3)]
    pub vat_percentage: Amount,
    #[n(4)]
    pub max_bid_document_price: Amount,
    #[n(5)]
    pub stopping_period_days: u32, // opening -> expected anchoring
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_tanafos_fee: Amount::from(50),
            max_tanafos_fee: None,
            tanafos_percentage: Amount::from(5),
            vat_percentage: Amount::from(15),
            max_bid_document_price: Amount::from(100_000),
            stopping_period_days: 10,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn set_min_tanafos_fee(mut self, fee: impl Into<Amount>) -> Self {
        self.min_tanafos_fee = fee.into();
        self
    }
    pub fn set_max_tanafos_fee(mut self, fee: impl Into<Amount>) -> Self {
        self.max_tanafos_fee = Some(fee.into());
        self
    }
    pub fn set_tanafos_percentage(mut self, percentage: impl Into<Amount>) -> Self {
        self.tanafos_percentage = percentage.into();
        self
    }
    pub fn set_vat_percentage(mut self, percentage: impl Into<Amount>) -> Self {
        self.vat_percentage = percentage.into();
        self
    }
    pub fn set_max_bid_document_price(mut self, price: impl Into<Amount>) -> Self {
        self.max_bid_document_price = price.into();
        self
    }
    pub fn set_stopping_period_days(mut self, days: u32) -> Self {
        self.stopping_period_days = days;
        self
    }
    pub(crate) fn tanafos_rate(&self) -> Decimal {
        self.tanafos_percentage.0 / Decimal::ONE_HUNDRED
    }
    pub(crate) fn vat_rate(&self) -> Decimal {
        self.vat_percentage.0 / Decimal::ONE_HUNDRED
    }
}
