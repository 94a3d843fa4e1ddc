//! Bid-document price breakdown.
//!
//! The platform (Tanafos) fee is a percentage of the association fee, raised
//! to the configured minimum and optionally capped. VAT applies to the sum.
use rust_decimal::Decimal;

use super::bid::Amount;
use super::error::ErrorCode;
use super::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBreakdown {
    pub association_fee: Amount,
    pub tanafos_fee: Amount,
    pub subtotal: Amount,
    pub vat: Amount,
    pub total: Amount,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    #[error("Association fee {0} is negative")]
    NegativeAssociationFee(Amount),
    #[error("Total bid document price {total} exceeds the maximum {max}")]
    ExceedsMaximum { total: Amount, max: Amount },
}

impl PriceError {
    pub fn code(&self) -> ErrorCode {
        match self {
            PriceError::NegativeAssociationFee(_) => ErrorCode::AssociationFeesNegative,
            PriceError::ExceedsMaximum { .. } => ErrorCode::AssociationFeesExceedMaximum,
        }
    }
}

pub struct PriceCalculator;

impl PriceCalculator {
    pub fn tanafos_fee(association_fee: Amount, settings: &Settings) -> Amount {
        let mut fee = association_fee.0 * settings.tanafos_rate();

        if fee < settings.min_tanafos_fee.0 {
            fee = settings.min_tanafos_fee.0;
        }
        if let Some(max) = settings.max_tanafos_fee {
            fee = fee.min(max.0);
        }

        Amount(fee)
    }

    pub fn calculate(association_fee: Amount, settings: &Settings) -> Result<PriceBreakdown, PriceError> {
        if association_fee.is_negative() {
            return Err(PriceError::NegativeAssociationFee(association_fee));
        }

        let tanafos_fee = Self::tanafos_fee(association_fee, settings);
        let subtotal = association_fee.0 + tanafos_fee.0;
        let vat = subtotal * settings.vat_rate();
        let total = subtotal + vat;

        let max = settings.max_bid_document_price;
        if total > max.0 {
            return Err(PriceError::ExceedsMaximum {
                total: Amount(total),
                max,
            });
        }

        Ok(PriceBreakdown {
            association_fee,
            tanafos_fee,
            subtotal: Amount(subtotal),
            vat: Amount(vat.normalize()),
            total: Amount(total.normalize()),
        })
    }
}

impl PriceBreakdown {
    /// Total rounded to two decimal places for display.
    pub fn rounded_total(&self) -> Decimal {
        self.total.0.round_dp(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimum_tanafos_applies_to_small_fees() {
        let fee = PriceCalculator::tanafos_fee(Amount::from(200), &Settings::default());

        assert_eq!(fee.0, Decimal::from(50));
    }

    #[test]
    fn tanafos_cap_applies_when_configured() {
        let settings = Settings::new().set_max_tanafos_fee(300);

        let fee = PriceCalculator::tanafos_fee(Amount::from(50_000), &settings);

        assert_eq!(fee.0, Decimal::from(300));
    }

    #[test]
    fn zero_vat_leaves_subtotal_as_total() {
        let settings = Settings::new().set_vat_percentage(0);

        let price = PriceCalculator::calculate(Amount::from(2_000), &settings).unwrap();

        assert_eq!(price.total.0, price.subtotal.0);
        assert_eq!(price.tanafos_fee.0, Decimal::from(100));
    }

    #[test]
    fn fractional_totals_round_to_cents() {
        // 1001 + 50.05 tanafos = 1051.05, vat 157.6575, total 1208.7075
        let price = PriceCalculator::calculate(Amount::from(1_001), &Settings::default()).unwrap();

        assert_eq!(price.total.0, Decimal::new(12087075, 4));
        assert_eq!(price.rounded_total(), Decimal::new(120871, 2));
    }

    #[test]
    fn negative_fee_maps_to_its_code() {
        let err = PriceCalculator::calculate(Amount::from(-1), &Settings::default()).unwrap_err();

        assert_eq!(err.code(), ErrorCode::AssociationFeesNegative);
    }
}
