//! Bid payload and the value types it is built from
use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone, Utc};
use rust_decimal::Decimal;

use super::utils::new_uuid_to_bech32;

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cbor(array)]
pub struct BidId(#[n(0)] String);

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cbor(array)]
pub struct RegionId(#[n(0)] pub u32);

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BidType {
    #[n(0)]
    Construction,
    #[n(1)]
    Operations,
    #[n(2)]
    #[default]
    Supplies,
    #[n(3)]
    Services,
    #[n(4)]
    Consulting,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct TimeStamp<T: TimeZone>(DateTime<T>);

/// Signed monetary value. Negative values are representable so that the
/// price rule can reject them instead of the type silently clamping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(pub Decimal);

// The persisted/proposed shape of a bid. `id` is absent until the bid has
// been created once.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Default, PartialEq, Eq)]
pub struct Bid {
    #[n(0)]
    pub id: Option<BidId>,
    #[n(1)]
    pub name: String,
    #[n(2)]
    pub enquiry_deadline: Option<TimeStamp<Utc>>,
    #[n(3)]
    pub submission_deadline: Option<TimeStamp<Utc>>,
    #[n(4)]
    pub offer_opening_date: Option<TimeStamp<Utc>>,
    #[n(5)]
    pub anchoring_date: Option<TimeStamp<Utc>>, // expected award date
    #[n(6)]
    pub association_fee: Amount,
    #[n(7)]
    pub insurance_required: bool,
    #[n(8)]
    pub insurance_value: Option<Amount>,
    #[n(9)]
    pub regions: Vec<RegionId>,
    #[n(10)]
    pub bid_type: BidType,
    #[n(11)]
    pub is_draft: bool,
}

impl BidId {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self(new_uuid_to_bech32("bid_")?))
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BidId {
    fn from(value: &str) -> Self {
        BidId(value.to_string())
    }
}

impl std::fmt::Display for BidId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl BidType {
    /// Only these two bid types may carry a financial insurance requirement.
    pub fn supports_insurance(&self) -> bool {
        matches!(self, BidType::Construction | BidType::Operations)
    }
}

impl TimeStamp<Utc> {
    pub fn new() -> Self {
        Self(Utc::now())
    }
    pub fn new_with(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Option<Self> {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
            .single()
            .map(TimeStamp)
    }
    pub fn to_datetime_utc(&self) -> DateTime<Utc> {
        self.0
    }
    /// Calendar date in UTC, the granularity deadline comparisons use.
    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }
    pub fn checked_add_days(&self, days: i64) -> Option<Self> {
        let delta = TimeDelta::try_days(days)?;
        self.0.checked_add_signed(delta).map(TimeStamp)
    }
}

impl Default for TimeStamp<Utc> {
    fn default() -> Self {
        Self::new()
    }
}

impl From<DateTime<Utc>> for TimeStamp<Utc> {
    fn from(value: DateTime<Utc>) -> Self {
        TimeStamp(value)
    }
}

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Amount(Decimal::from(value))
    }
}

impl From<i32> for Amount {
    fn from(value: i32) -> Self {
        Amount(Decimal::from(value))
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount(value)
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Bid {
    /// Start an empty proposal; the setters below fill it in.
    pub fn new() -> Self {
        Self::default()
    }
    pub fn set_id(mut self, id: BidId) -> Self {
        self.id = Some(id);
        self
    }
    pub fn set_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }
    pub fn set_enquiry_deadline(mut self, date: TimeStamp<Utc>) -> Self {
        self.enquiry_deadline = Some(date);
        self
    }
    pub fn set_submission_deadline(mut self, date: TimeStamp<Utc>) -> Self {
        self.submission_deadline = Some(date);
        self
    }
    pub fn set_offer_opening_date(mut self, date: TimeStamp<Utc>) -> Self {
        self.offer_opening_date = Some(date);
        self
    }
    pub fn set_anchoring_date(mut self, date: TimeStamp<Utc>) -> Self {
        self.anchoring_date = Some(date);
        self
    }
    pub fn set_association_fee(mut self, fee: impl Into<Amount>) -> Self {
        self.association_fee = fee.into();
        self
    }
    pub fn set_insurance(mut self, value: Option<Amount>) -> Self {
        self.insurance_required = true;
        self.insurance_value = value;
        self
    }
    pub fn add_region(mut self, region: RegionId) -> Self {
        self.regions.push(region);
        self
    }
    pub fn set_bid_type(mut self, bid_type: BidType) -> Self {
        self.bid_type = bid_type;
        self
    }
    pub fn set_draft(mut self, is_draft: bool) -> Self {
        self.is_draft = is_draft;
        self
    }
    pub fn is_creation(&self) -> bool {
        self.id.is_none()
    }
    /// Serialise into cbor, returning the sha256 digest alongside the bytes
    pub fn finalise(&self) -> anyhow::Result<(String, Vec<u8>)> {
        let contents = minicbor::to_vec(self)?;
        let hash = sha256::digest(&contents);

        Ok((hash, contents))
    }
}

impl<C> minicbor::Encode<C> for TimeStamp<Utc> {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        if let Some(nsec) = self.0.timestamp_nanos_opt() {
            return e.i64(nsec)?.ok();
        }

        Err(minicbor::encode::Error::message(
            "failed to encode timestamp. timestamp_nanos_opt returned None",
        ))
    }
}

impl<'b, C> minicbor::Decode<'b, C> for TimeStamp<Utc> {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let nsecs = d.i64()?;

        Ok(TimeStamp(DateTime::from_timestamp_nanos(nsecs)))
    }
}

// decimals go over the wire as their canonical string form, which keeps the scale
impl<C> minicbor::Encode<C> for Amount {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.str(&self.0.to_string())?.ok()
    }
}

impl<'b, C> minicbor::Decode<'b, C> for Amount {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let text = d.str()?;

        text.parse::<Decimal>()
            .map(Amount)
            .map_err(|_| minicbor::decode::Error::message("failed to parse decimal amount"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bid_cbor_keeps_decimal_scale() {
        let bid = Bid::new()
            .set_id(BidId::from("bid_test"))
            .set_name("Water network rehabilitation")
            .set_association_fee(Amount(Decimal::new(12075, 1)))
            .set_offer_opening_date(TimeStamp::new_with(2025, 3, 1, 9, 0, 0).unwrap())
            .add_region(RegionId(3));

        let (hash, cbor) = bid.finalise().unwrap();
        let decoded: Bid = minicbor::decode(&cbor).unwrap();

        assert_eq!(bid, decoded);
        assert_eq!(decoded.association_fee.to_string(), "1207.5");
        assert_eq!(hash.len(), 64);
    }

    #[test]
    fn insurance_support_is_limited_to_two_types() {
        let eligible: Vec<_> = [
            BidType::Construction,
            BidType::Operations,
            BidType::Supplies,
            BidType::Services,
            BidType::Consulting,
        ]
        .into_iter()
        .filter(BidType::supports_insurance)
        .collect();

        assert_eq!(eligible, vec![BidType::Construction, BidType::Operations]);
    }

    #[test]
    fn adding_days_crosses_month_boundaries() {
        let opening = TimeStamp::new_with(2025, 1, 28, 0, 0, 0).unwrap();
        let later = opening.checked_add_days(10).unwrap();

        assert_eq!(later.date(), NaiveDate::from_ymd_opt(2025, 2, 7).unwrap());
    }

    #[test]
    fn new_bid_is_a_creation() {
        assert!(Bid::new().is_creation());
        assert!(!Bid::new().set_id(BidId::new().unwrap()).is_creation());
    }
}
