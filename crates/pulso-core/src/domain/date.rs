use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::macros::format_description;
use time::{Date, Duration, Month, OffsetDateTime, UtcOffset};

use crate::ValidationError;

/// Calendar date of a trading session, serialized as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TradingDate(Date);

impl TradingDate {
    pub const fn new(date: Date) -> Self {
        Self(date)
    }

    pub fn today() -> Self {
        Self(OffsetDateTime::now_utc().date())
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        Date::parse(input.trim(), format_description!("[year]-[month]-[day]"))
            .map(Self)
            .map_err(|_| ValidationError::InvalidDate {
                value: input.to_owned(),
            })
    }

    pub fn from_ymd(year: i32, month: u8, day: u8) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidDate {
            value: format!("{year:04}-{month:02}-{day:02}"),
        };
        let month = Month::try_from(month).map_err(|_| invalid())?;
        Date::from_calendar_date(year, month, day)
            .map(Self)
            .map_err(|_| invalid())
    }

    /// Session date of a unix timestamp as seen from the exchange's UTC offset.
    pub fn from_unix_timestamp(
        timestamp: i64,
        gmt_offset_secs: i32,
    ) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidDate {
            value: timestamp.to_string(),
        };
        let offset = UtcOffset::from_whole_seconds(gmt_offset_secs).unwrap_or(UtcOffset::UTC);
        OffsetDateTime::from_unix_timestamp(timestamp)
            .map(|value| Self(value.to_offset(offset).date()))
            .map_err(|_| invalid())
    }

    /// Calendar date `days` days earlier, saturating at the earliest
    /// representable date.
    pub fn days_before(self, days: u32) -> Self {
        self.0
            .checked_sub(Duration::days(i64::from(days)))
            .map(Self)
            .unwrap_or(Self(Date::MIN))
    }

    pub fn previous_day(self) -> Self {
        self.0.previous_day().map(Self).unwrap_or(self)
    }

    pub fn into_inner(self) -> Date {
        self.0
    }

    pub fn format_iso(self) -> String {
        format!(
            "{:04}-{:02}-{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day()
        )
    }
}

impl Display for TradingDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_iso())
    }
}

impl Serialize for TradingDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_iso())
    }
}

impl<'de> Deserialize<'de> for TradingDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_date() {
        let parsed = TradingDate::parse("2024-03-15").expect("must parse");
        assert_eq!(parsed.format_iso(), "2024-03-15");
    }

    #[test]
    fn rejects_malformed_date() {
        let err = TradingDate::parse("15/03/2024").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidDate { .. }));
    }

    #[test]
    fn days_before_crosses_leap_day() {
        let date = TradingDate::from_ymd(2024, 10, 18).expect("valid");
        assert_eq!(date.days_before(365).format_iso(), "2023-10-19");

        let march = TradingDate::from_ymd(2024, 3, 1).expect("valid");
        assert_eq!(march.days_before(1).format_iso(), "2024-02-29");
    }

    #[test]
    fn unix_timestamp_uses_exchange_offset() {
        // 2024-01-02T01:00:00Z is still Jan 1st in Sao Paulo (UTC-3).
        let date = TradingDate::from_unix_timestamp(1_704_157_200, -3 * 3600).expect("valid");
        assert_eq!(date.format_iso(), "2024-01-01");
    }
}
