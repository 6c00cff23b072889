use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::ValidationError;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Calendar date of one trading day, the ordering key for daily bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TradeDate(Date);

impl TradeDate {
    /// Parse an ISO-8601 calendar date (`YYYY-MM-DD`).
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        Date::parse(input, DATE_FORMAT)
            .map(Self)
            .map_err(|_| ValidationError::InvalidTradeDate {
                value: input.to_owned(),
            })
    }

    /// Build from a provider-supplied Unix timestamp, keeping the UTC day.
    pub fn from_unix_timestamp(timestamp: i64) -> Result<Self, ValidationError> {
        let datetime = OffsetDateTime::from_unix_timestamp(timestamp).map_err(|_| {
            ValidationError::InvalidTradeDate {
                value: timestamp.to_string(),
            }
        })?;
        Ok(Self(datetime.date()))
    }

    pub fn into_inner(self) -> Date {
        self.0
    }

    pub fn format_iso(self) -> String {
        self.0
            .format(DATE_FORMAT)
            .expect("TradeDate must be formattable as YYYY-MM-DD")
    }
}

impl From<Date> for TradeDate {
    fn from(value: Date) -> Self {
        Self(value)
    }
}

impl Display for TradeDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_iso())
    }
}

impl Serialize for TradeDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_iso())
    }
}

impl<'de> Deserialize<'de> for TradeDate {
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
    fn parses_calendar_date() {
        let parsed = TradeDate::parse("2024-03-08").expect("must parse");
        assert_eq!(parsed.format_iso(), "2024-03-08");
    }

    #[test]
    fn rejects_malformed_date() {
        let err = TradeDate::parse("03/08/2024").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidTradeDate { .. }));
    }

    #[test]
    fn converts_unix_timestamp_to_utc_day() {
        // 2024-03-08T14:30:00Z
        let date = TradeDate::from_unix_timestamp(1_709_908_200).expect("must convert");
        assert_eq!(date.format_iso(), "2024-03-08");
    }

    #[test]
    fn orders_by_calendar_day() {
        let earlier = TradeDate::parse("2024-03-07").expect("must parse");
        let later = TradeDate::parse("2024-03-08").expect("must parse");
        assert!(earlier < later);
    }
}
