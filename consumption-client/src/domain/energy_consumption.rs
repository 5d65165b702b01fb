use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A single energy consumption sample.
///
/// `id` is optional on input; the store assigns one when it is absent.
/// `consumption` carries whatever unit the caller uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyConsumption {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(with = "timestamp")]
    pub timestamp: OffsetDateTime,
    pub consumption: f64,
}

/// RFC 3339 on output. On input an offset-less ISO 8601 datetime is also
/// accepted and read as UTC.
mod timestamp {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use time::{
        format_description::well_known::{Iso8601, Rfc3339},
        OffsetDateTime, PrimitiveDateTime,
    };

    pub fn serialize<S: Serializer>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        time::serde::rfc3339::serialize(value, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<OffsetDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(de::Error::custom)
    }

    fn parse(raw: &str) -> Result<OffsetDateTime, time::error::Parse> {
        OffsetDateTime::parse(raw, &Rfc3339).or_else(|_| {
            PrimitiveDateTime::parse(raw, &Iso8601::DEFAULT).map(PrimitiveDateTime::assume_utc)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn deserializes_payload_without_id() {
        let record: EnergyConsumption =
            serde_json::from_str(r#"{"timestamp":"2024-01-01T10:30:00Z","consumption":100.5}"#)
                .unwrap();

        assert_eq!(record.id, None);
        assert_eq!(record.timestamp, datetime!(2024-01-01 10:30:00 UTC));
        assert_eq!(record.consumption, 100.5);
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let record = EnergyConsumption {
            id: Some("123".to_string()),
            timestamp: datetime!(2024-01-01 00:00:00 UTC),
            consumption: 100.0,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "123");
        assert_eq!(json["timestamp"], "2024-01-01T00:00:00Z");
        assert_eq!(json["consumption"], 100.0);
    }

    #[test]
    fn reads_offsetless_timestamp_as_utc() {
        let record: EnergyConsumption =
            serde_json::from_str(r#"{"timestamp":"2024-01-01T10:30:00","consumption":100}"#).unwrap();

        assert_eq!(record.timestamp, datetime!(2024-01-01 10:30:00 UTC));
    }

    #[test]
    fn keeps_explicit_offset() {
        let record: EnergyConsumption = serde_json::from_str(
            r#"{"timestamp":"2024-01-01T10:30:00-03:00","consumption":1}"#,
        )
        .unwrap();

        assert_eq!(record.timestamp, datetime!(2024-01-01 13:30:00 UTC));
    }

    #[test]
    fn rejects_unparseable_timestamp() {
        let res = serde_json::from_str::<EnergyConsumption>(r#"{"timestamp":"yesterday","consumption":1}"#);
        assert!(res.is_err());
    }

    #[test]
    fn rejects_payload_missing_consumption() {
        let res = serde_json::from_str::<EnergyConsumption>(r#"{"timestamp":"2024-01-01T00:00:00Z"}"#);
        assert!(res.is_err());
    }
}
