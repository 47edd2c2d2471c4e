use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Wire pattern used by the auth service, seconds part. Up to six fractional
/// digits follow, trailing zeros dropped.
const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
/// Parse pattern, `%.f` accepts any (or no) fractional digits
const PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Timestamp as exchanged with the auth service.
///
/// The literal carries no offset and is always read as UTC. Empty strings,
/// the literal `"null"` and JSON `null` all decode to an unset value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WireTimestamp(Option<DateTime<Utc>>);

impl WireTimestamp {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self(Some(instant))
    }

    pub fn unset() -> Self {
        Self(None)
    }

    pub fn is_unset(&self) -> bool {
        self.0.is_none()
    }

    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.0
    }

    /// Parse a wire literal
    pub fn parse(raw: &str) -> Result<Self, chrono::ParseError> {
        let raw = raw.trim();
        if raw.is_empty() || raw == "null" {
            return Ok(Self::unset());
        }

        match NaiveDateTime::parse_from_str(raw, PARSE_FORMAT) {
            Ok(naive) => Ok(Self::new(naive.and_utc())),
            // Some producers emit an explicit offset; normalise it to UTC
            Err(naive_err) => DateTime::parse_from_rfc3339(raw)
                .map(|dt| Self::new(dt.with_timezone(&Utc)))
                .map_err(|_| naive_err),
        }
    }

    /// Wire literal, `None` when unset
    pub fn to_wire(&self) -> Option<String> {
        self.0.map(|dt| {
            let mut literal = dt.format(WIRE_FORMAT).to_string();
            let micros = dt.timestamp_subsec_micros();
            if micros != 0 {
                let fraction = format!("{:06}", micros);
                literal.push('.');
                literal.push_str(fraction.trim_end_matches('0'));
            }
            literal
        })
    }

    /// RFC 3339 rendering with an explicit `Z`, used in broker responses
    pub fn to_rfc3339(&self) -> Option<String> {
        self.0.map(|dt| dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

impl Serialize for WireTimestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.to_wire() {
            Some(literal) => serializer.serialize_str(&literal),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for WireTimestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_option(WireTimestampVisitor)
    }
}

struct WireTimestampVisitor;

impl<'de> de::Visitor<'de> for WireTimestampVisitor {
    type Value = WireTimestamp;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a timestamp like 2024-01-31T12:00:00.123456 or null")
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(WireTimestamp::unset())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(WireTimestamp::unset())
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(self)
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        WireTimestamp::parse(value)
            .map_err(|e| E::custom(format!("invalid timestamp {:?}: {}", value, e)))
    }
}
