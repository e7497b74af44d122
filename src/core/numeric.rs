use rust_decimal::Decimal;
use schemars::gen::SchemaGenerator;
use schemars::schema::{InstanceType, Metadata, Schema, SchemaObject};
use schemars::JsonSchema;
use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Raw content of a numeric form field (quantity, rate, GST rate).
///
/// Fields are edited live, so they can hold text that is not (yet) a number.
/// Deserialization never fails: anything that is not a number is kept as
/// text or treated as missing, and [`Numeric::coerce`] turns it into zero.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Numeric {
    /// A value that arrived already numeric
    Value(Decimal),
    /// Text as typed, which may or may not parse
    Text(String),
    /// Null or absent
    #[default]
    Missing,
}

impl Numeric {
    /// Numeric value of the field, or zero when it does not hold a number.
    ///
    /// - numbers are returned unchanged, including negatives
    /// - text is trimmed; empty text is zero, decimal (`"230.50"`) and
    ///   scientific (`"1e3"`) notation parse, anything else is zero
    /// - missing is zero
    pub fn coerce(&self) -> Decimal {
        match self {
            Numeric::Value(value) => *value,
            Numeric::Text(text) => coerce_or_zero(text),
            Numeric::Missing => Decimal::ZERO,
        }
    }

    /// True when the field holds something that reads as a number.
    pub fn is_numeric(&self) -> bool {
        match self {
            Numeric::Value(_) => true,
            Numeric::Text(text) => parse_number(text).is_some(),
            Numeric::Missing => false,
        }
    }
}

/// Parse free text as a number, falling back to zero.
pub fn coerce_or_zero(text: &str) -> Decimal {
    parse_number(text).unwrap_or(Decimal::ZERO)
}

fn parse_number(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

impl From<Decimal> for Numeric {
    fn from(value: Decimal) -> Self {
        Numeric::Value(value)
    }
}

impl From<i64> for Numeric {
    fn from(value: i64) -> Self {
        Numeric::Value(Decimal::from(value))
    }
}

impl From<&str> for Numeric {
    fn from(text: &str) -> Self {
        Numeric::Text(text.to_string())
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Value(value) => write!(f, "{}", value),
            Numeric::Text(text) => write!(f, "{}", text),
            Numeric::Missing => Ok(()),
        }
    }
}

impl Serialize for Numeric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Numeric::Value(value) => Serialize::serialize(value, serializer),
            Numeric::Text(text) => serializer.serialize_str(text),
            Numeric::Missing => serializer.serialize_none(),
        }
    }
}

// Documents what the lenient reader accepts: a number, numeric text or null.
impl JsonSchema for Numeric {
    fn schema_name() -> String {
        "Numeric".to_string()
    }

    fn json_schema(_: &mut SchemaGenerator) -> Schema {
        SchemaObject {
            instance_type: Some(
                vec![InstanceType::Number, InstanceType::String, InstanceType::Null].into(),
            ),
            metadata: Some(Box::new(Metadata {
                description: Some(
                    "A number or numeric text. Empty, non-numeric or missing values count as 0"
                        .to_string(),
                ),
                ..Default::default()
            })),
            ..Default::default()
        }
        .into()
    }
}

impl<'de> Deserialize<'de> for Numeric {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NumericVisitor)
    }
}

struct NumericVisitor;

impl<'de> Visitor<'de> for NumericVisitor {
    type Value = Numeric;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number, numeric text, or null")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Numeric, E> {
        Ok(Numeric::Value(if v { Decimal::ONE } else { Decimal::ZERO }))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Numeric, E> {
        Ok(Numeric::Value(Decimal::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Numeric, E> {
        Ok(Numeric::Value(Decimal::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Numeric, E> {
        // Display gives the shortest form that round-trips, so 18427.33
        // becomes exactly 18427.33 rather than its binary approximation.
        let text = v.to_string();
        Ok(match Decimal::from_str(&text) {
            Ok(value) => Numeric::Value(value),
            Err(_) => Numeric::Text(text),
        })
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Numeric, E> {
        Ok(Numeric::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Numeric, E> {
        Ok(Numeric::Text(v))
    }

    fn visit_none<E: de::Error>(self) -> Result<Numeric, E> {
        Ok(Numeric::Missing)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Numeric, E> {
        Ok(Numeric::Missing)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Numeric, D::Error> {
        deserializer.deserialize_any(NumericVisitor)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Numeric, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Numeric::Missing)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Numeric, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(Numeric::Missing)
    }
}
