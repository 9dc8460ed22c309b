//! Record identifiers
//!
//! An [`Identifier`] names one stored record among the records of its type.
//! Engines pick whichever kind suits their storage: auto-increment integers,
//! floating point keys, or text keys such as UUIDs and object ids.

use num_bigint::{BigInt, Sign};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Unique key of a stored record within its type
///
/// Floating point keys compare and hash by their bits, so `Number(NaN)`
/// equals itself and identifiers can key a `HashMap`.
#[derive(Debug, Clone)]
pub enum Identifier {
    /// Arbitrary-precision integer
    Int(BigInt),
    /// Floating point number
    Number(f64),
    /// Text key
    String(String),
}

impl Identifier {
    /// An identifier is empty when it would not mark a value as stored:
    /// integer zero, `0.0` or `NaN`, or the empty string.
    pub fn is_empty(&self) -> bool {
        match self {
            Identifier::Int(value) => value.sign() == Sign::NoSign,
            Identifier::Number(value) => *value == 0.0 || value.is_nan(),
            Identifier::String(value) => value.is_empty(),
        }
    }

    pub fn as_int(&self) -> Option<&BigInt> {
        match self {
            Identifier::Int(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Identifier::String(value) => Some(value),
            _ => None,
        }
    }

    /// Integer identifiers that fit in an `i64`
    pub fn as_i64(&self) -> Option<i64> {
        self.as_int().and_then(|value| i64::try_from(value).ok())
    }
}

impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Identifier::Int(a), Identifier::Int(b)) => a == b,
            (Identifier::Number(a), Identifier::Number(b)) => a.to_bits() == b.to_bits(),
            (Identifier::String(a), Identifier::String(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Identifier {}

impl Hash for Identifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Identifier::Int(value) => value.hash(state),
            Identifier::Number(value) => value.to_bits().hash(state),
            Identifier::String(value) => value.hash(state),
        }
    }
}

/// Parse `s` as an integer only when it is written the way the integer
/// prints back (no sign prefix, leading zeros or separators).
fn parse_canonical_int(s: &str) -> Option<BigInt> {
    BigInt::from_str(s)
        .ok()
        .filter(|value| value.to_string() == s)
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Int(value) => write!(f, "{}", value),
            Identifier::Number(value) => write!(f, "{}", value),
            Identifier::String(value) => write!(f, "{}", value),
        }
    }
}

/// Canonical decimal integers become [`Identifier::Int`], anything else
/// (`"000"`, `"+7"`, `"1_000"`, `"-0"`) stays text.
impl FromStr for Identifier {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match parse_canonical_int(s) {
            Some(value) => Identifier::Int(value),
            None => Identifier::String(s.to_string()),
        })
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Identifier {
                fn from(value: $ty) -> Self {
                    Identifier::Int(BigInt::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i32, i64, i128, u32, u64, u128, usize);

impl From<BigInt> for Identifier {
    fn from(value: BigInt) -> Self {
        Identifier::Int(value)
    }
}

impl From<f64> for Identifier {
    fn from(value: f64) -> Self {
        Identifier::Number(value)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Identifier::String(value.to_string())
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Identifier::String(value)
    }
}

// Integers too wide for a JSON number are written as decimal text.
// Non-finite numbers have no JSON form and are written as null.
impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Identifier::Int(value) => {
                if let Ok(small) = i64::try_from(value) {
                    serializer.serialize_i64(small)
                } else if let Ok(unsigned) = u64::try_from(value) {
                    serializer.serialize_u64(unsigned)
                } else {
                    serializer.serialize_str(&value.to_string())
                }
            }
            Identifier::Number(value) => serializer.serialize_f64(*value),
            Identifier::String(value) => serializer.serialize_str(value),
        }
    }
}

struct IdentifierVisitor;

impl<'de> Visitor<'de> for IdentifierVisitor {
    type Value = Identifier;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an integer, a number or a string identifier")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Identifier, E> {
        Ok(Identifier::from(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Identifier, E> {
        Ok(Identifier::from(value))
    }

    fn visit_i128<E: de::Error>(self, value: i128) -> Result<Identifier, E> {
        Ok(Identifier::from(value))
    }

    fn visit_u128<E: de::Error>(self, value: u128) -> Result<Identifier, E> {
        Ok(Identifier::from(value))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Identifier, E> {
        Ok(Identifier::Number(value))
    }

    // null is how a non-finite number comes back
    fn visit_unit<E: de::Error>(self) -> Result<Identifier, E> {
        Ok(Identifier::Number(f64::NAN))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Identifier, E> {
        Ok(wide_int(value).unwrap_or_else(|| Identifier::String(value.to_string())))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Identifier, E> {
        Ok(wide_int(&value).unwrap_or(Identifier::String(value)))
    }
}

/// Text that can only have come from a serialized integer wider than 64 bits
fn wide_int(value: &str) -> Option<Identifier> {
    parse_canonical_int(value)
        .filter(|int| i64::try_from(int).is_err() && u64::try_from(int).is_err())
        .map(Identifier::Int)
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(IdentifierVisitor)
    }
}
