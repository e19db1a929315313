use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

use crate::error::CoreError;

/// Signed preference strength. Positive encourages, negative discourages,
/// infinities are hard constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weight {
    NegInfinity,
    Finite(i64),
    Infinity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Magnitude {
    Finite(u64),
    Infinite,
}

impl Weight {
    pub fn parse(text: &str) -> Result<Self, CoreError> {
        match text.trim() {
            "inf" | "+inf" | "Infinity" | "+Infinity" | "∞" => Ok(Self::Infinity),
            "-inf" | "-Infinity" | "-∞" => Ok(Self::NegInfinity),
            other => other
                .parse::<i64>()
                .map(Self::Finite)
                .map_err(|_| CoreError::InvalidWeight(text.to_string())),
        }
    }

    pub fn magnitude(&self) -> Magnitude {
        match self {
            Self::Finite(n) => Magnitude::Finite(n.unsigned_abs()),
            Self::Infinity | Self::NegInfinity => Magnitude::Infinite,
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, Self::Infinity) || matches!(self, Self::Finite(n) if *n > 0)
    }

    pub fn is_negative(&self) -> bool {
        matches!(self, Self::NegInfinity) || matches!(self, Self::Finite(n) if *n < 0)
    }

    pub fn is_hard(&self) -> bool {
        matches!(self, Self::Infinity | Self::NegInfinity)
    }
}

impl Default for Weight {
    fn default() -> Self {
        Self::Finite(1)
    }
}

impl From<i64> for Weight {
    fn from(n: i64) -> Self {
        Self::Finite(n)
    }
}

impl Ord for Weight {
    fn cmp(&self, other: &Self) -> Ordering {
        fn rank(w: &Weight) -> (i8, i64) {
            match w {
                Weight::NegInfinity => (-1, 0),
                Weight::Finite(n) => (0, *n),
                Weight::Infinity => (1, 0),
            }
        }
        rank(self).cmp(&rank(other))
    }
}

impl PartialOrd for Weight {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegInfinity => f.write_str("-Infinity"),
            Self::Finite(n) => write!(f, "{n}"),
            Self::Infinity => f.write_str("Infinity"),
        }
    }
}

impl Serialize for Weight {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Finite(n) => serializer.serialize_i64(*n),
            Self::Infinity => serializer.serialize_str("Infinity"),
            Self::NegInfinity => serializer.serialize_str("-Infinity"),
        }
    }
}

struct WeightVisitor;

impl Visitor<'_> for WeightVisitor {
    type Value = Weight;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer, \"Infinity\" or \"-Infinity\"")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Weight, E> {
        Ok(Weight::Finite(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Weight, E> {
        i64::try_from(v)
            .map(Weight::Finite)
            .map_err(|_| E::custom(format!("weight out of range: {v}")))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Weight, E> {
        if v == f64::INFINITY {
            Ok(Weight::Infinity)
        } else if v == f64::NEG_INFINITY {
            Ok(Weight::NegInfinity)
        } else if v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
            Ok(Weight::Finite(v as i64))
        } else {
            Err(E::custom(format!("weight must be an integer: {v}")))
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Weight, E> {
        Weight::parse(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Weight {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(WeightVisitor)
    }
}
