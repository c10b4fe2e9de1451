use std::fmt;

use crate::foundation::error::{WeaveError, WeaveResult};

/// Strictly positive rational number used for edit rates and aspect ratios.
///
/// Deserializes from an integer (`25`), a decimal (`1.5`), a string (`"30000/1001"`, `"16:9"`)
/// or an object (`{ "num": 24, "den": 1 }`). Always serializes as an object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RationalRepr")]
pub struct Rational {
    /// Numerator (> 0).
    pub num: u32,
    /// Denominator (> 0).
    pub den: u32,
}

/// Frames-per-second granularity of every frame-based length on a slot.
pub type EditRate = Rational;

impl Rational {
    /// Build a validated rational. Both parts must be non-zero.
    pub fn new(num: u32, den: u32) -> WeaveResult<Self> {
        if den == 0 {
            return Err(WeaveError::document("rational den must be > 0"));
        }
        if num == 0 {
            return Err(WeaveError::document("rational num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Whole-number rational `n/1`.
    pub fn integer(n: u32) -> WeaveResult<Self> {
        Self::new(n, 1)
    }

    /// Approximate value as `f64`.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Same value with numerator and denominator divided by their gcd.
    pub fn reduced(self) -> Self {
        let g = gcd(self.num, self.den);
        Self {
            num: self.num / g,
            den: self.den / g,
        }
    }

    fn from_decimal(v: f64) -> WeaveResult<Self> {
        if !v.is_finite() || v <= 0.0 {
            return Err(WeaveError::document(format!(
                "rational value must be finite and > 0, got {v}"
            )));
        }
        if v.fract() == 0.0 && v <= f64::from(u32::MAX) {
            return Self::integer(v as u32);
        }
        const SCALE: u32 = 10_000;
        let num = (v * f64::from(SCALE)).round();
        if num < 1.0 || num > f64::from(u32::MAX) {
            return Err(WeaveError::document(format!(
                "rational value {v} is out of range"
            )));
        }
        Ok(Self::new(num as u32, SCALE)?.reduced())
    }

    fn parse(s: &str) -> WeaveResult<Self> {
        let s = s.trim();
        let split = s.split_once('/').or_else(|| s.split_once(':'));
        match split {
            Some((n, d)) => {
                let num = n.trim().parse::<u32>().map_err(|e| {
                    WeaveError::document(format!("invalid rational numerator in '{s}': {e}"))
                })?;
                let den = d.trim().parse::<u32>().map_err(|e| {
                    WeaveError::document(format!("invalid rational denominator in '{s}': {e}"))
                })?;
                Self::new(num, den)
            }
            None => {
                let v = s
                    .parse::<f64>()
                    .map_err(|e| WeaveError::document(format!("invalid rational '{s}': {e}")))?;
                Self::from_decimal(v)
            }
        }
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.max(1)
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum RationalRepr {
    Integer(u32),
    Decimal(f64),
    Text(String),
    Parts { num: u32, den: u32 },
}

impl TryFrom<RationalRepr> for Rational {
    type Error = WeaveError;

    fn try_from(repr: RationalRepr) -> Result<Self, Self::Error> {
        match repr {
            RationalRepr::Integer(n) => Self::integer(n),
            RationalRepr::Decimal(v) => Self::from_decimal(v),
            RationalRepr::Text(s) => Self::parse(&s),
            RationalRepr::Parts { num, den } => Self::new(num, den),
        }
    }
}

/// Essence kind carried by a slot, segment component or source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Video essence.
    Picture,
    /// Audio essence.
    Sound,
}

impl MediaKind {
    /// Lowercase identifier as used in metadata documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Picture => "picture",
            Self::Sound => "sound",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Picture => "Picture",
            Self::Sound => "Sound",
        })
    }
}

/// Slot identifier, unique within one mob.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct SlotId(pub u32);

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
