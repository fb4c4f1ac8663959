use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(TargetId);

/// User-facing transparency percent in [0, 100]. The rendered opacity is
/// the inverse: `1.0 - percent / 100.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct TransparencyValue(u8);

#[derive(Debug, Error)]
#[error("transparency percent must be between 0 and 100, got {0}")]
pub struct ValueOutOfRange(pub u8);

impl TransparencyValue {
    pub fn new(percent: u8) -> Result<Self, ValueOutOfRange> {
        if percent > 100 {
            Err(ValueOutOfRange(percent))
        } else {
            Ok(Self(percent))
        }
    }

    /// Saturating constructor for interaction surfaces that clamp raw
    /// input before it reaches a session.
    pub fn clamped(percent: u8) -> Self {
        Self(percent.min(100))
    }

    pub fn percent(self) -> u8 {
        self.0
    }

    /// Host-side opacity for this transparency; 1.0 is fully opaque.
    pub fn opacity(self) -> f64 {
        1.0 - f64::from(self.0) / 100.0
    }
}

impl Default for TransparencyValue {
    fn default() -> Self {
        Self(50)
    }
}

impl TryFrom<u8> for TransparencyValue {
    type Error = ValueOutOfRange;

    fn try_from(percent: u8) -> Result<Self, Self::Error> {
        Self::new(percent)
    }
}

impl From<TransparencyValue> for u8 {
    fn from(value: TransparencyValue) -> Self {
        value.0
    }
}
