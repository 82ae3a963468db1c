//! Settlement bridges accepted for markets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::{ValidationError, ValidationResult};

/// A bridge through which market collateral is escrowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bridge {
    HoodiTt,
    HoodiTt2,
    SepoliaBridge,
    EthereumBridge,
}

/// Wire names of every supported bridge.
const BRIDGES: &[(&str, Bridge)] = &[
    ("hoodi_tt", Bridge::HoodiTt),
    ("hoodi_tt2", Bridge::HoodiTt2),
    ("sepolia_bridge", Bridge::SepoliaBridge),
    ("ethereum_bridge", Bridge::EthereumBridge),
];

impl Bridge {
    /// Look up a bridge by wire name.
    pub fn parse(name: &str) -> ValidationResult<Self> {
        BRIDGES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, b)| *b)
            .ok_or_else(|| {
                ValidationError::new(
                    "bridge",
                    format!("'{name}' is not one of {}", Self::names().join(", ")),
                )
            })
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        BRIDGES
            .iter()
            .find(|(_, b)| *b == self)
            .map_or("", |(n, _)| n)
    }

    #[must_use]
    pub fn names() -> Vec<&'static str> {
        BRIDGES.iter().map(|(n, _)| *n).collect()
    }
}

impl fmt::Display for Bridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bridge {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
