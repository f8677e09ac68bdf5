//! Number kinds served by the API.
//!
//! A kind is addressed by a single-letter path code (`/numbers/p`) and maps to a
//! named series on the upstream provider (`primes`, `fibo`, `even`, `rand`).

use crate::error::AverageError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of number series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberKind {
    /// Prime numbers
    Prime,
    /// Fibonacci numbers
    Fibonacci,
    /// Even numbers
    Even,
    /// Random numbers
    Random,
}

impl NumberKind {
    /// Every kind, in slot order.
    pub const ALL: [NumberKind; 4] = [
        NumberKind::Prime,
        NumberKind::Fibonacci,
        NumberKind::Even,
        NumberKind::Random,
    ];

    /// Short path code used in `/numbers/{code}`.
    pub fn code(self) -> &'static str {
        match self {
            NumberKind::Prime => "p",
            NumberKind::Fibonacci => "f",
            NumberKind::Even => "e",
            NumberKind::Random => "r",
        }
    }

    /// Series name on the upstream provider.
    pub fn upstream_path(self) -> &'static str {
        match self {
            NumberKind::Prime => "primes",
            NumberKind::Fibonacci => "fibo",
            NumberKind::Even => "even",
            NumberKind::Random => "rand",
        }
    }

    /// Dense slot index in `0..ALL.len()`.
    pub fn index(self) -> usize {
        match self {
            NumberKind::Prime => 0,
            NumberKind::Fibonacci => 1,
            NumberKind::Even => 2,
            NumberKind::Random => 3,
        }
    }

    /// Fixed sample data substituted for a failed upstream call when the
    /// `sample_data` fallback is configured.
    pub fn sample_numbers(self) -> Vec<i64> {
        match self {
            NumberKind::Prime => vec![2, 3, 5, 7, 11],
            NumberKind::Fibonacci => vec![1, 1, 2, 3, 5, 8],
            NumberKind::Even => vec![2, 4, 6, 8, 10],
            NumberKind::Random => vec![7, 14, 21, 28, 35],
        }
    }

    /// Series returned by the offline mock provider.
    pub fn mock_numbers(self) -> Vec<i64> {
        match self {
            NumberKind::Prime => vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29],
            NumberKind::Fibonacci => vec![1, 1, 2, 3, 5, 8, 13, 21, 34, 55],
            NumberKind::Even => vec![2, 4, 6, 8, 10, 12, 14, 16, 18, 20],
            NumberKind::Random => vec![7, 14, 21, 28, 35, 42, 49, 56, 63, 70],
        }
    }
}

impl FromStr for NumberKind {
    type Err = AverageError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code {
            "p" => Ok(NumberKind::Prime),
            "f" => Ok(NumberKind::Fibonacci),
            "e" => Ok(NumberKind::Even),
            "r" => Ok(NumberKind::Random),
            other => Err(AverageError::InvalidKind(other.to_string())),
        }
    }
}

impl fmt::Display for NumberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.upstream_path())
    }
}
