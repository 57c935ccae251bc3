//! Billing intervals of a recurring plan.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Billing interval of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    #[default]
    Unspecified,
    Day,
    Week,
    Month,
    Year,
}

impl Interval {
    /// Every interval except `Unspecified`.
    pub const ALL: &'static [Interval] = &[
        Interval::Day,
        Interval::Week,
        Interval::Month,
        Interval::Year,
    ];
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interval::Unspecified => write!(f, "unspecified"),
            Interval::Day => write!(f, "day"),
            Interval::Week => write!(f, "week"),
            Interval::Month => write!(f, "month"),
            Interval::Year => write!(f, "year"),
        }
    }
}

impl FromStr for Interval {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" => Ok(Interval::Day),
            "week" => Ok(Interval::Week),
            "month" => Ok(Interval::Month),
            "year" => Ok(Interval::Year),
            _ => anyhow::bail!(
                "Unknown interval: {}. Expected day, week, month, or year.",
                s
            ),
        }
    }
}
