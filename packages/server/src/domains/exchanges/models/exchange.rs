use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::common::{ExchangeId, UserId};

/// Lifecycle of an exchange. `Matched` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExchangeStatus {
    Open,
    Matched,
}

impl ExchangeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Matched => "MATCHED",
        }
    }
}

impl fmt::Display for ExchangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExchangeStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(Self::Open),
            "MATCHED" => Ok(Self::Matched),
            other => Err(anyhow::anyhow!("Invalid exchange status: {}", other)),
        }
    }
}

/// A Secret Santa exchange - one group, one invite code, one draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub id: ExchangeId,
    /// Invite code in `XXX-XXX` form, always upper case
    pub code: String,
    pub title: String,
    pub description: String,
    /// Spending limit shown to participants; never used by matching
    pub budget: Decimal,
    /// Number of participants at which the draw happens (>= 2)
    pub target_count: u32,
    pub status: ExchangeStatus,
    pub creator_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl Exchange {
    pub fn is_open(&self) -> bool {
        self.status == ExchangeStatus::Open
    }

    pub fn is_matched(&self) -> bool {
        self.status == ExchangeStatus::Matched
    }

    pub fn target_len(&self) -> usize {
        self.target_count as usize
    }
}

/// Input for creating an exchange. Validated by `create_exchange`.
#[derive(Debug, Clone)]
pub struct NewExchange {
    pub title: String,
    pub description: String,
    pub budget: Decimal,
    pub target_count: u32,
    pub creator_id: UserId,
}
