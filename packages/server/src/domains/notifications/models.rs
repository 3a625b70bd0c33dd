use serde::{Deserialize, Serialize};

/// A change in who is taking part in an exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MembershipChange {
    Joined,
    Left,
}

impl MembershipChange {
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Joined => "joined",
            Self::Left => "left",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Joined => "✅",
            Self::Left => "👋",
        }
    }
}

/// Outcome of one notification batch.
///
/// `skipped` counts recipients with no linked chat; `failed` counts sends the
/// channel rejected. Neither is an error for the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl DeliveryReport {
    pub fn attempted(&self) -> usize {
        self.sent + self.failed
    }
}
