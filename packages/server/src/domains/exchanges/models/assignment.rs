use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::common::UserId;

/// Giver -> recipient pairs produced by a draw, in participant join order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Assignment {
    pairs: Vec<(UserId, UserId)>,
}

impl Assignment {
    /// Pair `givers[i]` with `recipients[i]`.
    ///
    /// Extra entries in the longer slice are ignored; callers pass a slice and
    /// its derangement, which always have equal length.
    pub fn from_positions(givers: &[UserId], recipients: &[UserId]) -> Self {
        Self {
            pairs: givers
                .iter()
                .copied()
                .zip(recipients.iter().copied())
                .collect(),
        }
    }

    pub fn pairs(&self) -> &[(UserId, UserId)] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn recipient_for(&self, giver: UserId) -> Option<UserId> {
        self.pairs
            .iter()
            .find(|(g, _)| *g == giver)
            .map(|(_, recipient)| *recipient)
    }

    pub fn givers(&self) -> impl Iterator<Item = UserId> + '_ {
        self.pairs.iter().map(|(giver, _)| *giver)
    }

    /// True when the pairs form a bijection over the givers with no one
    /// drawing themselves.
    pub fn is_valid_derangement(&self) -> bool {
        let givers: HashSet<UserId> = self.givers().collect();
        let recipients: HashSet<UserId> = self.pairs.iter().map(|(_, r)| *r).collect();

        givers.len() == self.pairs.len()
            && recipients == givers
            && self.pairs.iter().all(|(giver, recipient)| giver != recipient)
    }
}
