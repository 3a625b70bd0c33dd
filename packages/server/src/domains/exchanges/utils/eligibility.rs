//! Pure functions deciding whether an exchange is ready for its draw.
//!
//! No side effects: callers load the exchange and its participants, ask here,
//! and only write anything if the answer is `Ready`.

use crate::domains::exchanges::models::{Exchange, Participant};

/// Why an exchange is (or is not) ready to be matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchReadiness {
    Ready,
    /// Already matched; never matched twice
    NotOpen,
    /// Participant count differs from the target
    WrongParticipantCount { joined: usize, target: usize },
    /// Count is right but some wishlists are blank
    MissingWishlists { missing: usize },
}

impl MatchReadiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

pub fn matching_readiness(exchange: &Exchange, participants: &[Participant]) -> MatchReadiness {
    if !exchange.is_open() {
        return MatchReadiness::NotOpen;
    }

    if participants.len() != exchange.target_len() {
        return MatchReadiness::WrongParticipantCount {
            joined: participants.len(),
            target: exchange.target_len(),
        };
    }

    let missing = participants.iter().filter(|p| !p.has_wishlist()).count();
    if missing > 0 {
        return MatchReadiness::MissingWishlists { missing };
    }

    MatchReadiness::Ready
}

/// True iff the exchange is open, exactly full, and every wishlist is filled.
pub fn should_trigger_matching(exchange: &Exchange, participants: &[Participant]) -> bool {
    matching_readiness(exchange, participants).is_ready()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{ExchangeId, UserId};
    use crate::domains::exchanges::models::ExchangeStatus;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn exchange(target_count: u32, status: ExchangeStatus) -> Exchange {
        Exchange {
            id: ExchangeId::new(),
            code: "ABC-123".to_string(),
            title: "Office party".to_string(),
            description: String::new(),
            budget: Decimal::new(2500, 2),
            target_count,
            status,
            creator_id: UserId::new(),
            created_at: Utc::now(),
        }
    }

    fn participants(exchange: &Exchange, wishlists: &[&str]) -> Vec<Participant> {
        wishlists
            .iter()
            .map(|w| Participant {
                user_id: UserId::new(),
                exchange_id: exchange.id,
                wishlist_text: w.to_string(),
                santa_for: None,
                joined_at: Utc::now(),
            })
            .collect()
    }

    #[test]
    fn test_full_exchange_with_wishlists_is_ready() {
        let ex = exchange(3, ExchangeStatus::Open);
        let ps = participants(&ex, &["books", "tea", "socks"]);
        assert_eq!(matching_readiness(&ex, &ps), MatchReadiness::Ready);
        assert!(should_trigger_matching(&ex, &ps));
    }

    #[test]
    fn test_one_short_is_not_ready() {
        let ex = exchange(4, ExchangeStatus::Open);
        let ps = participants(&ex, &["a", "b", "c"]);
        assert_eq!(
            matching_readiness(&ex, &ps),
            MatchReadiness::WrongParticipantCount { joined: 3, target: 4 }
        );
        assert!(!should_trigger_matching(&ex, &ps));
    }

    #[test]
    fn test_over_target_is_not_ready() {
        let ex = exchange(2, ExchangeStatus::Open);
        let ps = participants(&ex, &["a", "b", "c"]);
        assert!(!should_trigger_matching(&ex, &ps));
    }

    #[test]
    fn test_whitespace_wishlist_blocks_then_filling_unblocks() {
        let ex = exchange(3, ExchangeStatus::Open);
        let mut ps = participants(&ex, &["a", "  \n\t", "c"]);
        assert_eq!(
            matching_readiness(&ex, &ps),
            MatchReadiness::MissingWishlists { missing: 1 }
        );

        ps[1].wishlist_text = "a scarf".to_string();
        assert!(should_trigger_matching(&ex, &ps));
    }

    #[test]
    fn test_matched_exchange_never_triggers() {
        let ex = exchange(2, ExchangeStatus::Matched);
        let ps = participants(&ex, &["a", "b"]);
        let before = ps.clone();

        assert_eq!(matching_readiness(&ex, &ps), MatchReadiness::NotOpen);
        assert!(!should_trigger_matching(&ex, &ps));
        assert!(!should_trigger_matching(&ex, &[]));
        assert_eq!(ps, before);
    }

    #[test]
    fn test_status_checked_before_count() {
        let ex = exchange(5, ExchangeStatus::Matched);
        let ps = participants(&ex, &[""]);
        assert_eq!(matching_readiness(&ex, &ps), MatchReadiness::NotOpen);
    }
}
