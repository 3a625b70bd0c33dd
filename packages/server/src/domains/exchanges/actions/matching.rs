//! Matching actions - the draw itself.
//!
//! `check_and_trigger_matching` is the entry point callers use after anything
//! that changes who is in an exchange. It runs the eligibility check and the
//! draw inside the exchange's critical section, commits the result as one
//! compare-and-swap, and only then notifies, outside the lock.

use fastrand::Rng;
use tracing::{debug, info, instrument, warn};

use crate::common::{ExchangeId, UserId};
use crate::domains::exchanges::errors::ExchangeError;
use crate::domains::exchanges::models::{Assignment, Exchange, ExchangeStatus, Participant};
use crate::domains::exchanges::utils::{derange_with_attempts, matching_readiness};
use crate::kernel::ServerDeps;

/// An exchange whose draw has just been committed
#[derive(Debug, Clone)]
pub struct CommittedMatch {
    pub exchange: Exchange,
    pub assignment: Assignment,
}

/// Draw recipients for `participants`, in the order given.
///
/// Pure: nothing is written. Order changes which derangement comes out, never
/// whether it is valid.
pub fn perform_matching(
    participants: &[Participant],
    max_shuffle_attempts: usize,
    rng: &mut Rng,
) -> Assignment {
    let givers: Vec<UserId> = participants.iter().map(|p| p.user_id).collect();
    let recipients = derange_with_attempts(&givers, max_shuffle_attempts, rng);
    Assignment::from_positions(&givers, &recipients)
}

/// Match the exchange if it is ready. Returns whether a match happened.
///
/// Not being ready (still open seats, blank wishlists, already matched,
/// unknown exchange) is `Ok(false)` with nothing written. Notification
/// failures are logged and never undo the match.
#[instrument(skip_all, fields(exchange_id = %exchange_id))]
pub async fn check_and_trigger_matching(
    exchange_id: ExchangeId,
    deps: &ServerDeps,
) -> Result<bool, ExchangeError> {
    let guard = deps.locks.acquire(exchange_id).await;
    let committed = match_if_ready(exchange_id, deps).await?;
    drop(guard);

    match committed {
        Some(committed) => {
            notify_committed_match(&committed, deps).await;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Eligibility check, draw and commit. Caller must hold the exchange's lock.
pub(crate) async fn match_if_ready(
    exchange_id: ExchangeId,
    deps: &ServerDeps,
) -> Result<Option<CommittedMatch>, ExchangeError> {
    let Some(exchange) = deps.store.find_exchange(exchange_id).await? else {
        debug!("Exchange not found, nothing to match");
        deps.locks.forget(exchange_id).await;
        return Ok(None);
    };

    let participants = deps.store.list_participants(exchange_id).await?;
    let readiness = matching_readiness(&exchange, &participants);
    if !readiness.is_ready() {
        debug!(?readiness, "Exchange not ready for matching");
        return Ok(None);
    }

    let mut rng = deps.fork_rng().await;
    let assignment = perform_matching(&participants, deps.settings.max_shuffle_attempts, &mut rng);

    if !deps.store.commit_match(exchange_id, &assignment).await? {
        warn!("Exchange stopped being open before commit, skipping");
        return Ok(None);
    }

    info!(participants = assignment.len(), "Exchange matched");

    Ok(Some(CommittedMatch {
        exchange: Exchange {
            status: ExchangeStatus::Matched,
            ..exchange
        },
        assignment,
    }))
}

/// Best-effort: errors are logged, never returned.
pub(crate) async fn notify_committed_match(committed: &CommittedMatch, deps: &ServerDeps) {
    if let Err(e) = deps
        .notifier
        .notify_matches(&committed.exchange, &committed.assignment)
        .await
    {
        warn!(
            exchange_id = %committed.exchange.id,
            error = %e,
            "Error sending match notifications"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::exchanges::actions::create_exchange;
    use crate::domains::exchanges::models::{NewExchange, UserProfile};
    use crate::kernel::{BaseExchangeStore, SpyNotifier, TestDependencies};
    use rust_decimal::Decimal;

    fn participants(n: usize) -> Vec<Participant> {
        let exchange_id = ExchangeId::new();
        (0..n)
            .map(|_| Participant::new(exchange_id, UserId::new(), "anything"))
            .collect()
    }

    async fn open_exchange(t: &TestDependencies, target_count: u32) -> Exchange {
        let creator = UserProfile::new("Creator");
        t.store.insert_user(&creator).await.unwrap();
        create_exchange(
            NewExchange {
                title: "Book club".to_string(),
                description: String::new(),
                budget: Decimal::new(20, 0),
                target_count,
                creator_id: creator.id,
            },
            &t.deps,
        )
        .await
        .unwrap()
    }

    async fn add(t: &TestDependencies, exchange: &Exchange, wishlist: &str) -> UserId {
        let user_id = UserId::new();
        t.store
            .upsert_participant(&Participant::new(exchange.id, user_id, wishlist))
            .await
            .unwrap();
        user_id
    }

    #[test]
    fn test_perform_matching_is_derangement() {
        let ps = participants(6);
        for seed in 0..20 {
            let assignment = perform_matching(&ps, 100, &mut Rng::with_seed(seed));
            assert_eq!(assignment.len(), 6);
            assert!(assignment.is_valid_derangement());
        }
    }

    #[test]
    fn test_perform_matching_keeps_join_order_for_givers() {
        let ps = participants(4);
        let assignment = perform_matching(&ps, 100, &mut Rng::with_seed(3));
        let givers: Vec<UserId> = assignment.givers().collect();
        let expected: Vec<UserId> = ps.iter().map(|p| p.user_id).collect();
        assert_eq!(givers, expected);
    }

    #[test]
    fn test_perform_matching_falls_back_to_rotation() {
        let ps = participants(5);
        let assignment = perform_matching(&ps, 0, &mut Rng::with_seed(0));
        for (i, p) in ps.iter().enumerate() {
            assert_eq!(
                assignment.recipient_for(p.user_id),
                Some(ps[(i + 1) % ps.len()].user_id)
            );
        }
    }

    #[tokio::test]
    async fn test_unknown_exchange_is_not_matched() {
        let t = TestDependencies::new();
        let matched = check_and_trigger_matching(ExchangeId::new(), &t.deps)
            .await
            .unwrap();
        assert!(!matched);
        assert!(t.notifier.match_calls().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_exchanges_leave_no_lock_entries() {
        let t = TestDependencies::new();
        for _ in 0..50 {
            check_and_trigger_matching(ExchangeId::new(), &t.deps)
                .await
                .unwrap();
        }
        assert_eq!(t.deps.locks.len().await, 0);
    }

    #[tokio::test]
    async fn test_match_commits_and_notifies_once() {
        let t = TestDependencies::new();
        let ex = open_exchange(&t, 3).await;
        for w in ["a", "b", "c"] {
            add(&t, &ex, w).await;
        }

        assert!(check_and_trigger_matching(ex.id, &t.deps).await.unwrap());
        assert!(!check_and_trigger_matching(ex.id, &t.deps).await.unwrap());

        let calls = t.notifier.match_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].exchange.status, ExchangeStatus::Matched);
        assert!(calls[0].assignment.is_valid_derangement());
    }

    #[tokio::test]
    async fn test_notification_failure_keeps_match() {
        let t = TestDependencies::with_notifier(SpyNotifier::failing());
        let ex = open_exchange(&t, 2).await;
        let a = add(&t, &ex, "tea").await;
        let b = add(&t, &ex, "coffee").await;

        assert!(check_and_trigger_matching(ex.id, &t.deps).await.unwrap());

        let stored = t.store.find_exchange(ex.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ExchangeStatus::Matched);
        let pa = t.store.find_participant(ex.id, a).await.unwrap().unwrap();
        let pb = t.store.find_participant(ex.id, b).await.unwrap().unwrap();
        assert_eq!(pa.santa_for, Some(b));
        assert_eq!(pb.santa_for, Some(a));
        assert_eq!(t.notifier.match_calls().len(), 1);
    }
}
