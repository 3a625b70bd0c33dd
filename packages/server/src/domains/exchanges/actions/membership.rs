//! Membership actions - creating exchanges and joining, leaving, deleting them
//!
//! Every mutation of an exchange's participant list runs under that
//! exchange's lock, together with the matching check it may trigger.
//! Notifications go out after the lock is released.

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::matching::{match_if_ready, notify_committed_match};
use crate::common::{ExchangeId, UserId};
use crate::domains::exchanges::errors::ExchangeError;
use crate::domains::exchanges::models::{
    Exchange, ExchangeStatus, NewExchange, Participant, SantaTarget,
};
use crate::domains::exchanges::utils::{generate_invite_code, normalize_invite_code};
use crate::domains::notifications::MembershipChange;
use crate::kernel::ServerDeps;

/// Name shown to the creator when a participant has no profile
const UNKNOWN_PARTICIPANT_NAME: &str = "Someone";

/// Result of a successful `join_exchange`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// The caller is in the exchange (newly, or with an updated wishlist).
    Joined {
        exchange_id: ExchangeId,
        newly_joined: bool,
        /// This join completed the group and the draw happened
        matched: bool,
    },
    /// The exchange was already drawn and the caller is part of it.
    AlreadyMatched { exchange_id: ExchangeId },
}

/// Create an OPEN exchange with a fresh invite code.
pub async fn create_exchange(
    input: NewExchange,
    deps: &ServerDeps,
) -> Result<Exchange, ExchangeError> {
    let title = input.title.trim();
    if title.is_empty() {
        return Err(ExchangeError::EmptyTitle);
    }
    if input.budget < Decimal::ZERO {
        return Err(ExchangeError::InvalidBudget);
    }
    if input.target_count < 2 {
        return Err(ExchangeError::TargetTooSmall(input.target_count));
    }

    let code = unused_invite_code(deps).await?;

    let exchange = Exchange {
        id: ExchangeId::new(),
        code,
        title: title.to_string(),
        description: input.description.trim().to_string(),
        budget: input.budget,
        target_count: input.target_count,
        status: ExchangeStatus::Open,
        creator_id: input.creator_id,
        created_at: Utc::now(),
    };
    deps.store.insert_exchange(&exchange).await?;

    info!(
        exchange_id = %exchange.id,
        code = %exchange.code,
        target_count = exchange.target_count,
        "Exchange created"
    );
    Ok(exchange)
}

async fn unused_invite_code(deps: &ServerDeps) -> Result<String, ExchangeError> {
    let max_attempts = deps.settings.invite_code_max_attempts;
    let mut rng = deps.fork_rng().await;
    for _ in 0..max_attempts {
        let code = generate_invite_code(&mut rng);
        if !deps.store.code_exists(&code).await? {
            return Ok(code);
        }
        debug!(code = %code, "Invite code already taken, retrying");
    }
    Err(ExchangeError::CodeSpaceExhausted(max_attempts))
}

/// Look an exchange up by invite code, ignoring case and surrounding blanks.
pub async fn find_exchange_by_code(
    code: &str,
    deps: &ServerDeps,
) -> Result<Option<Exchange>, ExchangeError> {
    let code = normalize_invite_code(code);
    if code.is_empty() {
        return Ok(None);
    }
    Ok(deps.store.find_exchange_by_code(&code).await?)
}

/// Join an exchange by invite code, or update the caller's wishlist if they
/// are already in it. May complete the group and trigger the draw.
pub async fn join_exchange(
    code: &str,
    user_id: UserId,
    wishlist: &str,
    deps: &ServerDeps,
) -> Result<JoinOutcome, ExchangeError> {
    let exchange = find_exchange_by_code(code, deps)
        .await?
        .ok_or_else(|| ExchangeError::InvalidCode(code.trim().to_string()))?;

    let guard = deps.locks.acquire(exchange.id).await;

    // Re-read under the lock; a concurrent join may have matched it.
    let Some(exchange) = deps.store.find_exchange(exchange.id).await? else {
        deps.locks.forget(exchange.id).await;
        return Err(ExchangeError::NotFound(exchange.id));
    };
    let existing = deps.store.find_participant(exchange.id, user_id).await?;

    if exchange.is_matched() {
        return match existing {
            Some(_) => Ok(JoinOutcome::AlreadyMatched {
                exchange_id: exchange.id,
            }),
            None => Err(ExchangeError::AlreadyMatched),
        };
    }

    let participant = Participant::new(exchange.id, user_id, wishlist);
    if !participant.has_wishlist() {
        return Err(ExchangeError::EmptyWishlist);
    }

    let newly_joined = existing.is_none();
    if newly_joined {
        let joined = deps.store.list_participants(exchange.id).await?.len();
        if joined >= exchange.target_len() {
            return Err(ExchangeError::ExchangeFull(exchange.target_count));
        }
    }
    deps.store.upsert_participant(&participant).await?;

    let participant_count = deps.store.list_participants(exchange.id).await?.len();
    if newly_joined {
        info!(
            exchange_id = %exchange.id,
            user_id = %user_id,
            participant_count,
            "Participant joined exchange"
        );
    } else {
        debug!(exchange_id = %exchange.id, user_id = %user_id, "Wishlist updated");
    }

    let committed = match_if_ready(exchange.id, deps).await?;
    drop(guard);

    if newly_joined {
        notify_creator(&exchange, MembershipChange::Joined, user_id, participant_count, deps)
            .await;
    }
    if let Some(committed) = &committed {
        notify_committed_match(committed, deps).await;
    }

    Ok(JoinOutcome::Joined {
        exchange_id: exchange.id,
        newly_joined,
        matched: committed.is_some(),
    })
}

/// Leave an OPEN exchange. Returns false if the caller was not in it.
pub async fn leave_exchange(
    exchange_id: ExchangeId,
    user_id: UserId,
    deps: &ServerDeps,
) -> Result<bool, ExchangeError> {
    let guard = deps.locks.acquire(exchange_id).await;

    let Some(exchange) = deps.store.find_exchange(exchange_id).await? else {
        deps.locks.forget(exchange_id).await;
        return Err(ExchangeError::NotFound(exchange_id));
    };
    if exchange.is_matched() {
        return Err(ExchangeError::AlreadyMatched);
    }

    if !deps.store.remove_participant(exchange_id, user_id).await? {
        return Ok(false);
    }
    let participant_count = deps.store.list_participants(exchange_id).await?.len();
    drop(guard);

    info!(
        exchange_id = %exchange_id,
        user_id = %user_id,
        participant_count,
        "Participant left exchange"
    );
    notify_creator(&exchange, MembershipChange::Left, user_id, participant_count, deps).await;
    Ok(true)
}

/// Delete an exchange and its participants. Creator only, in either state.
pub async fn delete_exchange(
    exchange_id: ExchangeId,
    user_id: UserId,
    deps: &ServerDeps,
) -> Result<(), ExchangeError> {
    {
        let _guard = deps.locks.acquire(exchange_id).await;

        let Some(exchange) = deps.store.find_exchange(exchange_id).await? else {
            deps.locks.forget(exchange_id).await;
            return Err(ExchangeError::NotFound(exchange_id));
        };
        if exchange.creator_id != user_id {
            return Err(ExchangeError::NotCreator);
        }
        deps.store.delete_exchange(exchange_id).await?;
    }
    deps.locks.forget(exchange_id).await;

    info!(exchange_id = %exchange_id, "Exchange deleted");
    Ok(())
}

/// Who `user_id` gives to in a matched exchange, with that person's wishlist.
///
/// `None` while the exchange is open or when the caller is not in it.
pub async fn santa_target(
    exchange_id: ExchangeId,
    user_id: UserId,
    deps: &ServerDeps,
) -> Result<Option<SantaTarget>, ExchangeError> {
    let exchange = deps
        .store
        .find_exchange(exchange_id)
        .await?
        .ok_or(ExchangeError::NotFound(exchange_id))?;
    if !exchange.is_matched() {
        return Ok(None);
    }

    let Some(recipient_id) = deps
        .store
        .find_participant(exchange_id, user_id)
        .await?
        .and_then(|p| p.santa_for)
    else {
        return Ok(None);
    };

    let Some(recipient) = deps.store.find_user(recipient_id).await? else {
        warn!(user_id = %recipient_id, "Matched recipient has no profile");
        return Ok(None);
    };
    let wishlist_text = deps
        .store
        .find_participant(exchange_id, recipient_id)
        .await?
        .map(|p| p.wishlist_text)
        .unwrap_or_default();

    Ok(Some(SantaTarget {
        recipient,
        wishlist_text,
    }))
}

/// Best-effort: errors are logged, never returned.
async fn notify_creator(
    exchange: &Exchange,
    change: MembershipChange,
    user_id: UserId,
    participant_count: usize,
    deps: &ServerDeps,
) {
    let name = match deps.store.find_user(user_id).await {
        Ok(Some(user)) => user.name,
        Ok(None) => UNKNOWN_PARTICIPANT_NAME.to_string(),
        Err(e) => {
            warn!(user_id = %user_id, error = %e, "Failed to load participant profile");
            UNKNOWN_PARTICIPANT_NAME.to_string()
        }
    };

    if let Err(e) = deps
        .notifier
        .notify_membership(exchange, change, &name, participant_count)
        .await
    {
        warn!(
            exchange_id = %exchange.id,
            error = %e,
            "Error notifying creator about membership change"
        );
    }
}
