//! Message text for bot notifications (Telegram legacy Markdown).

use crate::domains::notifications::models::MembershipChange;

pub const NO_WISHLIST_TEXT: &str = "No wishlist provided.";

/// Escape the characters legacy Markdown treats as markup, so user-supplied
/// names and wishlists cannot break message parsing.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Sent privately to each giver once the draw is done.
pub fn match_alert(exchange_title: &str, recipient_name: &str, wishlist: &str) -> String {
    let wishlist = if wishlist.trim().is_empty() {
        NO_WISHLIST_TEXT.to_string()
    } else {
        escape_markdown(wishlist.trim())
    };

    format!(
        "🎅 *Match Alert!*\n\n\
         You are the Santa for *{}* in *{}*!\n\n\
         *Their Wishlist:*\n{}",
        escape_markdown(recipient_name),
        escape_markdown(exchange_title),
        wishlist
    )
}

/// Sent to the exchange creator when the participant list changes.
pub fn membership_update(
    change: MembershipChange,
    participant_name: &str,
    exchange_title: &str,
    participant_count: usize,
    target_count: u32,
) -> String {
    format!(
        "{} *Event Update*\n\n\
         *{}* {} your event:\n\
         *{}*\n\n\
         Participants: {}/{}",
        change.emoji(),
        escape_markdown(participant_name),
        change.verb(),
        escape_markdown(exchange_title),
        participant_count,
        target_count
    )
}
