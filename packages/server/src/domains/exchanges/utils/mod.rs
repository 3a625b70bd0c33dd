pub mod derangement;
pub mod eligibility;
pub mod invite_code;

pub use derangement::{derange, derange_with_attempts, MAX_SHUFFLE_ATTEMPTS};
pub use eligibility::{matching_readiness, should_trigger_matching, MatchReadiness};
pub use invite_code::{generate_invite_code, is_well_formed_invite_code, normalize_invite_code};
