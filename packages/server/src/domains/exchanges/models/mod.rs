pub mod assignment;
pub mod exchange;
pub mod participant;
pub mod user_profile;

pub use assignment::Assignment;
pub use exchange::{Exchange, ExchangeStatus, NewExchange};
pub use participant::Participant;
pub use user_profile::{SantaTarget, UserProfile};
