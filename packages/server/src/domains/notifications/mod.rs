pub mod messages;
pub mod models;
pub mod notifier;

pub use models::{DeliveryReport, MembershipChange};
pub use notifier::MessengerNotifier;
