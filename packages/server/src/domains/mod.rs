// Business domains
pub mod exchanges;
pub mod notifications;
