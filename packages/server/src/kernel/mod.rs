//! Kernel module - collaborators, dependency container and lifecycle.

pub mod deps;
pub mod exchange_locks;
pub mod memory_store;
pub mod server_kernel;
pub mod test_dependencies;
pub mod traits;

pub use deps::{NoopMessenger, ServerDeps, TelegramMessenger};
pub use exchange_locks::ExchangeLocks;
pub use memory_store::InMemoryExchangeStore;
pub use server_kernel::ServerKernel;
pub use test_dependencies::{SpyMessenger, SpyNotifier, TestDependencies};
pub use traits::*;
