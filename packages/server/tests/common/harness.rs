//! Test harness for exchange integration tests.
//!
//! Each test gets a fresh in-memory store, a spy notifier and a seeded RNG,
//! wired through the same `ServerDeps` the binary uses.

use std::sync::Arc;

use santa_core::kernel::{InMemoryExchangeStore, ServerDeps, SpyNotifier, TestDependencies};
use test_context::AsyncTestContext;

/// Test harness that owns one set of test dependencies.
///
/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let exchange = ctx.open_exchange(3).await;
///     // ... test code
/// }
/// ```
pub struct TestHarness {
    pub test_deps: TestDependencies,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new()
    }

    async fn teardown(self) {
        // In-memory state is dropped with the harness
    }
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_notifier(SpyNotifier::new())
    }

    pub fn with_notifier(notifier: SpyNotifier) -> Self {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        Self {
            test_deps: TestDependencies::with_notifier(notifier),
        }
    }

    pub fn deps(&self) -> &ServerDeps {
        &self.test_deps.deps
    }

    pub fn store(&self) -> &Arc<InMemoryExchangeStore> {
        &self.test_deps.store
    }

    pub fn notifier(&self) -> &Arc<SpyNotifier> {
        &self.test_deps.notifier
    }
}
