pub mod tracing_factory;

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Installs a bare TRACE-level subscriber for unit tests. Ignores the
/// error if a global subscriber is already set, since many tests in the
/// same binary call this.
pub fn init_test_log() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
