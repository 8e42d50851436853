use std::sync::Once;

use env_logger::{Builder, Env};

static INIT: Once = Once::new();

/// Installs an `env_logger` once per test binary. `RUST_LOG` overrides the
/// default `info` filter, e.g. `RUST_LOG=lrukit=trace` to see evictions.
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = Builder::from_env(Env::default().default_filter_or("info"))
            .is_test(true)
            .format_timestamp_millis()
            .try_init();
    });
}
