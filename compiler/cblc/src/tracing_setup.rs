//! Subscriber installation for the driver.
//!
//! - `RUST_LOG=cbl_copybook=debug`: resolution boundaries (copybooks
//!   entered, missing, cyclic, cancellation)
//! - `RUST_LOG=cbl_transform=trace`: every segment split
//! - `CBL_LOG_TREE=1`: indent output by span, following the include tree

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber. Safe to call more than once; does nothing
/// unless `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        let filter = EnvFilter::from_default_env();
        if std::env::var_os("CBL_LOG_TREE").is_some() {
            let tree = tracing_tree::HierarchicalLayer::new(2)
                .with_writer(std::io::stderr)
                .with_targets(true)
                .with_bracketed_fields(true);
            tracing_subscriber::registry().with(filter).with(tree).init();
        } else {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr).with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
