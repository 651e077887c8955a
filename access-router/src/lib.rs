//! Fan-out/aggregation façade for a sharded access-manager backend.
//!
//! [`router::OperationRouter`] is the crate's single entry point: given a
//! [`directory::ShardDirectory`] that knows how shards are laid out, it
//! resolves the right [`shard_client::ClientHandle`]s for each operation,
//! dispatches them concurrently (see [`fanout`]), and merges the partial
//! results with the combinator the operation calls for (see
//! [`combinators`]). The router holds no state of its own across calls.

pub mod axis;
pub mod combinators;
pub mod directory;
pub mod error;
pub mod fanout;
pub mod metrics;
pub mod router;
pub mod shard_client;

#[cfg(test)]
pub mod test_support;

pub use axis::{Axis, AxisPolicy, OperationKind};
pub use directory::{DirectoryError, ShardDirectory, StaticShardDirectory};
pub use error::Error;
pub use metrics::{MetricId, MetricsSink, NoopMetricsSink};
pub use router::OperationRouter;
pub use shard_client::{ClientHandle, GroupSet, Pair, ShardClient, ShardError};

use std::io::IsTerminal;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a `tracing-subscriber` registry with an ANSI-aware stderr
/// formatter and an `EnvFilter` defaulting to `info`. Call once, from a
/// binary's `main`; the router itself only ever calls into `tracing`'s
/// facade, never this.
pub fn init_tracing() {
    let format = fmt::layer().with_ansi(std::io::stderr().is_terminal()).with_target(true);

    let filter = EnvFilter::builder().with_default_directive(LevelFilter::INFO.into()).from_env_lossy();

    tracing_subscriber::registry().with(format).with(filter).init();
}
