//! Router-level errors.

use thiserror::Error;

use crate::axis::{Axis, OperationKind};
use crate::shard_client::ShardError;

/// A routing-level failure. Every shard failure a fan-out encounters is
/// wrapped into one of these before it reaches the caller; the router
/// never surfaces a bare shard-client error.
#[derive(Debug, Error)]
pub enum Error {
    /// A single shard call failed during fan-out. `context` and `label`
    /// together reproduce the deterministic prefix documented on each
    /// router operation; `cause` is the original failure, reachable
    /// programmatically via [`std::error::Error::source`].
    #[error("Failed to {context} {connector} shard with configuration '{label}'.")]
    ShardCallFailed {
        context: String,
        connector: &'static str,
        label: String,
        #[source]
        cause: ShardError,
    },

    /// The directory has no shards configured for a single-axis policy
    /// that required them. Unlike the `Both` policy, this isn't
    /// recoverable -- there's no other axis to fall back on.
    #[error("no shard configuration for axis {axis} and operation kind {op_kind}")]
    NoShardConfiguration { axis: Axis, op_kind: OperationKind },

    /// The directory itself failed for a reason other than missing
    /// configuration.
    #[error("shard directory error: {0}")]
    Directory(#[source] ShardError),

    /// `includeIndirectMappings = true` was rejected before any shard or
    /// directory call was made.
    #[error("\"{parameter_name}\" parameter is not supported with value {value}")]
    UnsupportedParameter {
        parameter_name: &'static str,
        value: bool,
    },

    /// The outer cancellation scope fired before the operation completed.
    ///
    /// The router adds no cancellation machinery of its own -- a caller
    /// with a deadline or cancel token races the router call structurally
    /// (`tokio::select!` against `token.cancelled()`), the same way a
    /// `pgdog` client connection is torn down by dropping its future
    /// rather than by polling a flag inside the future. This variant
    /// exists so a host that *does* want to surface cancellation as a
    /// typed `Error` (e.g. to log it alongside `ShardCallFailed`) has
    /// somewhere to put it.
    #[error("operation cancelled")]
    Cancelled,
}
