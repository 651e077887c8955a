//! The operation router: for each externally-exposed operation, chooses
//! an axis policy, resolves shard clients, fans the call out, and merges
//! the results under the right combinator.
//!
//! The router is stateless -- nothing here persists across calls, and
//! nothing about a prior operation can be observed from a later one.

mod accessibility;
mod entities;
mod entity_types;
mod groups;
mod mappings;
mod users;

use std::future::Future;
use std::sync::Arc;

use crate::axis::{Axis, AxisPolicy, OperationKind};
use crate::directory::{DirectoryError, ShardDirectory};
use crate::error::Error;
use crate::metrics::{MetricsSink, NoopMetricsSink};
use crate::shard_client::{ClientHandle, GroupSet};

/// Parameter name used in every `UnsupportedParameter` rejection; the
/// router never supports recursive ("indirect") mapping traversal.
const INCLUDE_INDIRECT_MAPPINGS: &str = "includeIndirectMappings";

/// Fans operations out across the User and/or Group axes and aggregates
/// the partial results. Generic over `D`, the shard-client directory
/// implementation -- the router otherwise has no idea how shards are
/// discovered or partitioned.
pub struct OperationRouter<D> {
    directory: D,
    metrics: Arc<dyn MetricsSink>,
}

impl<D: ShardDirectory> OperationRouter<D> {
    /// Build a router backed by `directory`, with metrics discarded.
    pub fn new(directory: D) -> Self {
        Self::with_metrics(directory, Arc::new(NoopMetricsSink))
    }

    /// Build a router backed by `directory`, reporting to `metrics`.
    pub fn with_metrics(directory: D, metrics: Arc<dyn MetricsSink>) -> Self {
        Self { directory, metrics }
    }

    /// Reject `includeIndirectMappings = true` before any directory or
    /// shard call is made.
    fn reject_indirect_mappings(&self, include_indirect_mappings: bool) -> Result<(), Error> {
        if include_indirect_mappings {
            return Err(Error::UnsupportedParameter {
                parameter_name: INCLUDE_INDIRECT_MAPPINGS,
                value: true,
            });
        }
        Ok(())
    }

    /// Resolve the handle list for a non-keyed [`AxisPolicy`]. `GroupByKey`
    /// carries its own keys and return shape (each handle paired with its
    /// assigned subset) and is resolved separately via
    /// [`Self::resolve_group_by_key`].
    async fn resolve(&self, policy: AxisPolicy, op_kind: OperationKind) -> Result<Vec<ClientHandle>, Error> {
        match policy {
            AxisPolicy::UserOnly => self.resolve_user_only(op_kind).await,
            AxisPolicy::GroupOnly => self.resolve_group_only(op_kind).await,
            AxisPolicy::Both => self.resolve_both(op_kind).await,
            AxisPolicy::GroupByKey => {
                unreachable!("GroupByKey resolves via resolve_group_by_key, which needs a key set")
            }
        }
    }

    /// `UserOnly` policy: every User-axis client, or a fatal
    /// `NoShardConfiguration` if the axis is unconfigured.
    async fn resolve_user_only(&self, op_kind: OperationKind) -> Result<Vec<ClientHandle>, Error> {
        self.directory
            .resolve_all(Axis::User, op_kind)
            .await
            .map_err(|err| self.fatal(err))
    }

    /// `GroupOnly` policy: every Group-axis client, or a fatal
    /// `NoShardConfiguration` if the axis is unconfigured.
    async fn resolve_group_only(&self, op_kind: OperationKind) -> Result<Vec<ClientHandle>, Error> {
        self.directory
            .resolve_all(Axis::Group, op_kind)
            .await
            .map_err(|err| self.fatal(err))
    }

    /// `Both` policy: every User-axis client and every Group-axis client.
    /// `NoShardConfiguration` from either axis is swallowed and treated
    /// as an empty handle list for that axis -- a deployment with only
    /// one axis configured is legitimate. Any other directory failure
    /// propagates.
    async fn resolve_both(&self, op_kind: OperationKind) -> Result<Vec<ClientHandle>, Error> {
        let (user, group) = tokio::join!(
            self.directory.resolve_all(Axis::User, op_kind),
            self.directory.resolve_all(Axis::Group, op_kind),
        );

        let mut handles = tolerate_absence(user)?;
        handles.extend(tolerate_absence(group)?);
        Ok(handles)
    }

    /// `GroupByKey` policy: only the Group shards responsible for `keys`,
    /// each with its own subset. No axis-absence tolerance here --
    /// `Both` is the only policy that has it.
    async fn resolve_group_by_key(
        &self,
        op_kind: OperationKind,
        keys: &GroupSet,
    ) -> Result<Vec<(ClientHandle, GroupSet)>, Error> {
        self.directory
            .resolve_by_keys(Axis::Group, op_kind, keys)
            .await
            .map_err(|err| self.fatal(err))
    }

    fn fatal(&self, err: DirectoryError) -> Error {
        match err {
            DirectoryError::NoShardConfiguration { axis, op_kind } => {
                Error::NoShardConfiguration { axis, op_kind }
            }
            DirectoryError::Backend(cause) => Error::Directory(cause),
        }
    }

    /// Wrap `operation` with a begin/end (or begin/cancel on failure)
    /// metrics pair and a single increment, the way every router method
    /// reports itself.
    async fn timed<T>(&self, metric_name: &'static str, operation: impl Future<Output = Result<T, Error>>) -> Result<T, Error> {
        self.metrics.increment(metric_name);
        let id = self.metrics.begin(metric_name).await;
        match operation.await {
            Ok(value) => {
                self.metrics.end(id, metric_name).await;
                Ok(value)
            }
            Err(err) => {
                self.metrics.cancel_begin(id, metric_name).await;
                Err(err)
            }
        }
    }
}

/// Catch only `NoShardConfiguration` and substitute an empty list; any
/// other directory failure propagates as-is.
fn tolerate_absence(result: Result<Vec<ClientHandle>, DirectoryError>) -> Result<Vec<ClientHandle>, Error> {
    match result {
        Ok(handles) => Ok(handles),
        Err(DirectoryError::NoShardConfiguration { .. }) => Ok(Vec::new()),
        Err(DirectoryError::Backend(cause)) => Err(Error::Directory(cause)),
    }
}
