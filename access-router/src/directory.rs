//! The shard-client directory: resolves which shards a given operation
//! must be dispatched to.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::axis::{Axis, OperationKind};
use crate::shard_client::{ClientHandle, GroupSet, ShardClient, ShardError};

/// Directory-level failure. `NoShardConfiguration` is a distinguished
/// signal, not a generic failure -- absence of configuration and an empty
/// shard list are different things, and the router pattern-matches on it
/// to implement `Both`-policy absence tolerance.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("no shard configuration for axis {axis} and operation kind {op_kind}")]
    NoShardConfiguration { axis: Axis, op_kind: OperationKind },

    #[error("shard directory backend error: {0}")]
    Backend(#[source] ShardError),
}

/// Resolves, for an (axis, operation-kind) pair, the shard clients that
/// must be contacted -- either all of them, or only those responsible for
/// a given set of group identifiers.
///
/// The concrete hashing/partitioning scheme used to assign group
/// identifiers to shards is not part of this contract; implementations
/// are free to use whatever scheme their deployment needs, as long as the
/// guarantees below hold.
#[async_trait]
pub trait ShardDirectory: Send + Sync {
    /// Every client configured for `axis`/`op_kind`. Fails with
    /// `NoShardConfiguration` if none are configured; never returns an
    /// empty list to mean the same thing.
    async fn resolve_all(
        &self,
        axis: Axis,
        op_kind: OperationKind,
    ) -> Result<Vec<ClientHandle>, DirectoryError>;

    /// Partitions `keys` across the shards responsible for them. The
    /// union of the returned subsets equals `keys` as sets -- no key is
    /// lost or duplicated -- except that keys no shard is responsible for
    /// are silently omitted (see the router's `GroupByKey` documentation).
    async fn resolve_by_keys(
        &self,
        axis: Axis,
        op_kind: OperationKind,
        keys: &GroupSet,
    ) -> Result<Vec<(ClientHandle, GroupSet)>, DirectoryError>;
}

/// A reference `ShardDirectory` built from static configuration
/// (`access-router-config::DirectoryConfig`) and a set of already-built
/// shard clients, keyed by label.
///
/// Group-shard ownership is exactly what the configuration says -- this
/// implementation does no hashing of its own. It's suitable for tests and
/// for small deployments where the group-to-shard assignment is managed
/// by hand; a deployment that needs computed partitioning supplies its
/// own `ShardDirectory`.
pub struct StaticShardDirectory {
    user_shards: Vec<ClientHandle>,
    group_shards: Vec<ClientHandle>,
    group_owners: HashMap<String, usize>,
}

impl StaticShardDirectory {
    /// Build a directory from explicit handle lists. `group_owners` maps
    /// group identifier to an index into `group_shards`.
    pub fn new(
        user_shards: Vec<ClientHandle>,
        group_shards: Vec<ClientHandle>,
        group_owners: HashMap<String, usize>,
    ) -> Self {
        Self {
            user_shards,
            group_shards,
            group_owners,
        }
    }

    /// Build a directory from configuration plus a label -> client map.
    /// Labels present in the configuration but missing from `clients` are
    /// dropped with a `tracing::warn!` -- callers are expected to have
    /// built a client for every configured shard before reaching here.
    pub fn from_config(
        config: &access_router_config::DirectoryConfig,
        clients: &HashMap<String, Arc<dyn ShardClient>>,
    ) -> Self {
        let mut user_shards = Vec::new();
        for shard in &config.user_shards {
            match clients.get(&shard.label) {
                Some(client) => user_shards.push(ClientHandle::new(client.clone(), shard.label.as_str())),
                None => tracing::warn!(label = %shard.label, "no client built for configured user shard"),
            }
        }

        let mut group_shards = Vec::new();
        let mut group_owners = HashMap::new();
        for shard in &config.group_shards {
            let Some(client) = clients.get(&shard.label) else {
                tracing::warn!(label = %shard.label, "no client built for configured group shard");
                continue;
            };
            let index = group_shards.len();
            group_shards.push(ClientHandle::new(client.clone(), shard.label.as_str()));
            for group in &shard.owned_groups {
                group_owners.insert(group.clone(), index);
            }
        }

        Self::new(user_shards, group_shards, group_owners)
    }
}

#[async_trait]
impl ShardDirectory for StaticShardDirectory {
    async fn resolve_all(
        &self,
        axis: Axis,
        op_kind: OperationKind,
    ) -> Result<Vec<ClientHandle>, DirectoryError> {
        let handles = match axis {
            Axis::User => &self.user_shards,
            Axis::Group => &self.group_shards,
        };

        if handles.is_empty() {
            return Err(DirectoryError::NoShardConfiguration { axis, op_kind });
        }

        Ok(handles.clone())
    }

    async fn resolve_by_keys(
        &self,
        axis: Axis,
        op_kind: OperationKind,
        keys: &GroupSet,
    ) -> Result<Vec<(ClientHandle, GroupSet)>, DirectoryError> {
        if self.group_shards.is_empty() {
            return Err(DirectoryError::NoShardConfiguration { axis, op_kind });
        }

        let mut by_shard: HashMap<usize, GroupSet> = HashMap::new();
        for key in keys {
            if let Some(&index) = self.group_owners.get(key) {
                by_shard.entry(index).or_default().insert(key.clone());
            }
        }

        let result = by_shard
            .into_iter()
            .map(|(index, subset)| (self.group_shards[index].clone(), subset))
            .collect();

        Ok(result)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_support::FakeShardClient;

    fn handle(label: &str) -> ClientHandle {
        ClientHandle::new(Arc::new(FakeShardClient::default()), label)
    }

    #[tokio::test]
    async fn resolve_all_fails_on_absent_axis() {
        let directory = StaticShardDirectory::new(vec![], vec![], HashMap::new());
        let err = directory
            .resolve_all(Axis::User, OperationKind::Query)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DirectoryError::NoShardConfiguration {
                axis: Axis::User,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn resolve_all_never_returns_empty_instead_of_the_signal() {
        let directory = StaticShardDirectory::new(vec![handle("u1")], vec![], HashMap::new());
        let resolved = directory.resolve_all(Axis::User, OperationKind::Query).await.unwrap();
        assert_eq!(resolved.len(), 1);
    }

    #[tokio::test]
    async fn resolve_by_keys_partitions_and_preserves_set_equality() {
        let g1 = handle("G1");
        let g2 = handle("G2");
        let mut owners = HashMap::new();
        owners.insert("g1".to_string(), 0);
        owners.insert("g2".to_string(), 0);
        owners.insert("g3".to_string(), 1);
        let directory = StaticShardDirectory::new(vec![], vec![g1, g2], owners);

        let keys: GroupSet = ["g1", "g2", "g3"].iter().map(|s| s.to_string()).collect();
        let resolved = directory
            .resolve_by_keys(Axis::Group, OperationKind::Query, &keys)
            .await
            .unwrap();

        let union: GroupSet = resolved.iter().flat_map(|(_, subset)| subset.clone()).collect();
        assert_eq!(union, keys);
    }

    #[tokio::test]
    async fn resolve_by_keys_silently_omits_unrouted_keys() {
        let g1 = handle("G1");
        let mut owners = HashMap::new();
        owners.insert("g1".to_string(), 0);
        let directory = StaticShardDirectory::new(vec![], vec![g1], owners);

        let keys: GroupSet = ["g1", "g6"].iter().map(|s| s.to_string()).collect();
        let resolved = directory
            .resolve_by_keys(Axis::Group, OperationKind::Query, &keys)
            .await
            .unwrap();

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].1, ["g1".to_string()].into_iter().collect::<GroupSet>());
    }

    #[tokio::test]
    async fn resolve_by_keys_order_irrelevance() {
        let g1 = handle("G1");
        let mut owners = HashMap::new();
        owners.insert("g1".to_string(), 0);
        owners.insert("g2".to_string(), 0);
        let directory = StaticShardDirectory::new(vec![], vec![g1], owners);

        let forward: GroupSet = ["g1", "g2"].iter().map(|s| s.to_string()).collect();
        let reverse: GroupSet = ["g2", "g1"].iter().map(|s| s.to_string()).collect();

        let a = directory.resolve_by_keys(Axis::Group, OperationKind::Query, &forward).await.unwrap();
        let b = directory.resolve_by_keys(Axis::Group, OperationKind::Query, &reverse).await.unwrap();
        assert_eq!(a.len(), b.len());
        assert_eq!(a[0].1, b[0].1);
    }
}
