//! The shard client interface the router dispatches operations against.

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Error type returned by a `ShardClient` call. The router never inspects
/// its shape; it's carried through `Error::ShardCallFailed` verbatim.
pub type ShardError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A finite set of group identifiers. Iteration order is never part of
/// the contract -- shards and the directory must accept and produce these
/// in any order.
pub type GroupSet = BTreeSet<String>;

/// A `(first, second)` pair used by the pair-valued mapping operations,
/// e.g. `(component, access_level)` or `(entity_type, entity)`.
pub type Pair = (String, String);

/// The full authorization-operation API a shard exposes. One method per
/// router operation in the routing table; argument and return shapes
/// match exactly so the router can forward them without translation.
///
/// Implementations are reused across requests and must be safe to call
/// concurrently from multiple tasks against the same instance.
#[async_trait]
pub trait ShardClient: Send + Sync {
    async fn get_users(&self) -> Result<Vec<String>, ShardError>;
    async fn get_groups(&self) -> Result<Vec<String>, ShardError>;
    async fn get_entity_types(&self) -> Result<Vec<String>, ShardError>;
    async fn get_entities(&self, entity_type: &str) -> Result<Vec<String>, ShardError>;

    async fn contains_group(&self, group: &str) -> Result<bool, ShardError>;
    async fn contains_entity_type(&self, entity_type: &str) -> Result<bool, ShardError>;
    async fn contains_entity(&self, entity_type: &str, entity: &str) -> Result<bool, ShardError>;

    async fn remove_group(&self, group: &str) -> Result<(), ShardError>;
    async fn remove_entity_type(&self, entity_type: &str) -> Result<(), ShardError>;
    async fn remove_entity(&self, entity_type: &str, entity: &str) -> Result<(), ShardError>;

    async fn get_group_to_user_mappings(&self, groups: &GroupSet) -> Result<Vec<Pair>, ShardError>;

    async fn get_application_component_to_user_mappings(
        &self,
        component: &str,
        access_level: &str,
    ) -> Result<Vec<String>, ShardError>;

    async fn get_application_component_to_group_mappings(
        &self,
        component: &str,
        access_level: &str,
    ) -> Result<Vec<String>, ShardError>;

    async fn get_entity_to_user_mappings(
        &self,
        entity_type: &str,
        entity: &str,
    ) -> Result<Vec<String>, ShardError>;

    async fn get_entity_to_group_mappings(
        &self,
        entity_type: &str,
        entity: &str,
    ) -> Result<Vec<String>, ShardError>;

    async fn has_access_to_application_component(
        &self,
        groups: &GroupSet,
        component: &str,
        access_level: &str,
    ) -> Result<bool, ShardError>;

    async fn has_access_to_entity(
        &self,
        groups: &GroupSet,
        entity_type: &str,
        entity: &str,
    ) -> Result<bool, ShardError>;

    async fn get_application_components_accessible_by_groups(
        &self,
        groups: &GroupSet,
    ) -> Result<Vec<Pair>, ShardError>;

    async fn get_entities_accessible_by_groups(
        &self,
        groups: &GroupSet,
    ) -> Result<Vec<Pair>, ShardError>;

    async fn get_entities_accessible_by_groups_of_type(
        &self,
        groups: &GroupSet,
        entity_type: &str,
    ) -> Result<Vec<String>, ShardError>;
}

/// An immutable, cheaply-copyable reference to a shard client and the
/// human-readable label it's identified by in logs and errors.
///
/// The router never constructs these itself; it receives them from a
/// [`crate::directory::ShardDirectory`].
#[derive(Clone)]
pub struct ClientHandle {
    client: Arc<dyn ShardClient>,
    label: Arc<str>,
}

impl ClientHandle {
    pub fn new(client: Arc<dyn ShardClient>, label: impl Into<Arc<str>>) -> Self {
        Self {
            client,
            label: label.into(),
        }
    }

    /// The shard label carried through errors and logs. Stable for the
    /// handle's lifetime.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn client(&self) -> &Arc<dyn ShardClient> {
        &self.client
    }
}

impl fmt::Debug for ClientHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientHandle").field("label", &self.label).finish()
    }
}
