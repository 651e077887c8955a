//! In-memory fakes used by this crate's own unit tests. Not behind a
//! Cargo feature -- declared `#[cfg(test)]` at the `mod` site in
//! `lib.rs`, the way `pgdog`'s `backend/pool/test` module is.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use crate::directory::{DirectoryError, ShardDirectory};
use crate::metrics::{MetricId, MetricsSink};
use crate::shard_client::{ClientHandle, GroupSet, Pair, ShardClient, ShardError};
use crate::{Axis, OperationKind};

/// An error a [`FakeShardClient`] can be configured to fail with. Kept as
/// its own type (rather than a boxed string) so tests can assert cause
/// identity by downcasting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeFailure(pub String);

impl fmt::Display for FakeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for FakeFailure {}

/// A `ShardClient` whose every return value is configured up front and
/// whose calls are recorded for assertion.
#[derive(Default)]
pub struct FakeShardClient {
    pub users: Vec<String>,
    pub groups: Vec<String>,
    pub entity_types: Vec<String>,
    pub entities: Vec<String>,
    pub contains_group: bool,
    pub contains_entity_type: bool,
    pub contains_entity: bool,
    pub has_access_to_component: bool,
    pub has_access_to_entity: bool,
    pub group_to_user_mappings: Vec<Pair>,
    pub component_to_user_mappings: Vec<String>,
    pub component_to_group_mappings: Vec<String>,
    pub entity_to_user_mappings: Vec<String>,
    pub entity_to_group_mappings: Vec<String>,
    pub components_accessible: Vec<Pair>,
    pub entities_accessible: Vec<Pair>,
    pub entities_accessible_of_type: Vec<String>,
    pub fail: Option<FakeFailure>,
    calls: Mutex<Vec<&'static str>>,
}

impl FakeShardClient {
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            fail: Some(FakeFailure(message.into())),
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, name: &'static str) -> Result<(), ShardError> {
        self.calls.lock().unwrap().push(name);
        if let Some(failure) = &self.fail {
            return Err(Box::new(failure.clone()));
        }
        Ok(())
    }
}

#[async_trait]
impl ShardClient for FakeShardClient {
    async fn get_users(&self) -> Result<Vec<String>, ShardError> {
        self.record("get_users")?;
        Ok(self.users.clone())
    }

    async fn get_groups(&self) -> Result<Vec<String>, ShardError> {
        self.record("get_groups")?;
        Ok(self.groups.clone())
    }

    async fn get_entity_types(&self) -> Result<Vec<String>, ShardError> {
        self.record("get_entity_types")?;
        Ok(self.entity_types.clone())
    }

    async fn get_entities(&self, _entity_type: &str) -> Result<Vec<String>, ShardError> {
        self.record("get_entities")?;
        Ok(self.entities.clone())
    }

    async fn contains_group(&self, _group: &str) -> Result<bool, ShardError> {
        self.record("contains_group")?;
        Ok(self.contains_group)
    }

    async fn contains_entity_type(&self, _entity_type: &str) -> Result<bool, ShardError> {
        self.record("contains_entity_type")?;
        Ok(self.contains_entity_type)
    }

    async fn contains_entity(&self, _entity_type: &str, _entity: &str) -> Result<bool, ShardError> {
        self.record("contains_entity")?;
        Ok(self.contains_entity)
    }

    async fn remove_group(&self, _group: &str) -> Result<(), ShardError> {
        self.record("remove_group")
    }

    async fn remove_entity_type(&self, _entity_type: &str) -> Result<(), ShardError> {
        self.record("remove_entity_type")
    }

    async fn remove_entity(&self, _entity_type: &str, _entity: &str) -> Result<(), ShardError> {
        self.record("remove_entity")
    }

    async fn get_group_to_user_mappings(&self, _groups: &GroupSet) -> Result<Vec<Pair>, ShardError> {
        self.record("get_group_to_user_mappings")?;
        Ok(self.group_to_user_mappings.clone())
    }

    async fn get_application_component_to_user_mappings(
        &self,
        _component: &str,
        _access_level: &str,
    ) -> Result<Vec<String>, ShardError> {
        self.record("get_application_component_to_user_mappings")?;
        Ok(self.component_to_user_mappings.clone())
    }

    async fn get_application_component_to_group_mappings(
        &self,
        _component: &str,
        _access_level: &str,
    ) -> Result<Vec<String>, ShardError> {
        self.record("get_application_component_to_group_mappings")?;
        Ok(self.component_to_group_mappings.clone())
    }

    async fn get_entity_to_user_mappings(
        &self,
        _entity_type: &str,
        _entity: &str,
    ) -> Result<Vec<String>, ShardError> {
        self.record("get_entity_to_user_mappings")?;
        Ok(self.entity_to_user_mappings.clone())
    }

    async fn get_entity_to_group_mappings(
        &self,
        _entity_type: &str,
        _entity: &str,
    ) -> Result<Vec<String>, ShardError> {
        self.record("get_entity_to_group_mappings")?;
        Ok(self.entity_to_group_mappings.clone())
    }

    async fn has_access_to_application_component(
        &self,
        _groups: &GroupSet,
        _component: &str,
        _access_level: &str,
    ) -> Result<bool, ShardError> {
        self.record("has_access_to_application_component")?;
        Ok(self.has_access_to_component)
    }

    async fn has_access_to_entity(
        &self,
        _groups: &GroupSet,
        _entity_type: &str,
        _entity: &str,
    ) -> Result<bool, ShardError> {
        self.record("has_access_to_entity")?;
        Ok(self.has_access_to_entity)
    }

    async fn get_application_components_accessible_by_groups(
        &self,
        _groups: &GroupSet,
    ) -> Result<Vec<Pair>, ShardError> {
        self.record("get_application_components_accessible_by_groups")?;
        Ok(self.components_accessible.clone())
    }

    async fn get_entities_accessible_by_groups(&self, _groups: &GroupSet) -> Result<Vec<Pair>, ShardError> {
        self.record("get_entities_accessible_by_groups")?;
        Ok(self.entities_accessible.clone())
    }

    async fn get_entities_accessible_by_groups_of_type(
        &self,
        _groups: &GroupSet,
        _entity_type: &str,
    ) -> Result<Vec<String>, ShardError> {
        self.record("get_entities_accessible_by_groups_of_type")?;
        Ok(self.entities_accessible_of_type.clone())
    }
}

/// A `ShardDirectory` whose resolution is entirely pre-programmed, for
/// tests that need to control exactly which handles come back (including
/// the `NoShardConfiguration` absence case) without going through
/// `StaticShardDirectory`'s config-driven assembly.
#[derive(Default)]
pub struct FakeShardDirectory {
    pub user_handles: Option<Vec<ClientHandle>>,
    pub group_handles: Option<Vec<ClientHandle>>,
    pub group_partition: HashMap<String, usize>,
    pub group_shard_handles: Vec<ClientHandle>,
    pub resolve_all_calls: Mutex<Vec<(Axis, OperationKind)>>,
    /// When set, every `resolve_all`/`resolve_by_keys` call fails with
    /// `DirectoryError::Backend` instead of consulting
    /// `user_handles`/`group_handles` -- for exercising the "any other
    /// directory failure propagates" path, which `NoShardConfiguration`
    /// alone can't reach.
    pub backend_failure: Option<FakeFailure>,
}

#[async_trait]
impl ShardDirectory for FakeShardDirectory {
    async fn resolve_all(
        &self,
        axis: Axis,
        op_kind: OperationKind,
    ) -> Result<Vec<ClientHandle>, DirectoryError> {
        self.resolve_all_calls.lock().unwrap().push((axis, op_kind));
        if let Some(failure) = &self.backend_failure {
            return Err(DirectoryError::Backend(Box::new(failure.clone())));
        }
        let configured = match axis {
            Axis::User => &self.user_handles,
            Axis::Group => &self.group_handles,
        };
        configured
            .clone()
            .ok_or(DirectoryError::NoShardConfiguration { axis, op_kind })
    }

    async fn resolve_by_keys(
        &self,
        axis: Axis,
        op_kind: OperationKind,
        keys: &GroupSet,
    ) -> Result<Vec<(ClientHandle, GroupSet)>, DirectoryError> {
        if let Some(failure) = &self.backend_failure {
            return Err(DirectoryError::Backend(Box::new(failure.clone())));
        }
        if self.group_shard_handles.is_empty() {
            return Err(DirectoryError::NoShardConfiguration { axis, op_kind });
        }

        let mut by_shard: HashMap<usize, GroupSet> = HashMap::new();
        for key in keys {
            if let Some(&index) = self.group_partition.get(key) {
                by_shard.entry(index).or_default().insert(key.clone());
            }
        }

        Ok(by_shard
            .into_iter()
            .map(|(index, subset)| (self.group_shard_handles[index].clone(), subset))
            .collect())
    }
}

/// A [`MetricsSink`] that records every signal it receives.
#[derive(Default)]
pub struct FakeMetricsSink {
    events: Mutex<Vec<String>>,
}

impl FakeMetricsSink {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetricsSink for FakeMetricsSink {
    async fn begin(&self, metric_name: &str) -> MetricId {
        self.events.lock().unwrap().push(format!("begin:{metric_name}"));
        MetricId(0)
    }

    async fn end(&self, _id: MetricId, metric_name: &str) {
        self.events.lock().unwrap().push(format!("end:{metric_name}"));
    }

    fn increment(&self, metric_name: &str) {
        self.events.lock().unwrap().push(format!("increment:{metric_name}"));
    }

    async fn cancel_begin(&self, _id: MetricId, metric_name: &str) {
        self.events.lock().unwrap().push(format!("cancel:{metric_name}"));
    }
}

pub fn client_handle(label: &str, client: FakeShardClient) -> ClientHandle {
    ClientHandle::new(Arc::new(client), label)
}
