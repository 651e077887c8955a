use crate::axis::OperationKind;
use crate::combinators::set_union;
use crate::directory::ShardDirectory;
use crate::error::Error;
use crate::fanout;
use crate::shard_client::{GroupSet, Pair};

use super::OperationRouter;

impl<D: ShardDirectory> OperationRouter<D> {
    /// True iff any group in `groups` has access to `(component,
    /// access_level)`. Only the Group shards responsible for `groups` are
    /// contacted, each with just its assigned subset.
    pub async fn has_access_to_application_component(
        &self,
        groups: &GroupSet,
        component: &str,
        access_level: &str,
    ) -> Result<bool, Error> {
        self.timed("has_access_to_application_component", async {
            let items = self.resolve_group_by_key(OperationKind::Query, groups).await?;
            let context = format!(
                "check access to application component '{component}' at access level '{access_level}' for multiple groups"
            );
            let component = component.to_string();
            let access_level = access_level.to_string();
            fanout::fanout_any_keyed(
                &items,
                move |handle, subset| {
                    let component = component.clone();
                    let access_level = access_level.clone();
                    async move {
                        handle
                            .client()
                            .has_access_to_application_component(&subset, &component, &access_level)
                            .await
                    }
                },
                &context,
                "from",
            )
            .await
        })
        .await
    }

    /// True iff any group in `groups` has access to `(entity_type,
    /// entity)`. Only the Group shards responsible for `groups` are
    /// contacted, each with just its assigned subset.
    pub async fn has_access_to_entity(
        &self,
        groups: &GroupSet,
        entity_type: &str,
        entity: &str,
    ) -> Result<bool, Error> {
        self.timed("has_access_to_entity", async {
            let items = self.resolve_group_by_key(OperationKind::Query, groups).await?;
            let context = format!("check access to entity '{entity}' with type '{entity_type}' for multiple groups");
            let entity_type = entity_type.to_string();
            let entity = entity.to_string();
            fanout::fanout_any_keyed(
                &items,
                move |handle, subset| {
                    let entity_type = entity_type.clone();
                    let entity = entity.clone();
                    async move { handle.client().has_access_to_entity(&subset, &entity_type, &entity).await }
                },
                &context,
                "from",
            )
            .await
        })
        .await
    }

    /// `(component, access_level)` pairs accessible by any group in
    /// `groups`. Only the Group shards responsible for `groups` are
    /// contacted, each with just its assigned subset.
    pub async fn get_application_components_accessible_by_groups(&self, groups: &GroupSet) -> Result<Vec<Pair>, Error> {
        self.timed("get_application_components_accessible_by_groups", async {
            let items = self.resolve_group_by_key(OperationKind::Query, groups).await?;
            let per_shard = fanout::fanout_keyed(
                &items,
                |handle, subset| async move {
                    handle.client().get_application_components_accessible_by_groups(&subset).await
                },
                "retrieve application component and access level mappings for multiple groups",
                "from",
            )
            .await?;
            Ok(set_union(per_shard))
        })
        .await
    }

    /// `(entity_type, entity)` pairs accessible by any group in `groups`.
    /// Only the Group shards responsible for `groups` are contacted,
    /// each with just its assigned subset.
    pub async fn get_entities_accessible_by_groups(&self, groups: &GroupSet) -> Result<Vec<Pair>, Error> {
        self.timed("get_entities_accessible_by_groups", async {
            let items = self.resolve_group_by_key(OperationKind::Query, groups).await?;
            let per_shard = fanout::fanout_keyed(
                &items,
                |handle, subset| async move { handle.client().get_entities_accessible_by_groups(&subset).await },
                "retrieve entity mappings for multiple groups",
                "from",
            )
            .await?;
            Ok(set_union(per_shard))
        })
        .await
    }

    /// Entities of `entity_type` accessible by any group in `groups`.
    /// Only the Group shards responsible for `groups` are contacted,
    /// each with just its assigned subset.
    pub async fn get_entities_accessible_by_groups_of_type(
        &self,
        groups: &GroupSet,
        entity_type: &str,
    ) -> Result<Vec<String>, Error> {
        self.timed("get_entities_accessible_by_groups_of_type", async {
            let items = self.resolve_group_by_key(OperationKind::Query, groups).await?;
            let context = format!("retrieve entity mappings for multiple groups and entity type '{entity_type}'");
            let entity_type = entity_type.to_string();
            let per_shard = fanout::fanout_keyed(
                &items,
                move |handle, subset| {
                    let entity_type = entity_type.clone();
                    async move {
                        handle
                            .client()
                            .get_entities_accessible_by_groups_of_type(&subset, &entity_type)
                            .await
                    }
                },
                &context,
                "from",
            )
            .await?;
            Ok(set_union(per_shard))
        })
        .await
    }
}
