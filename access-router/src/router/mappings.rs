use crate::axis::{AxisPolicy, OperationKind};
use crate::combinators::set_union;
use crate::directory::ShardDirectory;
use crate::error::Error;
use crate::fanout;
use crate::shard_client::{GroupSet, Pair};

use super::OperationRouter;

impl<D: ShardDirectory> OperationRouter<D> {
    /// Group-to-user mappings for every group in `groups`, from every
    /// User-axis shard. Each shard receives the full, un-partitioned set.
    pub async fn get_group_to_user_mappings(&self, groups: &GroupSet) -> Result<Vec<Pair>, Error> {
        self.timed("get_group_to_user_mappings", async {
            let handles = self.resolve(AxisPolicy::UserOnly, OperationKind::Query).await?;
            let groups = groups.clone();
            let per_shard = fanout::fanout(
                &handles,
                move |handle| {
                    let groups = groups.clone();
                    async move { handle.client().get_group_to_user_mappings(&groups).await }
                },
                "retrieve group to user mappings for multiple groups",
                "from",
            )
            .await?;
            Ok(set_union(per_shard))
        })
        .await
    }

    /// Users mapped to `(component, access_level)`, from every User-axis
    /// shard. Rejects `include_indirect_mappings = true`.
    pub async fn get_application_component_to_user_mappings(
        &self,
        component: &str,
        access_level: &str,
        include_indirect_mappings: bool,
    ) -> Result<Vec<String>, Error> {
        self.reject_indirect_mappings(include_indirect_mappings)?;
        self.timed("get_application_component_to_user_mappings", async {
            let handles = self.resolve(AxisPolicy::UserOnly, OperationKind::Query).await?;
            let component = component.to_string();
            let access_level = access_level.to_string();
            let per_shard = fanout::fanout(
                &handles,
                move |handle| {
                    let component = component.clone();
                    let access_level = access_level.clone();
                    async move {
                        handle
                            .client()
                            .get_application_component_to_user_mappings(&component, &access_level)
                            .await
                    }
                },
                "retrieve application component and access level to user mappings",
                "from",
            )
            .await?;
            Ok(set_union(per_shard))
        })
        .await
    }

    /// Groups mapped to `(component, access_level)`, from every
    /// Group-axis shard. Rejects `include_indirect_mappings = true`.
    pub async fn get_application_component_to_group_mappings(
        &self,
        component: &str,
        access_level: &str,
        include_indirect_mappings: bool,
    ) -> Result<Vec<String>, Error> {
        self.reject_indirect_mappings(include_indirect_mappings)?;
        self.timed("get_application_component_to_group_mappings", async {
            let handles = self.resolve(AxisPolicy::GroupOnly, OperationKind::Query).await?;
            let component = component.to_string();
            let access_level = access_level.to_string();
            let per_shard = fanout::fanout(
                &handles,
                move |handle| {
                    let component = component.clone();
                    let access_level = access_level.clone();
                    async move {
                        handle
                            .client()
                            .get_application_component_to_group_mappings(&component, &access_level)
                            .await
                    }
                },
                "retrieve application component and access level to group mappings",
                "from",
            )
            .await?;
            Ok(set_union(per_shard))
        })
        .await
    }

    /// Users mapped to `(entity_type, entity)`, from every User-axis
    /// shard. Rejects `include_indirect_mappings = true`.
    pub async fn get_entity_to_user_mappings(
        &self,
        entity_type: &str,
        entity: &str,
        include_indirect_mappings: bool,
    ) -> Result<Vec<String>, Error> {
        self.reject_indirect_mappings(include_indirect_mappings)?;
        self.timed("get_entity_to_user_mappings", async {
            let handles = self.resolve(AxisPolicy::UserOnly, OperationKind::Query).await?;
            let entity_type = entity_type.to_string();
            let entity = entity.to_string();
            let per_shard = fanout::fanout(
                &handles,
                move |handle| {
                    let entity_type = entity_type.clone();
                    let entity = entity.clone();
                    async move { handle.client().get_entity_to_user_mappings(&entity_type, &entity).await }
                },
                "retrieve entity to user mappings",
                "from",
            )
            .await?;
            Ok(set_union(per_shard))
        })
        .await
    }

    /// Groups mapped to `(entity_type, entity)`, from every Group-axis
    /// shard. Rejects `include_indirect_mappings = true`.
    pub async fn get_entity_to_group_mappings(
        &self,
        entity_type: &str,
        entity: &str,
        include_indirect_mappings: bool,
    ) -> Result<Vec<String>, Error> {
        self.reject_indirect_mappings(include_indirect_mappings)?;
        self.timed("get_entity_to_group_mappings", async {
            let handles = self.resolve(AxisPolicy::GroupOnly, OperationKind::Query).await?;
            let entity_type = entity_type.to_string();
            let entity = entity.to_string();
            let per_shard = fanout::fanout(
                &handles,
                move |handle| {
                    let entity_type = entity_type.clone();
                    let entity = entity.clone();
                    async move { handle.client().get_entity_to_group_mappings(&entity_type, &entity).await }
                },
                "retrieve entity to group mappings",
                "from",
            )
            .await?;
            Ok(set_union(per_shard))
        })
        .await
    }
}
