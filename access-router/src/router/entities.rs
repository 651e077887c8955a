use crate::axis::{AxisPolicy, OperationKind};
use crate::combinators::set_union;
use crate::directory::ShardDirectory;
use crate::error::Error;
use crate::fanout;

use super::OperationRouter;

impl<D: ShardDirectory> OperationRouter<D> {
    /// Every entity of `entity_type` known to any User-axis or Group-axis
    /// shard.
    pub async fn get_entities(&self, entity_type: &str) -> Result<Vec<String>, Error> {
        self.timed("get_entities", async {
            let handles = self.resolve(AxisPolicy::Both, OperationKind::Query).await?;
            let context = format!("retrieve entities of type '{entity_type}'");
            let entity_type = entity_type.to_string();
            let per_shard = fanout::fanout(
                &handles,
                move |handle| {
                    let entity_type = entity_type.clone();
                    async move { handle.client().get_entities(&entity_type).await }
                },
                &context,
                "from",
            )
            .await?;
            Ok(set_union(per_shard))
        })
        .await
    }

    /// True iff `entity` (of `entity_type`) exists on any contacted
    /// shard.
    pub async fn contains_entity(&self, entity_type: &str, entity: &str) -> Result<bool, Error> {
        self.timed("contains_entity", async {
            let handles = self.resolve(AxisPolicy::Both, OperationKind::Query).await?;
            let context = format!("check for entity '{entity}' with type '{entity_type}'");
            let entity_type = entity_type.to_string();
            let entity = entity.to_string();
            fanout::fanout_any(
                &handles,
                move |handle| {
                    let entity_type = entity_type.clone();
                    let entity = entity.clone();
                    async move { handle.client().contains_entity(&entity_type, &entity).await }
                },
                &context,
                "from",
            )
            .await
        })
        .await
    }

    /// Remove `entity` (of `entity_type`) from every shard that has it.
    pub async fn remove_entity(&self, entity_type: &str, entity: &str) -> Result<(), Error> {
        self.timed("remove_entity", async {
            let handles = self.resolve(AxisPolicy::Both, OperationKind::Event).await?;
            let context = format!("remove entity '{entity}' with type '{entity_type}'");
            let entity_type = entity_type.to_string();
            let entity = entity.to_string();
            fanout::fanout(
                &handles,
                move |handle| {
                    let entity_type = entity_type.clone();
                    let entity = entity.clone();
                    async move { handle.client().remove_entity(&entity_type, &entity).await }
                },
                &context,
                "from",
            )
            .await?;
            Ok(())
        })
        .await
    }
}
