use crate::axis::{AxisPolicy, OperationKind};
use crate::combinators::set_union;
use crate::directory::ShardDirectory;
use crate::error::Error;
use crate::fanout;

use super::OperationRouter;

impl<D: ShardDirectory> OperationRouter<D> {
    /// Every entity type known to any User-axis or Group-axis shard.
    pub async fn get_entity_types(&self) -> Result<Vec<String>, Error> {
        self.timed("get_entity_types", async {
            let handles = self.resolve(AxisPolicy::Both, OperationKind::Query).await?;
            let per_shard = fanout::fanout(
                &handles,
                |handle| async move { handle.client().get_entity_types().await },
                "retrieve entity types",
                "from",
            )
            .await?;
            Ok(set_union(per_shard))
        })
        .await
    }

    /// True iff `entity_type` exists on any contacted shard.
    pub async fn contains_entity_type(&self, entity_type: &str) -> Result<bool, Error> {
        self.timed("contains_entity_type", async {
            let handles = self.resolve(AxisPolicy::Both, OperationKind::Query).await?;
            let context = format!("check for entity type '{entity_type}'");
            let entity_type = entity_type.to_string();
            fanout::fanout_any(
                &handles,
                move |handle| {
                    let entity_type = entity_type.clone();
                    async move { handle.client().contains_entity_type(&entity_type).await }
                },
                &context,
                "from",
            )
            .await
        })
        .await
    }

    /// Remove `entity_type` from every shard that has it.
    pub async fn remove_entity_type(&self, entity_type: &str) -> Result<(), Error> {
        self.timed("remove_entity_type", async {
            let handles = self.resolve(AxisPolicy::Both, OperationKind::Event).await?;
            let context = format!("remove entity type '{entity_type}'");
            let entity_type = entity_type.to_string();
            fanout::fanout(
                &handles,
                move |handle| {
                    let entity_type = entity_type.clone();
                    async move { handle.client().remove_entity_type(&entity_type).await }
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
