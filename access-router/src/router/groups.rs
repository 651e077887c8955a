use crate::axis::{AxisPolicy, OperationKind};
use crate::combinators::set_union;
use crate::directory::ShardDirectory;
use crate::error::Error;
use crate::fanout;

use super::OperationRouter;

impl<D: ShardDirectory> OperationRouter<D> {
    /// Every group known to any User-axis or Group-axis shard.
    pub async fn get_groups(&self) -> Result<Vec<String>, Error> {
        self.timed("get_groups", async {
            let handles = self.resolve(AxisPolicy::Both, OperationKind::Query).await?;
            let per_shard = fanout::fanout(
                &handles,
                |handle| async move { handle.client().get_groups().await },
                "retrieve groups",
                "from",
            )
            .await?;
            Ok(set_union(per_shard))
        })
        .await
    }

    /// True iff `group` exists on any contacted shard.
    pub async fn contains_group(&self, group: &str) -> Result<bool, Error> {
        self.timed("contains_group", async {
            let handles = self.resolve(AxisPolicy::Both, OperationKind::Query).await?;
            let context = format!("check for group '{group}'");
            let group = group.to_string();
            fanout::fanout_any(
                &handles,
                move |handle| {
                    let group = group.clone();
                    async move { handle.client().contains_group(&group).await }
                },
                &context,
                "from",
            )
            .await
        })
        .await
    }

    /// Remove `group` from every shard that has it. Not transactional:
    /// if a shard fails after earlier shards already removed the group,
    /// the system is left partially mutated and this surfaces the first
    /// failure.
    pub async fn remove_group(&self, group: &str) -> Result<(), Error> {
        self.timed("remove_group", async {
            let handles = self.resolve(AxisPolicy::Both, OperationKind::Event).await?;
            let context = format!("remove group '{group}'");
            let group = group.to_string();
            fanout::fanout(
                &handles,
                move |handle| {
                    let group = group.clone();
                    async move { handle.client().remove_group(&group).await }
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
