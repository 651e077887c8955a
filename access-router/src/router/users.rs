use crate::axis::{AxisPolicy, OperationKind};
use crate::combinators::set_union;
use crate::directory::ShardDirectory;
use crate::error::Error;
use crate::fanout;

use super::OperationRouter;

impl<D: ShardDirectory> OperationRouter<D> {
    /// Every user known to any User-axis shard.
    pub async fn get_users(&self) -> Result<Vec<String>, Error> {
        self.timed("get_users", async {
            let handles = self.resolve(AxisPolicy::UserOnly, OperationKind::Query).await?;
            let per_shard = fanout::fanout(
                &handles,
                |handle| async move { handle.client().get_users().await },
                "retrieve users",
                "from",
            )
            .await?;
            Ok(set_union(per_shard))
        })
        .await
    }
}
