use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::Error;

/// Configuration for a single User-axis shard.
///
/// User shards don't own a subset of keys; the router always fans out to
/// every configured User shard for a User-axis operation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct UserShardConfig {
    /// Human-readable label carried through errors and logs, e.g.
    /// `"UserShardDescription2"`.
    pub label: String,

    /// Opaque connection endpoint for this shard (host:port, DSN, etc).
    /// The router never parses this; it's handed to whatever builds the
    /// live `ShardClient` for this shard.
    pub endpoint: String,
}

/// Configuration for a single Group-axis shard.
///
/// Unlike User shards, Group shards own an explicit, disjoint subset of
/// group identifiers. Assignment is static configuration here, not a
/// computed hash partition -- the production hashing/partitioning scheme
/// a deployment uses is outside this crate.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct GroupShardConfig {
    /// Human-readable label carried through errors and logs.
    pub label: String,

    /// Opaque connection endpoint for this shard.
    pub endpoint: String,

    /// Group identifiers this shard is responsible for.
    #[serde(default)]
    pub owned_groups: Vec<String>,
}

/// Top-level shard-directory configuration: which shards exist on each
/// axis, and (for Group shards) which group identifiers each one owns.
///
/// Either axis may be empty or entirely absent from the file -- a
/// deployment with only User shards, or only Group shards, is legitimate
/// (see the router's `Both`-policy absence tolerance).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct DirectoryConfig {
    /// User-axis shards.
    #[serde(default)]
    pub user_shards: Vec<UserShardConfig>,

    /// Group-axis shards.
    #[serde(default)]
    pub group_shards: Vec<GroupShardConfig>,
}

impl DirectoryConfig {
    /// Validate label uniqueness per axis and that no group identifier is
    /// claimed by more than one Group shard.
    pub fn validate(&self) -> Result<(), Error> {
        let mut user_labels = HashSet::new();
        for shard in &self.user_shards {
            if !user_labels.insert(shard.label.as_str()) {
                return Err(Error::DuplicateShardLabel(shard.label.clone()));
            }
        }

        let mut group_labels = HashSet::new();
        let mut owned = HashSet::new();
        for shard in &self.group_shards {
            if !group_labels.insert(shard.label.as_str()) {
                return Err(Error::DuplicateShardLabel(shard.label.clone()));
            }
            for group in &shard.owned_groups {
                if !owned.insert(group.as_str()) {
                    return Err(Error::DuplicateGroupOwner(group.clone()));
                }
            }
        }

        Ok(())
    }
}
