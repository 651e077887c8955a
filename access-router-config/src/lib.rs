//! Shard-directory configuration for the access-manager operation router.
//!
//! This crate only describes *topology*: which shards exist on the User
//! and Group axes, their labels, and (for Group shards) which group
//! identifiers each one owns. It does not implement a hashing or
//! partitioning scheme, build network clients, or know anything about the
//! router's fan-out/aggregation logic -- see the `access-router` crate for
//! that.

pub mod error;
pub mod shard;

pub use error::Error;
pub use shard::{DirectoryConfig, GroupShardConfig, UserShardConfig};

use std::path::Path;

/// Load and validate a [`DirectoryConfig`] from a TOML file.
pub fn load(path: impl AsRef<Path>) -> Result<DirectoryConfig, Error> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config: DirectoryConfig = toml::from_str(&contents).map_err(|source| Error::Toml {
        path: path.to_path_buf(),
        source,
    })?;

    config.validate()?;
    tracing::info!(
        user_shards = config.user_shards.len(),
        group_shards = config.group_shards.len(),
        "loaded shard directory configuration"
    );

    Ok(config)
}
