//! Configuration errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("couldn't read configuration file \"{path}\": {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("couldn't parse configuration file \"{path}\": {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("shard label \"{0}\" is configured more than once on the same axis")]
    DuplicateShardLabel(String),

    #[error("group \"{0}\" is owned by more than one group shard")]
    DuplicateGroupOwner(String),
}
