use std::fmt;

/// Which partitioning dimension a shard owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Shards that own user-scoped records.
    User,
    /// Shards that own group-scoped records.
    Group,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::User => write!(f, "User"),
            Axis::Group => write!(f, "Group"),
        }
    }
}

/// Whether an operation reads or mutates shard state. Keyed together with
/// [`Axis`] to resolve a shard client list from the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// A read that doesn't change shard state.
    Query,
    /// A mutation (add/remove) that changes shard state.
    Event,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Query => write!(f, "Query"),
            OperationKind::Event => write!(f, "Event"),
        }
    }
}

/// Per-operation axis dispatch policy.
#[derive(Debug, Clone)]
pub enum AxisPolicy {
    /// Dispatch to every User-axis client.
    UserOnly,
    /// Dispatch to every Group-axis client.
    GroupOnly,
    /// Dispatch to every User-axis client and every Group-axis client.
    /// Either axis may legitimately have no shards configured.
    Both,
    /// Dispatch only to the Group shards responsible for the given group
    /// identifiers, each with its own subset of those identifiers.
    GroupByKey,
}
