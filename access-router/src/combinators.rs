//! Merge per-shard outcomes into a single aggregated result. Combinators
//! are synchronous and CPU-bound; they never suspend.

use std::collections::HashSet;
use std::hash::Hash;

/// Combine per-shard lists into a duplicate-free aggregate. An element is
/// in the result iff at least one shard returned it; order is
/// unspecified. Pair-valued results dedup on the full pair.
pub fn set_union<T>(per_shard: Vec<Vec<T>>) -> Vec<T>
where
    T: Eq + Hash,
{
    let mut set = HashSet::new();
    for shard_result in per_shard {
        set.extend(shard_result);
    }
    set.into_iter().collect()
}

/// True iff at least one input is true.
pub fn or_any(per_shard: impl IntoIterator<Item = bool>) -> bool {
    per_shard.into_iter().any(|value| value)
}
