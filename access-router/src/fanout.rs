//! Concurrent per-shard dispatch.

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::Error;
use crate::shard_client::{ClientHandle, ShardError};

/// Invoke `call` against every handle in `handles` concurrently and
/// collect the results in no particular order.
///
/// On the first shard failure, the error is wrapped as
/// [`Error::ShardCallFailed`] using `context`/`connector` and surfaced
/// immediately; outstanding calls are signalled to cancel and are not
/// awaited before this function returns.
pub async fn fanout<T, F, Fut>(
    handles: &[ClientHandle],
    call: F,
    context: &str,
    connector: &'static str,
) -> Result<Vec<T>, Error>
where
    F: Fn(ClientHandle) -> Fut,
    Fut: Future<Output = Result<T, ShardError>> + Send + 'static,
    T: Send + 'static,
{
    if handles.is_empty() {
        return Ok(Vec::new());
    }

    let cancel = CancellationToken::new();
    let mut tasks = FuturesUnordered::new();

    for handle in handles {
        let label = handle.label().to_string();
        let fut = call(handle.clone());
        let cancel = cancel.clone();
        tasks.push(tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                outcome = fut => Some((label, outcome)),
            }
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    while let Some(joined) = tasks.next().await {
        match joined {
            Ok(Some((_, Ok(value)))) => results.push(value),
            Ok(Some((label, Err(cause)))) => {
                debug!(shard = %label, context, "shard call failed during fan-out");
                cancel.cancel();
                return Err(Error::ShardCallFailed {
                    context: context.to_string(),
                    connector,
                    label,
                    cause,
                });
            }
            Ok(None) => {
                // Lost the race against a sibling's cancellation signal.
            }
            Err(join_error) => {
                warn!(%join_error, "shard task panicked during fan-out");
                cancel.cancel();
                return Err(Error::ShardCallFailed {
                    context: context.to_string(),
                    connector,
                    label: "<unknown>".to_string(),
                    cause: Box::new(join_error),
                });
            }
        }
    }

    Ok(results)
}

/// Like [`fanout`], but short-circuits to `true` as soon as any shard
/// returns `true`. Returns `false` only once every shard has returned
/// `false`.
pub async fn fanout_any<F, Fut>(
    handles: &[ClientHandle],
    call: F,
    context: &str,
    connector: &'static str,
) -> Result<bool, Error>
where
    F: Fn(ClientHandle) -> Fut,
    Fut: Future<Output = Result<bool, ShardError>> + Send + 'static,
{
    if handles.is_empty() {
        return Ok(false);
    }

    let cancel = CancellationToken::new();
    let mut tasks = FuturesUnordered::new();

    for handle in handles {
        let label = handle.label().to_string();
        let fut = call(handle.clone());
        let cancel = cancel.clone();
        tasks.push(tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                outcome = fut => Some((label, outcome)),
            }
        }));
    }

    while let Some(joined) = tasks.next().await {
        match joined {
            Ok(Some((_, Ok(true)))) => {
                cancel.cancel();
                return Ok(true);
            }
            Ok(Some((_, Ok(false)))) => {}
            Ok(Some((label, Err(cause)))) => {
                debug!(shard = %label, context, "shard call failed during fan-out");
                cancel.cancel();
                return Err(Error::ShardCallFailed {
                    context: context.to_string(),
                    connector,
                    label,
                    cause,
                });
            }
            Ok(None) => {}
            Err(join_error) => {
                warn!(%join_error, "shard task panicked during fan-out");
                cancel.cancel();
                return Err(Error::ShardCallFailed {
                    context: context.to_string(),
                    connector,
                    label: "<unknown>".to_string(),
                    cause: Box::new(join_error),
                });
            }
        }
    }

    Ok(false)
}

/// Like [`fanout`], but each handle is called with its own argument --
/// used for `GroupByKey` operations, where every shard must only see the
/// subset of keys the directory assigned to it.
pub async fn fanout_keyed<T, K, F, Fut>(
    items: &[(ClientHandle, K)],
    call: F,
    context: &str,
    connector: &'static str,
) -> Result<Vec<T>, Error>
where
    F: Fn(ClientHandle, K) -> Fut,
    Fut: Future<Output = Result<T, ShardError>> + Send + 'static,
    T: Send + 'static,
    K: Clone,
{
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let cancel = CancellationToken::new();
    let mut tasks = FuturesUnordered::new();

    for (handle, key) in items {
        let label = handle.label().to_string();
        let fut = call(handle.clone(), key.clone());
        let cancel = cancel.clone();
        tasks.push(tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                outcome = fut => Some((label, outcome)),
            }
        }));
    }

    let mut results = Vec::with_capacity(items.len());
    while let Some(joined) = tasks.next().await {
        match joined {
            Ok(Some((_, Ok(value)))) => results.push(value),
            Ok(Some((label, Err(cause)))) => {
                debug!(shard = %label, context, "shard call failed during fan-out");
                cancel.cancel();
                return Err(Error::ShardCallFailed {
                    context: context.to_string(),
                    connector,
                    label,
                    cause,
                });
            }
            Ok(None) => {}
            Err(join_error) => {
                warn!(%join_error, "shard task panicked during fan-out");
                cancel.cancel();
                return Err(Error::ShardCallFailed {
                    context: context.to_string(),
                    connector,
                    label: "<unknown>".to_string(),
                    cause: Box::new(join_error),
                });
            }
        }
    }

    Ok(results)
}

/// Like [`fanout_any`], but each handle is called with its own argument.
pub async fn fanout_any_keyed<K, F, Fut>(
    items: &[(ClientHandle, K)],
    call: F,
    context: &str,
    connector: &'static str,
) -> Result<bool, Error>
where
    F: Fn(ClientHandle, K) -> Fut,
    Fut: Future<Output = Result<bool, ShardError>> + Send + 'static,
    K: Clone,
{
    if items.is_empty() {
        return Ok(false);
    }

    let cancel = CancellationToken::new();
    let mut tasks = FuturesUnordered::new();

    for (handle, key) in items {
        let label = handle.label().to_string();
        let fut = call(handle.clone(), key.clone());
        let cancel = cancel.clone();
        tasks.push(tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                outcome = fut => Some((label, outcome)),
            }
        }));
    }

    while let Some(joined) = tasks.next().await {
        match joined {
            Ok(Some((_, Ok(true)))) => {
                cancel.cancel();
                return Ok(true);
            }
            Ok(Some((_, Ok(false)))) => {}
            Ok(Some((label, Err(cause)))) => {
                debug!(shard = %label, context, "shard call failed during fan-out");
                cancel.cancel();
                return Err(Error::ShardCallFailed {
                    context: context.to_string(),
                    connector,
                    label,
                    cause,
                });
            }
            Ok(None) => {}
            Err(join_error) => {
                warn!(%join_error, "shard task panicked during fan-out");
                cancel.cancel();
                return Err(Error::ShardCallFailed {
                    context: context.to_string(),
                    connector,
                    label: "<unknown>".to_string(),
                    cause: Box::new(join_error),
                });
            }
        }
    }

    Ok(false)
}
