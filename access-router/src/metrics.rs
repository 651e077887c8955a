//! Metrics sink consumed by the router. Purely observational -- nothing
//! here affects routing semantics.

use async_trait::async_trait;

/// Opaque handle returned by [`MetricsSink::begin`] and threaded back
/// through [`MetricsSink::end`] or [`MetricsSink::cancel_begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricId(pub u64);

/// Begin/end/increment signals the router emits around each operation.
/// Implementations must be safe to call concurrently.
#[async_trait]
pub trait MetricsSink: Send + Sync {
    /// Record that a timed operation has started. Returns an id to close
    /// it out with.
    async fn begin(&self, metric_name: &str) -> MetricId;

    /// Record that a timed operation finished successfully.
    async fn end(&self, id: MetricId, metric_name: &str);

    /// Record a single occurrence of a counter metric.
    fn increment(&self, metric_name: &str);

    /// Record that a timed operation was abandoned (it failed or was
    /// cancelled) rather than completed.
    async fn cancel_begin(&self, id: MetricId, metric_name: &str);
}

/// A [`MetricsSink`] that discards every signal. Used when a host hasn't
/// wired up a real one.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetricsSink;

#[async_trait]
impl MetricsSink for NoopMetricsSink {
    async fn begin(&self, _metric_name: &str) -> MetricId {
        MetricId(0)
    }

    async fn end(&self, _id: MetricId, _metric_name: &str) {}

    fn increment(&self, _metric_name: &str) {}

    async fn cancel_begin(&self, _id: MetricId, _metric_name: &str) {}
}
