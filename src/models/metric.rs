// Normalized metric sample

/// One flattened sample: a metric name, the container it belongs to, and an
/// integer value. Names carry no namespace prefix; the renderer adds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedMetric {
    pub container: String,
    pub name: String,
    pub value: u64,
}
