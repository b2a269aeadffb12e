// Text exposition rendering

use crate::models::NormalizedMetric;

/// Prefix every exported metric name carries.
pub const NAMESPACE: &str = "docker_stats";

const HELP_LINE: &str = "# HELP See documentation for the docker stats API as each metric directly correlates to a stat value returned from the API";

/// Renders samples into the text exposition body.
///
/// One line per sample plus the single help header, all sorted together
/// lexicographically, joined by newlines with exactly one trailing newline.
/// Rendering is pure, so equal input always produces identical bytes.
pub fn render(metrics: &[NormalizedMetric]) -> String {
    let mut lines = Vec::with_capacity(metrics.len() + 1);
    lines.push(HELP_LINE.to_string());
    for metric in metrics {
        lines.push(format!(
            "{NAMESPACE}_{}{{container=\"{}\"}} {}",
            metric.name, metric.container, metric.value
        ));
    }
    lines.sort();
    let mut body = lines.join("\n");
    body.push('\n');
    body
}
