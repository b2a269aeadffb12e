// Flattens raw stat records into the shared metric namespace

use bollard::models::ContainerStatsResponse;

use crate::models::{CgroupRecord, ContainerHandle, NetDevTable, NormalizedMetric, RawStatRecord};

/// Flattens one container's raw record into named integer samples.
///
/// Every record yields the fixed trio first: `last_seen` (always 1 while
/// tracked), `is_up`, and `healthy`. The rest of the names depend on the
/// backend the record came from; the two backends intentionally do not
/// produce the same name set.
pub fn normalize(handle: &ContainerHandle, record: &RawStatRecord) -> Vec<NormalizedMetric> {
    let mut metrics: Vec<(String, u64)> = vec![
        ("last_seen".to_string(), 1),
        ("is_up".to_string(), handle.is_up() as u64),
        ("healthy".to_string(), handle.healthy() as u64),
    ];
    match record {
        RawStatRecord::Cgroup(record) => cgroup_metrics(record, &mut metrics),
        RawStatRecord::Api(Some(stats)) => api_metrics(stats, &mut metrics),
        RawStatRecord::Api(None) => {}
    }
    metrics
        .into_iter()
        .map(|(name, value)| NormalizedMetric {
            container: handle.name.clone(),
            name,
            value,
        })
        .collect()
}

/// Lowercases a raw token and maps `.` and `-` to `_` so it forms a legal
/// metric-name segment.
fn sanitize(token: &str) -> String {
    token.to_ascii_lowercase().replace(['.', '-'], "_")
}

/// Non-numeric and out-of-range values become 0 rather than failing the record.
fn parse_value(raw: &str) -> u64 {
    raw.parse().unwrap_or(0)
}

/// The cgroup hierarchy-id column: digits and `:` only, as in `8:0` or `252:1`.
fn is_hierarchy_id(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit() || c == ':')
}

fn cgroup_metrics(record: &CgroupRecord, out: &mut Vec<(String, u64)>) {
    for (category, files) in record.categories() {
        for (file, lines) in files {
            file_metrics(category, file, lines, out);
        }
    }
    net_metrics(&record.net, out);
}

/// Classifies each accounting-file line by token shape.
///
/// `NAME VALUE` and `HIERARCHY NAME VALUE` lines name their own metric; a
/// line that is a single bare integer is named after the file itself, with
/// a positional suffix once a file holds more than one. Every other shape
/// is dropped.
fn file_metrics(category: &str, file: &str, lines: &[String], out: &mut Vec<(String, u64)>) {
    let prefix = format!("{}_{}", sanitize(category), sanitize(file));
    let mut bare_values = Vec::new();
    for line in lines {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            [value] => {
                if let Ok(parsed) = value.parse::<u64>() {
                    bare_values.push(parsed);
                }
            }
            [name, value] => {
                out.push((format!("{}_{}", prefix, sanitize(name)), parse_value(value)));
            }
            [id, name, value] if is_hierarchy_id(id) => {
                out.push((format!("{}_{}", prefix, sanitize(name)), parse_value(value)));
            }
            _ => {}
        }
    }
    match bare_values.as_slice() {
        [] => {}
        [value] => out.push((prefix, *value)),
        many => {
            for (index, value) in many.iter().enumerate() {
                out.push((format!("{prefix}_{index}"), *value));
            }
        }
    }
}

fn net_metrics(table: &NetDevTable, out: &mut Vec<(String, u64)>) {
    for group in &table.groups {
        for interface in &group.interfaces {
            for (field, value) in &interface.fields {
                let name = format!(
                    "net_{}_{}_{}",
                    sanitize(&group.label),
                    sanitize(&interface.name),
                    sanitize(field)
                );
                out.push((name, parse_value(value)));
            }
        }
    }
}

/// Fixed projection of a stats API frame.
///
/// Scalar fields flatten under their section's name; absent scalars read as
/// 0. The per-cpu usage list has no scalar form and reads as 0 outright.
fn api_metrics(stats: &ContainerStatsResponse, out: &mut Vec<(String, u64)>) {
    let cpu = stats.cpu_stats.as_ref();
    out.push((
        "system_cpu_usage".to_string(),
        cpu.and_then(|c| c.system_cpu_usage).unwrap_or(0),
    ));
    if let Some(usage) = cpu.and_then(|c| c.cpu_usage.as_ref()) {
        out.push(("cpu_usage_total_usage".to_string(), usage.total_usage.unwrap_or(0)));
        out.push((
            "cpu_usage_usage_in_kernelmode".to_string(),
            usage.usage_in_kernelmode.unwrap_or(0),
        ));
        out.push((
            "cpu_usage_usage_in_usermode".to_string(),
            usage.usage_in_usermode.unwrap_or(0),
        ));
        out.push(("cpu_usage_percpu_usage".to_string(), 0));
    }

    if let Some(memory) = stats.memory_stats.as_ref() {
        out.push(("memory_stats_usage".to_string(), memory.usage.unwrap_or(0)));
        out.push(("memory_stats_max_usage".to_string(), memory.max_usage.unwrap_or(0)));
        out.push(("memory_stats_limit".to_string(), memory.limit.unwrap_or(0)));
        out.push(("memory_stats_failcnt".to_string(), memory.failcnt.unwrap_or(0)));
        if let Some(detail) = memory.stats.as_ref() {
            for (key, value) in detail {
                out.push((format!("memory_stats_{}", sanitize(key)), *value));
            }
        }
    }

    let (read, write) = io_service_bytes(stats);
    out.push(("blkio_stats_io_service_bytes_read".to_string(), read));
    out.push(("blkio_stats_io_service_bytes_write".to_string(), write));

    if let Some(networks) = stats.networks.as_ref() {
        for (interface, net) in networks {
            let prefix = format!("networks_{}", sanitize(interface));
            out.push((format!("{prefix}_rx_bytes"), net.rx_bytes.unwrap_or(0)));
            out.push((format!("{prefix}_rx_packets"), net.rx_packets.unwrap_or(0)));
            out.push((format!("{prefix}_rx_errors"), net.rx_errors.unwrap_or(0)));
            out.push((format!("{prefix}_rx_dropped"), net.rx_dropped.unwrap_or(0)));
            out.push((format!("{prefix}_tx_bytes"), net.tx_bytes.unwrap_or(0)));
            out.push((format!("{prefix}_tx_packets"), net.tx_packets.unwrap_or(0)));
            out.push((format!("{prefix}_tx_errors"), net.tx_errors.unwrap_or(0)));
            out.push((format!("{prefix}_tx_dropped"), net.tx_dropped.unwrap_or(0)));
        }
    }
}

/// Byte totals from the recursive service log, summed per operation label
/// across devices. Labels compare case-insensitively; neither label being
/// present reads as 0.
fn io_service_bytes(stats: &ContainerStatsResponse) -> (u64, u64) {
    let Some(entries) = stats
        .blkio_stats
        .as_ref()
        .and_then(|b| b.io_service_bytes_recursive.as_ref())
    else {
        return (0, 0);
    };
    let mut read = 0u64;
    let mut write = 0u64;
    for entry in entries {
        let Some(op) = entry.op.as_deref() else {
            continue;
        };
        if op.eq_ignore_ascii_case("read") {
            read += entry.value.unwrap_or(0);
        } else if op.eq_ignore_ascii_case("write") {
            write += entry.value.unwrap_or(0);
        }
    }
    (read, write)
}
