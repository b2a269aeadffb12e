// Raw stat records as read from a backend, before normalization

use std::collections::BTreeMap;

use bollard::models::ContainerStatsResponse;

/// One poll's worth of raw accounting data for a single container.
///
/// The variant matches the backend the container's source was built for;
/// both flatten into the same metric namespace.
#[derive(Debug, Clone)]
pub enum RawStatRecord {
    /// Line-split contents of the per-container cgroup accounting files
    /// plus the parsed `/proc/<pid>/net/dev` table.
    Cgroup(CgroupRecord),
    /// Latest decoded stats API frame, or `None` when the stream has not
    /// produced one yet.
    Api(Option<Box<ContainerStatsResponse>>),
}

/// File name to line list for one accounting category directory.
pub type CategoryFiles = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Default)]
pub struct CgroupRecord {
    pub cpu: CategoryFiles,
    pub cpuacct: CategoryFiles,
    pub memory: CategoryFiles,
    pub blkio: CategoryFiles,
    pub net: NetDevTable,
}

impl CgroupRecord {
    /// Accounting categories in fixed order, excluding the network table.
    pub fn categories(&self) -> [(&'static str, &CategoryFiles); 4] {
        [
            ("cpu", &self.cpu),
            ("cpuacct", &self.cpuacct),
            ("memory", &self.memory),
            ("blkio", &self.blkio),
        ]
    }
}

/// Parsed `/proc/<pid>/net/dev` contents.
///
/// The kernel formats this as `|`-separated column groups (`Receive`,
/// `Transmit`) over a shared interface column; groups keep the header's
/// order, interfaces keep row order.
#[derive(Debug, Clone, Default)]
pub struct NetDevTable {
    pub groups: Vec<NetDevGroup>,
}

#[derive(Debug, Clone)]
pub struct NetDevGroup {
    pub label: String,
    pub interfaces: Vec<NetDevInterface>,
}

/// Field names paired with their raw column values for one interface row.
#[derive(Debug, Clone)]
pub struct NetDevInterface {
    pub name: String,
    pub fields: Vec<(String, String)>,
}
