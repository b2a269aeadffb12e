// Domain models for container handles, raw stat records, and metrics

mod container;
mod metric;
mod record;

pub use container::{ContainerHandle, HealthState};
pub use metric::NormalizedMetric;
pub use record::{
    CategoryFiles, CgroupRecord, NetDevGroup, NetDevInterface, NetDevTable, RawStatRecord,
};
