// Pseudo-file backend: cgroup accounting files plus /proc net tables

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::models::{
    CategoryFiles, CgroupRecord, ContainerHandle, NetDevGroup, NetDevInterface, NetDevTable,
    RawStatRecord,
};

/// Reads one container's accounting data straight from the filesystem.
///
/// Accounting files live under `<cgroup_root>/<category>/docker/<id>/`; the
/// network table comes from `<proc_root>/<pid>/net/dev`. Missing directories
/// and unreadable files yield empty sections, never errors.
#[derive(Clone)]
pub struct PseudoFileSource {
    cgroup_root: PathBuf,
    proc_root: PathBuf,
    container_id: String,
    pid: i64,
}

impl PseudoFileSource {
    pub fn new(cgroup_root: PathBuf, proc_root: PathBuf, handle: &ContainerHandle) -> Self {
        Self {
            cgroup_root,
            proc_root,
            container_id: handle.id.clone(),
            pid: handle.pid,
        }
    }

    pub async fn read(&self) -> RawStatRecord {
        let source = self.clone();
        match tokio::task::spawn_blocking(move || source.read_blocking()).await {
            Ok(record) => RawStatRecord::Cgroup(record),
            Err(e) => {
                tracing::warn!(error = %e, "pseudo-file read task failed");
                RawStatRecord::Cgroup(CgroupRecord::default())
            }
        }
    }

    fn read_blocking(&self) -> CgroupRecord {
        let net_content = fs::read_to_string(self.net_dev_path()).unwrap_or_default();
        CgroupRecord {
            cpu: read_category_dir(&self.category_dir("cpu")),
            cpuacct: read_category_dir(&self.category_dir("cpuacct")),
            memory: read_category_dir(&self.category_dir("memory")),
            blkio: read_category_dir(&self.category_dir("blkio")),
            net: parse_net_dev(&net_content),
        }
    }

    fn category_dir(&self, category: &str) -> PathBuf {
        self.cgroup_root
            .join(category)
            .join("docker")
            .join(&self.container_id)
    }

    fn net_dev_path(&self) -> PathBuf {
        self.proc_root
            .join(self.pid.to_string())
            .join("net")
            .join("dev")
    }
}

/// Reads every regular file in a category directory into per-file line lists.
fn read_category_dir(dir: &Path) -> CategoryFiles {
    let mut files = CategoryFiles::new();
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return files,
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        match fs::read_to_string(&path) {
            Ok(content) => {
                files.insert(name.to_string(), content.lines().map(str::to_string).collect());
            }
            Err(e) => {
                // Some accounting files refuse reads (write-only knobs).
                debug!(file = %path.display(), error = %e, "skipping unreadable accounting file");
            }
        }
    }
    files
}

/// Parses the kernel's `/proc/<pid>/net/dev` layout.
///
/// Row 0 names the column groups (`Receive`, `Transmit`) separated by `|`,
/// row 1 lists each group's field names, and every later row is one
/// interface: its name before a `:`, then the values of all groups in
/// order. Field names and values pair up positionally per group; rows
/// shorter than the header simply yield fewer pairs. Anything without the
/// minimum two header rows parses to an empty table.
pub(crate) fn parse_net_dev(content: &str) -> NetDevTable {
    let lines: Vec<&str> = content.lines().collect();
    if lines.len() < 3 {
        return NetDevTable::default();
    }
    let labels: Vec<String> = lines[0].split('|').map(|l| l.replace(' ', "")).collect();
    let field_row: Vec<&str> = lines[1].split('|').collect();

    let mut groups = Vec::new();
    let mut offset = 0usize;
    // Skip index 0: it labels the interface column, not a field group.
    for (i, label) in labels.iter().enumerate().skip(1) {
        let Some(fields) = field_row.get(i).map(|f| f.split_whitespace().collect::<Vec<_>>())
        else {
            continue;
        };
        let mut interfaces = Vec::new();
        for row in &lines[2..] {
            let Some((iface, data)) = row.trim().split_once(':') else {
                continue;
            };
            let values: Vec<&str> = data.split_whitespace().collect();
            let fields_for_row = fields
                .iter()
                .zip(values.iter().skip(offset))
                .map(|(field, value)| (field.to_string(), value.to_string()))
                .collect();
            interfaces.push(NetDevInterface {
                name: iface.trim().to_string(),
                fields: fields_for_row,
            });
        }
        if !label.is_empty() {
            groups.push(NetDevGroup {
                label: label.clone(),
                interfaces,
            });
        }
        offset += fields.len();
    }
    NetDevTable { groups }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const NET_DEV: &str = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo:  183201    1824    0    0    0     0          0         0   183201    1824    0    0    0     0       0          0
  eth0: 9462280   41213    0    0    0     0          0         0  2958203   24424    0    0    0     0       0          0
";

    #[test]
    fn parses_standard_net_dev_layout() {
        let table = parse_net_dev(NET_DEV);
        assert_eq!(table.groups.len(), 2);
        assert_eq!(table.groups[0].label, "Receive");
        assert_eq!(table.groups[1].label, "Transmit");

        let receive = &table.groups[0];
        assert_eq!(receive.interfaces.len(), 2);
        assert_eq!(receive.interfaces[1].name, "eth0");
        assert_eq!(receive.interfaces[1].fields[0], ("bytes".to_string(), "9462280".to_string()));
        assert_eq!(receive.interfaces[1].fields[1], ("packets".to_string(), "41213".to_string()));

        // Transmit values come from the second half of each row.
        let transmit = &table.groups[1];
        assert_eq!(transmit.interfaces[1].fields[0], ("bytes".to_string(), "2958203".to_string()));
        assert_eq!(transmit.interfaces[1].fields[1], ("packets".to_string(), "24424".to_string()));
    }

    #[test]
    fn short_rows_pair_only_available_values() {
        let content = "\
Inter-|   Receive        |  Transmit
 face |bytes packets errs|bytes packets errs
  eth0: 100 200
";
        let table = parse_net_dev(content);
        assert_eq!(table.groups[0].interfaces[0].fields.len(), 2);
        assert!(table.groups[1].interfaces[0].fields.is_empty());
    }

    #[test]
    fn truncated_input_yields_empty_table() {
        assert!(parse_net_dev("").groups.is_empty());
        assert!(parse_net_dev("Inter-| Receive\n face |bytes\n").groups.is_empty());
    }

    #[test]
    fn rows_without_interface_separator_are_skipped() {
        let content = "\
Inter-| Receive| Transmit
 face |bytes   |bytes
garbage row
  eth0: 7 9
";
        let table = parse_net_dev(content);
        assert_eq!(table.groups[0].interfaces.len(), 1);
        assert_eq!(table.groups[0].interfaces[0].name, "eth0");
    }

    #[test]
    fn reads_category_files_and_skips_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("memory.stat"), "cache 1024\nrss 2048\n").unwrap();
        fs::write(dir.path().join("memory.usage_in_bytes"), "3072\n").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let files = read_category_dir(dir.path());
        assert_eq!(files.len(), 2);
        assert_eq!(
            files.get("memory.stat").unwrap(),
            &vec!["cache 1024".to_string(), "rss 2048".to_string()]
        );
        assert_eq!(files.get("memory.usage_in_bytes").unwrap(), &vec!["3072".to_string()]);
    }

    #[test]
    fn missing_category_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let files = read_category_dir(&dir.path().join("does-not-exist"));
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn read_assembles_record_from_layout() {
        let root = tempfile::tempdir().unwrap();
        let cgroup_root = root.path().join("cgroup");
        let proc_root = root.path().join("proc");
        let cpu_dir = cgroup_root.join("cpu").join("docker").join("abc123");
        fs::create_dir_all(&cpu_dir).unwrap();
        fs::write(cpu_dir.join("cpu.shares"), "1024\n").unwrap();
        let net_dir = proc_root.join("77").join("net");
        fs::create_dir_all(&net_dir).unwrap();
        fs::write(net_dir.join("dev"), NET_DEV).unwrap();

        let handle = ContainerHandle {
            id: "abc123".to_string(),
            name: "web".to_string(),
            pid: 77,
            running: true,
            restarting: false,
            health: None,
        };
        let source = PseudoFileSource::new(cgroup_root, proc_root, &handle);
        let RawStatRecord::Cgroup(record) = source.read().await else {
            panic!("pseudo-file source must produce cgroup records");
        };
        assert_eq!(record.cpu.get("cpu.shares").unwrap(), &vec!["1024".to_string()]);
        assert!(record.cpuacct.is_empty());
        assert_eq!(record.net.groups.len(), 2);
    }
}
