use crate::stats::sched::{self, SchedStats, ADDITIVE_STATS};
use crate::utils::error::{FakeProcessError, Result};
use std::collections::{BTreeMap, HashMap};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use sysinfo::System;

pub const DEFAULT_PREFIX: &str = "fake-process";
pub const DEFAULT_PROC_ROOT: &str = "/proc";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedProcess {
    pub pid: u32,
    pub label: String,
}

/// 找出名稱以 `prefix` 開頭的行程
///
/// 同名的行程會標記成 `name[pid]`，避免 CSV 裡的資料互相覆蓋。
pub fn discover(prefix: &str) -> Vec<TrackedProcess> {
    let system = System::new_all();

    let found: Vec<(u32, String)> = system
        .processes()
        .iter()
        .filter_map(|(pid, process)| {
            let name = process.name().to_string_lossy();
            name.starts_with(prefix)
                .then(|| (pid.as_u32(), name.into_owned()))
        })
        .collect();

    label_processes(found)
}

pub(crate) fn label_processes(mut found: Vec<(u32, String)>) -> Vec<TrackedProcess> {
    found.sort();

    let mut name_counts: HashMap<&str, usize> = HashMap::new();
    for (_, name) in &found {
        *name_counts.entry(name.as_str()).or_insert(0) += 1;
    }

    found
        .iter()
        .map(|(pid, name)| {
            let label = if name_counts[name.as_str()] > 1 {
                format!("{}[{}]", name, pid)
            } else {
                name.clone()
            };
            TrackedProcess { pid: *pid, label }
        })
        .collect()
}

/// 讀取 `<proc_root>/<pid>/task/<tid>/sched` 並依行程加總
pub struct StatsCollector {
    proc_root: PathBuf,
    processes: Vec<TrackedProcess>,
}

impl StatsCollector {
    pub fn new<P: Into<PathBuf>>(proc_root: P, processes: Vec<TrackedProcess>) -> Result<Self> {
        if processes.is_empty() {
            return Err(FakeProcessError::StatsError {
                message: "no matching processes to observe".to_string(),
            });
        }
        Ok(Self {
            proc_root: proc_root.into(),
            processes,
        })
    }

    /// 某個時間點的快照，已結束的行程不會出現在結果中
    pub fn take_sample(&self) -> Result<BTreeMap<String, SchedStats>> {
        let mut sample = BTreeMap::new();
        for process in &self.processes {
            match self.sample_process(process.pid)? {
                Some(stats) => {
                    sample.insert(process.label.clone(), stats);
                }
                None => tracing::debug!("Process {} ({}) is gone", process.label, process.pid),
            }
        }
        Ok(sample)
    }

    fn sample_process(&self, pid: u32) -> Result<Option<SchedStats>> {
        let task_dir = self.proc_root.join(pid.to_string()).join("task");
        let entries = match std::fs::read_dir(&task_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut total = SchedStats::new();
        for entry in entries {
            let sched_path = entry?.path().join("sched");
            // 列出之後才結束的執行緒直接略過
            if let Some(content) = read_if_present(&sched_path)? {
                sched::accumulate(&mut total, &sched::parse_sched(&content));
            }
        }
        Ok(Some(total))
    }
}

fn read_if_present(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// `after - before`，`before` 中沒有的值視為 0
pub fn diff(
    before: &BTreeMap<String, SchedStats>,
    after: &BTreeMap<String, SchedStats>,
) -> BTreeMap<String, SchedStats> {
    let empty = SchedStats::new();
    after
        .iter()
        .map(|(label, stats)| {
            let earlier = before.get(label).unwrap_or(&empty);
            let delta = stats
                .iter()
                .map(|(stat, value)| {
                    (stat.clone(), value - earlier.get(stat).copied().unwrap_or(0.0))
                })
                .collect();
            (label.clone(), delta)
        })
        .collect()
}

/// 把每個區間的差值寫成 CSV
pub struct CsvStatsWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvStatsWriter<W> {
    pub fn new(inner: W) -> Result<Self> {
        let mut writer = csv::Writer::from_writer(inner);
        let header: Vec<&str> = ADDITIVE_STATS
            .iter()
            .copied()
            .chain(["process", "timestamp"])
            .collect();
        writer.write_record(&header)?;
        writer.flush()?;
        Ok(Self { writer })
    }

    pub fn write_deltas(&mut self, timestamp: f64, deltas: &BTreeMap<String, SchedStats>) -> Result<()> {
        for (label, stats) in deltas {
            let mut record: Vec<String> = ADDITIVE_STATS
                .iter()
                .map(|stat| stats.get(*stat).map(|v| v.to_string()).unwrap_or_default())
                .collect();
            record.push(label.clone());
            record.push(timestamp.to_string());
            self.writer.write_record(&record)?;
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| FakeProcessError::IoError(e.into_error()))
    }
}

fn unix_timestamp() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// 取樣、睡 `interval`、再取樣並寫出差值；`samples` 為 `None` 時永遠執行
pub fn run<W: Write>(
    collector: &StatsCollector,
    writer: &mut CsvStatsWriter<W>,
    interval: Duration,
    samples: Option<u64>,
) -> Result<()> {
    let mut written = 0u64;
    while samples.map_or(true, |limit| written < limit) {
        let before = collector.take_sample()?;
        std::thread::sleep(interval);
        let after = collector.take_sample()?;

        let deltas = diff(&before, &after);
        writer.write_deltas(unix_timestamp(), &deltas)?;
        tracing::debug!("Wrote {} rows for interval {}", deltas.len(), written + 1);

        written += 1;
    }
    Ok(())
}
