use std::collections::BTreeMap;

/// `/proc/<pid>/sched` 中單調遞增的計數器
pub const ADDITIVE_STATS: [&str; 9] = [
    "se.vruntime",
    "se.sum_exec_runtime",
    "se.nr_migrations",
    "nr_switches",
    "nr_voluntary_switches",
    "nr_involuntary_switches",
    "se.avg.load_sum",
    "se.avg.util_sum",
    "numa_pages_migrated",
];

const HEADER_LINES: usize = 3;
const LAST_STAT: &str = "total_numa_faults";

/// 計數器名稱 -> 數值
pub type SchedStats = BTreeMap<String, f64>;

pub fn is_additive(stat: &str) -> bool {
    ADDITIVE_STATS.contains(&stat)
}

/// 解析 sched 檔的內容
///
/// 前三行是標頭；之後每行是 `name : value`，讀到 `total_numa_faults` 為止。
/// 格式不對的行直接略過。
pub fn parse_sched(content: &str) -> SchedStats {
    let mut stats = SchedStats::new();

    for line in content.lines().skip(HEADER_LINES) {
        let mut parts = line.split_whitespace();
        let (Some(stat), Some(":"), Some(raw), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            continue;
        };

        if let Ok(value) = raw.parse::<f64>() {
            stats.insert(stat.to_string(), value);
        }

        if stat == LAST_STAT {
            break;
        }
    }

    stats
}

/// 只保留可累加的計數器並加到 `total`
pub fn accumulate(total: &mut SchedStats, thread: &SchedStats) {
    for (stat, value) in thread {
        if is_additive(stat) {
            *total.entry(stat.clone()).or_insert(0.0) += value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
fake-process (4242, #threads: 5)
-------------------------------------------------------------------
se.exec_start                                :      12345678.901234
se.vruntime                                  :          1500.250000
se.sum_exec_runtime                          :          3000.500000
se.nr_migrations                             :                   12
nr_switches                                  :                  400
nr_voluntary_switches                        :                  390
nr_involuntary_switches                      :                   10
se.avg.load_sum                              :                 2048
se.avg.util_sum                              :              1048576
this line is garbage
total_numa_faults                            :                    0
numa_pages_migrated                          :                    7
";

    #[test]
    fn test_parse_skips_header_and_stops_at_numa_faults() {
        let stats = parse_sched(SAMPLE);

        assert_eq!(stats.get("se.vruntime"), Some(&1500.25));
        assert_eq!(stats.get("nr_switches"), Some(&400.0));
        assert_eq!(stats.get("total_numa_faults"), Some(&0.0));
        // 在 total_numa_faults 之後，不應被解析
        assert!(!stats.contains_key("numa_pages_migrated"));
        assert!(!stats.keys().any(|k| k.starts_with("fake-process")));
    }

    #[test]
    fn test_accumulate_sums_additive_only() {
        let thread = parse_sched(SAMPLE);
        let mut total = SchedStats::new();
        accumulate(&mut total, &thread);
        accumulate(&mut total, &thread);

        assert_eq!(total.get("nr_switches"), Some(&800.0));
        assert_eq!(total.get("se.sum_exec_runtime"), Some(&6001.0));
        assert!(!total.contains_key("se.exec_start"));
        assert!(!total.contains_key("total_numa_faults"));
    }
}
