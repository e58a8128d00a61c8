use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::time::{Duration, Instant};

use serde::Serialize;

/// Per-stage timing report for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimingReport {
    /// Stages in the order they first ran.
    pub stages: Vec<StageTiming>,
}

/// Accumulated time spent in one named stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageTiming {
    pub name: String,
    /// Number of times the stage ran.
    pub count: usize,
    #[serde(rename = "total_us", serialize_with = "as_micros")]
    pub total: Duration,
}

/// Records how long each pipeline stage takes.
///
/// Owned by a single run; a disabled timer records nothing and adds no
/// overhead beyond the branch.
#[derive(Debug, Default)]
pub struct StageTimer {
    enabled: bool,
    order: Vec<String>,
    totals: BTreeMap<String, (usize, Duration)>,
}

/// Returns true when `COGRAPH_TIMING` enables timing collection.
///
/// Supported truthy values: `1`, `true`, `yes`, `on` (case-insensitive).
#[must_use]
pub fn timing_enabled_from_env() -> bool {
    std::env::var("COGRAPH_TIMING")
        .ok()
        .is_some_and(|value| is_truthy(value.as_str()))
}

impl StageTimer {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Execute a closure while recording its duration under `name`.
    pub fn timed<R>(&mut self, name: &str, f: impl FnOnce() -> R) -> R {
        if !self.enabled {
            return f();
        }

        let started = Instant::now();
        let result = f();
        self.record(name, started.elapsed());
        result
    }

    fn record(&mut self, name: &str, elapsed: Duration) {
        if !self.totals.contains_key(name) {
            self.order.push(name.to_string());
        }
        let entry = self
            .totals
            .entry(name.to_string())
            .or_insert((0, Duration::ZERO));
        entry.0 += 1;
        entry.1 += elapsed;
    }

    #[must_use]
    pub fn report(&self) -> TimingReport {
        let stages = self
            .order
            .iter()
            .filter_map(|name| {
                self.totals.get(name).map(|(count, total)| StageTiming {
                    name: name.clone(),
                    count: *count,
                    total: *total,
                })
            })
            .collect();
        TimingReport { stages }
    }
}

impl TimingReport {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Render the timing report as a simple table for terminal output.
    #[must_use]
    pub fn display_table(&self) -> String {
        if self.stages.is_empty() {
            return "No timing samples recorded.".to_string();
        }

        let mut out = String::new();
        out.push_str("stage                        count     total\n");
        out.push_str("--------------------------------------------\n");

        for stage in &self.stages {
            let _ = writeln!(
                out,
                "{:<28} {:>5} {:>9}",
                stage.name,
                stage.count,
                format_duration(stage.total)
            );
        }

        out
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn as_micros<S: serde::Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u128(duration.as_micros())
}

fn format_duration(duration: Duration) -> String {
    let micros = duration.as_micros();

    if micros >= 1_000_000 {
        let secs = micros / 1_000_000;
        let millis = (micros % 1_000_000) / 1_000;
        format!("{secs}.{millis:03}s")
    } else if micros >= 1_000 {
        let millis = micros / 1_000;
        let rem = micros % 1_000;
        format!("{millis}.{rem:03}ms")
    } else {
        format!("{micros}µs")
    }
}

const fn is_truthy(value: &str) -> bool {
    value.eq_ignore_ascii_case("1")
        || value.eq_ignore_ascii_case("true")
        || value.eq_ignore_ascii_case("yes")
        || value.eq_ignore_ascii_case("on")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_timer_records_nothing() {
        let mut timer = StageTimer::new(false);
        let value = timer.timed("extract", || 7_u8);
        assert_eq!(value, 7);
        assert!(timer.report().is_empty());
    }

    #[test]
    fn enabled_timer_groups_by_stage_in_first_run_order() {
        let mut timer = StageTimer::new(true);
        timer.timed("load", || ());
        timer.timed("aggregate", || ());
        timer.timed("load", || ());

        let report = timer.report();
        let names: Vec<&str> = report.stages.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["load", "aggregate"]);
        assert_eq!(report.stages[0].count, 2);
        assert_eq!(report.stages[1].count, 1);
    }

    #[test]
    fn durations_format_with_units() {
        assert_eq!(format_duration(Duration::from_micros(12)), "12µs");
        assert_eq!(format_duration(Duration::from_micros(1_500)), "1.500ms");
        assert_eq!(format_duration(Duration::from_micros(2_003_000)), "2.003s");
    }

    #[test]
    fn truthy_parser_is_case_insensitive() {
        assert!(is_truthy("TrUe"));
        assert!(is_truthy("1"));
        assert!(is_truthy("YES"));
        assert!(is_truthy("on"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("false"));
    }

    #[test]
    fn display_table_lists_stages() {
        let mut timer = StageTimer::new(true);
        timer.timed("centrality", || ());
        let table = timer.report().display_table();
        assert!(table.contains("stage"));
        assert!(table.contains("centrality"));
    }
}
