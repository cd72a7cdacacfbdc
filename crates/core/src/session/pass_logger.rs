use std::collections::HashMap;
use std::time::Instant;

/// Timings and outcome of one applied detection pass.
#[derive(Clone, Debug, PartialEq)]
pub struct PassReport {
    pub generation: u64,
    pub detect_ms: f64,
    pub render_ms: f64,
    pub faces: usize,
    pub recorded: bool,
}

/// Cross-cutting logger for detection-pass events.
///
/// Keeps the controller free of any particular output mechanism; the CLI
/// wants periodic log lines and a summary, tests want silence.
pub trait PassLogger: Send {
    fn pass_completed(&mut self, report: &PassReport);

    fn pass_failed(&mut self, error: &str);

    /// A result arrived for a superseded input source and was dropped.
    fn result_discarded(&mut self, pass_generation: u64, current_generation: u64);

    /// Timer ticks skipped because a pass was still in flight.
    fn ticks_skipped(&mut self, count: u64);

    fn info(&mut self, message: &str);

    /// End-of-session summary. Default: no-op.
    fn summary(&self) {}
}

pub struct NullPassLogger;

impl PassLogger for NullPassLogger {
    fn pass_completed(&mut self, _report: &PassReport) {}
    fn pass_failed(&mut self, _error: &str) {}
    fn result_discarded(&mut self, _pass_generation: u64, _current_generation: u64) {}
    fn ticks_skipped(&mut self, _count: u64) {}
    fn info(&mut self, _message: &str) {}
}

/// Logger backed by the `log` facade.
///
/// Progress lines are throttled to one every `throttle_passes` passes.
pub struct LogPassLogger {
    throttle_passes: usize,
    timings: HashMap<String, Vec<f64>>,
    metrics: HashMap<String, Vec<f64>>,
    start_time: Instant,
    passes: usize,
    failures: usize,
    discarded: usize,
    skipped_ticks: u64,
    messages: Vec<String>,
}

impl LogPassLogger {
    pub fn new(throttle_passes: usize) -> Self {
        Self {
            throttle_passes: throttle_passes.max(1),
            timings: HashMap::new(),
            metrics: HashMap::new(),
            start_time: Instant::now(),
            passes: 0,
            failures: 0,
            discarded: 0,
            skipped_ticks: 0,
            messages: Vec::new(),
        }
    }

    fn record(map: &mut HashMap<String, Vec<f64>>, name: &str, value: f64) {
        map.entry(name.to_string()).or_default().push(value);
    }

    /// Returns the formatted summary, or `None` if nothing happened.
    pub fn summary_string(&self) -> Option<String> {
        if self.passes == 0 && self.failures == 0 && self.discarded == 0 {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let mut lines = vec![format!(
            "Session summary ({} passes, {} failed, {} discarded, {} ticks skipped, {:.1}s total):",
            self.passes,
            self.failures,
            self.discarded,
            self.skipped_ticks,
            elapsed_ms / 1000.0
        )];

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = total_ms / durations.len() as f64;
            let max_ms = durations.iter().copied().fold(0.0, f64::max);
            lines.push(format!(
                "  {stage:8}: avg {avg_ms:6.1}ms  max {max_ms:6.1}ms  total {total_ms:7.0}ms"
            ));
        }

        let mut metric_names: Vec<_> = self.metrics.keys().collect();
        metric_names.sort();
        for name in metric_names {
            let values = &self.metrics[name];
            let avg = values.iter().sum::<f64>() / values.len() as f64;
            lines.push(format!("  {name}: avg {avg:.1}"));
        }

        if self.passes > 0 && elapsed_ms > 0.0 {
            let rate = self.passes as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {rate:.1} passes/s"));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    pub fn metrics_for(&self, name: &str) -> Option<&[f64]> {
        self.metrics.get(name).map(|v| v.as_slice())
    }
}

impl Default for LogPassLogger {
    fn default() -> Self {
        Self::new(10)
    }
}

impl PassLogger for LogPassLogger {
    fn pass_completed(&mut self, report: &PassReport) {
        self.passes += 1;
        Self::record(&mut self.timings, "detect", report.detect_ms);
        Self::record(&mut self.timings, "render", report.render_ms);
        Self::record(&mut self.metrics, "faces", report.faces as f64);
        if self.passes % self.throttle_passes == 0 {
            log::info!(
                "Pass {}: {} face(s), detect {:.1}ms, render {:.1}ms",
                self.passes,
                report.faces,
                report.detect_ms,
                report.render_ms
            );
        } else {
            log::debug!(
                "Pass {} (generation {}): {} face(s), recorded={}",
                self.passes,
                report.generation,
                report.faces,
                report.recorded
            );
        }
    }

    fn pass_failed(&mut self, error: &str) {
        self.failures += 1;
        log::warn!("Detection pass failed: {error}");
    }

    fn result_discarded(&mut self, pass_generation: u64, current_generation: u64) {
        self.discarded += 1;
        log::debug!(
            "Discarded stale result from generation {pass_generation} (now {current_generation})"
        );
    }

    fn ticks_skipped(&mut self, count: u64) {
        self.skipped_ticks += count;
    }

    fn info(&mut self, message: &str) {
        self.messages.push(message.to_string());
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(detect_ms: f64, faces: usize) -> PassReport {
        PassReport {
            generation: 1,
            detect_ms,
            render_ms: 1.0,
            faces,
            recorded: false,
        }
    }

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullPassLogger;
        logger.pass_completed(&report(5.0, 1));
        logger.pass_failed("boom");
        logger.result_discarded(1, 2);
        logger.ticks_skipped(3);
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_pass_completed_records_timings_and_faces() {
        let mut logger = LogPassLogger::new(10);
        logger.pass_completed(&report(20.0, 1));
        logger.pass_completed(&report(30.0, 3));

        let detect = logger.timings_for("detect").unwrap();
        assert_eq!(detect, &[20.0, 30.0]);
        assert_eq!(logger.timings_for("render").unwrap().len(), 2);
        let faces = logger.metrics_for("faces").unwrap();
        assert_eq!(faces, &[1.0, 3.0]);
    }

    #[test]
    fn test_summary_counts_outcomes() {
        let mut logger = LogPassLogger::new(10);
        logger.pass_completed(&report(10.0, 2));
        logger.pass_failed("timeout");
        logger.result_discarded(1, 2);
        logger.ticks_skipped(4);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("1 passes"));
        assert!(summary.contains("1 failed"));
        assert!(summary.contains("1 discarded"));
        assert!(summary.contains("4 ticks skipped"));
        assert!(summary.contains("detect"));
        assert!(summary.contains("faces: avg 2.0"));
    }

    #[test]
    fn test_summary_includes_throughput() {
        let mut logger = LogPassLogger::new(10);
        logger.pass_completed(&report(10.0, 1));
        assert!(logger.summary_string().unwrap().contains("passes/s"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        assert!(LogPassLogger::new(10).summary_string().is_none());
    }

    #[test]
    fn test_failures_alone_produce_summary() {
        let mut logger = LogPassLogger::new(10);
        logger.pass_failed("x");
        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("0 passes"));
        assert!(!summary.contains("passes/s"));
    }

    #[test]
    fn test_info_stores_messages() {
        let mut logger = LogPassLogger::new(10);
        logger.info("camera started");
        assert_eq!(logger.messages, vec!["camera started".to_string()]);
    }

    #[test]
    fn test_default_throttle() {
        assert_eq!(LogPassLogger::default().throttle_passes, 10);
        assert_eq!(LogPassLogger::new(0).throttle_passes, 1);
    }
}
