//! Scheduler configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Environment variable prefix read by [`SchedulerConfig::from_env`].
pub const ENV_PREFIX: &str = "DUE_SCHEDULER_";

/// Sizing and reporting settings for a [`Scheduler`](crate::core::Scheduler).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Admitted-but-not-started tasks allowed across both paths.
    pub max_queue_size: usize,
    /// Worker threads for future-dated (timer path) tasks.
    pub max_threads: usize,
    /// Worker threads for already-due (overdue path) tasks.
    pub late_max_threads: usize,
    /// Seconds between drift histogram reports.
    pub report_interval_secs: u64,
    /// Label attached to drift summaries.
    pub drift_label: String,
    /// Stack size for worker threads; platform default when `None`.
    pub thread_stack_size: Option<usize>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_queue_size: 1024,
            max_threads: num_cpus::get(),
            late_max_threads: 1,
            report_interval_secs: 10,
            drift_label: "drifts".into(),
            thread_stack_size: None,
        }
    }
}

impl SchedulerConfig {
    /// Defaults: 1024 queue slots, one timer worker per CPU, one overdue
    /// worker, 10 s drift reports.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `max_queue_size`.
    #[must_use]
    pub const fn with_max_queue_size(mut self, max_queue_size: usize) -> Self {
        self.max_queue_size = max_queue_size;
        self
    }

    /// Set `max_threads`.
    #[must_use]
    pub const fn with_max_threads(mut self, max_threads: usize) -> Self {
        self.max_threads = max_threads;
        self
    }

    /// Set `late_max_threads`.
    #[must_use]
    pub const fn with_late_max_threads(mut self, late_max_threads: usize) -> Self {
        self.late_max_threads = late_max_threads;
        self
    }

    /// Set the drift report interval in seconds.
    #[must_use]
    pub const fn with_report_interval_secs(mut self, secs: u64) -> Self {
        self.report_interval_secs = secs;
        self
    }

    /// Set the drift summary label.
    #[must_use]
    pub fn with_drift_label(mut self, label: impl Into<String>) -> Self {
        self.drift_label = label.into();
        self
    }

    /// Set the worker thread stack size.
    #[must_use]
    pub const fn with_thread_stack_size(mut self, size: usize) -> Self {
        self.thread_stack_size = Some(size);
        self
    }

    /// Drift report interval.
    #[must_use]
    pub const fn report_interval(&self) -> Duration {
        Duration::from_secs(self.report_interval_secs)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_queue_size == 0 {
            return Err("max_queue_size must be greater than 0".into());
        }
        if self.max_threads == 0 {
            return Err("max_threads must be greater than 0".into());
        }
        if self.late_max_threads == 0 {
            return Err("late_max_threads must be greater than 0".into());
        }
        if self.report_interval_secs == 0 {
            return Err("report_interval_secs must be greater than 0".into());
        }
        if self.drift_label.trim().is_empty() {
            return Err("drift_label must not be empty".into());
        }
        if self.thread_stack_size == Some(0) {
            return Err("thread_stack_size must be greater than 0".into());
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate. Missing fields
    /// take their defaults.
    ///
    /// # Errors
    ///
    /// Returns a parse or validation message.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load `.env` (if present) and read `DUE_SCHEDULER_*` variables over the
    /// defaults, then validate.
    ///
    /// # Errors
    ///
    /// Returns a parse or validation message.
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();
        Self::from_vars(std::env::vars())
    }

    /// Build from `(name, value)` pairs using the `DUE_SCHEDULER_*` names:
    /// `MAX_QUEUE_SIZE`, `MAX_THREADS`, `LATE_MAX_THREADS`,
    /// `REPORT_INTERVAL_SECS`, `DRIFT_LABEL`, `THREAD_STACK_SIZE`.
    /// Unrelated names are ignored.
    ///
    /// # Errors
    ///
    /// Returns a parse or validation message.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut cfg = Self::default();
        for (key, value) in vars {
            let Some(name) = key.as_ref().strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let value = value.as_ref().trim();
            match name {
                "MAX_QUEUE_SIZE" => cfg.max_queue_size = parse_var(name, value)?,
                "MAX_THREADS" => cfg.max_threads = parse_var(name, value)?,
                "LATE_MAX_THREADS" => cfg.late_max_threads = parse_var(name, value)?,
                "REPORT_INTERVAL_SECS" => cfg.report_interval_secs = parse_var(name, value)?,
                "DRIFT_LABEL" => cfg.drift_label = value.to_string(),
                "THREAD_STACK_SIZE" => cfg.thread_stack_size = Some(parse_var(name, value)?),
                _ => {}
            }
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn parse_var<T>(name: &str, value: &str) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| format!("{ENV_PREFIX}{name}={value:?}: {e}"))
}
