use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

/// Source of "now" for the default time window.
#[derive(Clone)]
pub struct Clock(Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>);

impl Clock {
    /// Wall clock (`Utc::now`).
    pub fn system() -> Self {
        Clock(Arc::new(Utc::now))
    }

    /// Always returns `at`.
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Clock(Arc::new(move || at))
    }

    /// Any custom source.
    pub fn from_fn(f: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        Clock(Arc::new(f))
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.0)()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::system()
    }
}

impl fmt::Debug for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Clock").field(&"<fn>").finish()
    }
}

/// Configuration for query building and resolution.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Length in days of the default trailing time window.
    pub default_window_days: i64,
    /// Whether `resolve()` checks every placeholder is bound before executing.
    pub check_placeholders: bool,
    /// Truncate logged templates (in bytes). `None` means no truncation.
    pub max_log_length: Option<usize>,
    /// Source of "now" for the default time window.
    pub clock: Clock,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_window_days: 7,
            check_placeholders: true,
            max_log_length: Some(200),
            clock: Clock::system(),
        }
    }
}

impl QueryConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default trailing window length in days.
    pub fn with_default_window_days(mut self, days: i64) -> Self {
        self.default_window_days = days;
        self
    }

    /// Enable or disable the placeholder check in `resolve()`.
    pub fn with_check_placeholders(mut self, enabled: bool) -> Self {
        self.check_placeholders = enabled;
        self
    }

    /// Set maximum template length to log.
    pub fn with_max_log_length(mut self, len: usize) -> Self {
        self.max_log_length = Some(len);
        self
    }

    /// Disable template truncation in logs.
    pub fn no_log_truncate(mut self) -> Self {
        self.max_log_length = None;
        self
    }

    /// Use `clock` as the source of "now".
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}
