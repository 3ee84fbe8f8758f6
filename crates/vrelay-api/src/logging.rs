//! Tracing subscriber setup.
//!
//! Two sinks: stdout, which service mode quiets down, and a daily-rotated
//! log file that always records the application crates at `LOG_LEVEL`.

use std::path::PathBuf;

use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer, Registry};

/// Crates whose logs follow `LOG_LEVEL`.
const APP_TARGETS: &[&str] = &[
    "vrelay_server",
    "vrelay_api",
    "vrelay_core",
    "vrelay_detector_client",
    "vrelay_specialist",
    "tower_http",
];

/// Target used by the binary for its startup and shutdown lines.
pub const SERVER_TARGET: &str = "vrelay_server";

const DEFAULT_LOG_FILE: &str = "server.log";

/// Daily files kept on disk, the current one included.
const DEFAULT_MAX_LOG_FILES: usize = 7;

/// Rotating log file settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLogSettings {
    /// Directory holding the log files
    pub dir: PathBuf,
    /// File name; the date is inserted before the extension on rotation
    pub file_name: String,
    /// Number of daily files to keep
    pub max_files: usize,
}

impl FileLogSettings {
    /// Split `file_name` into the appender's prefix and optional suffix.
    fn name_parts(&self) -> (&str, Option<&str>) {
        match self.file_name.rsplit_once('.') {
            Some((prefix, suffix)) if !prefix.is_empty() && !suffix.is_empty() => {
                (prefix, Some(suffix))
            }
            _ => (self.file_name.as_str(), None),
        }
    }

    /// Build the daily rolling appender, creating the directory if needed.
    pub fn appender(&self) -> Result<RollingFileAppender, InitError> {
        let (prefix, suffix) = self.name_parts();
        let mut builder = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(prefix)
            .max_log_files(self.max_files);
        if let Some(suffix) = suffix {
            builder = builder.filename_suffix(suffix);
        }
        builder.build(&self.dir)
    }
}

/// Log output settings.
#[derive(Debug, Clone)]
pub struct LogSettings {
    /// Emit JSON lines on stdout instead of human-readable output
    pub json: bool,
    /// Quiet stdout for running as a system service
    pub service_mode: bool,
    /// Level applied to the application crates
    pub level: String,
    /// Rotating log file, `None` when disabled
    pub file: Option<FileLogSettings>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            json: false,
            service_mode: false,
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LogSettings {
    /// Read settings from the process environment.
    ///
    /// `service_flag` is the `--service` command line switch and forces
    /// service mode on.
    pub fn from_env(service_flag: bool) -> Self {
        Self::from_lookup(service_flag, |key| std::env::var(key).ok())
    }

    /// Read `LOG_FORMAT`, `LOG_MODE`, `LOG_LEVEL`, `LOG_DIR` and `LOG_FILE`
    /// through an arbitrary key lookup.
    ///
    /// `LOG_FILE` set to `off` or an empty value disables the log file.
    pub fn from_lookup<F>(service_flag: bool, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let json = lookup("LOG_FORMAT")
            .map(|v| v.to_lowercase() == "json")
            .unwrap_or(false);
        let service_mode = service_flag
            || lookup("LOG_MODE")
                .map(|v| v.to_lowercase() == "service")
                .unwrap_or(false);
        let level = lookup("LOG_LEVEL")
            .and_then(|v| normalize_level(&v))
            .unwrap_or_else(|| "info".to_string());

        let file_name = lookup("LOG_FILE").unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());
        let file_name = file_name.trim();
        let file = if file_name.is_empty() || file_name.eq_ignore_ascii_case("off") {
            None
        } else {
            Some(FileLogSettings {
                dir: lookup("LOG_DIR")
                    .filter(|d| !d.trim().is_empty())
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(".")),
                file_name: file_name.to_string(),
                max_files: DEFAULT_MAX_LOG_FILES,
            })
        };

        Self {
            json,
            service_mode,
            level,
            file,
        }
    }

    /// Stdout filter used when `RUST_LOG` is not set.
    pub fn console_directives(&self) -> String {
        if self.service_mode {
            return format!("warn,{}=info", SERVER_TARGET);
        }
        self.file_directives()
    }

    /// File filter used when `RUST_LOG` is not set. Service mode does not
    /// apply here.
    pub fn file_directives(&self) -> String {
        let mut directives = String::from("warn");
        for target in APP_TARGETS {
            directives.push_str(&format!(",{}={}", target, self.level));
        }
        directives
    }
}

fn normalize_level(raw: &str) -> Option<String> {
    let level = raw.trim().to_lowercase();
    let level = match level.as_str() {
        "warning" => "warn".to_string(),
        "critical" => "error".to_string(),
        _ => level,
    };
    matches!(level.as_str(), "trace" | "debug" | "info" | "warn" | "error").then_some(level)
}

/// `RUST_LOG` when set, otherwise the given default directives.
fn filter_or_env(directives: String) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives))
}

/// Install the global tracing subscriber.
///
/// The returned guard flushes the log file on drop and must be held for the
/// life of the process.
pub fn init_tracing(settings: &LogSettings) -> Option<WorkerGuard> {
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    let console_filter = filter_or_env(settings.console_directives());
    if settings.json {
        layers.push(fmt::layer().json().with_filter(console_filter).boxed());
    } else {
        layers.push(
            fmt::layer()
                .with_ansi(!settings.service_mode)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_filter(console_filter)
                .boxed(),
        );
    }

    let mut guard = None;
    let mut file_error = None;
    if let Some(file) = &settings.file {
        match file.appender() {
            Ok(appender) => {
                let (writer, worker_guard) = tracing_appender::non_blocking(appender);
                guard = Some(worker_guard);
                layers.push(
                    fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false)
                        .with_target(true)
                        .with_filter(filter_or_env(settings.file_directives()))
                        .boxed(),
                );
            }
            Err(e) => file_error = Some(e),
        }
    }

    tracing_subscriber::registry().with(layers).init();

    if let Some(e) = file_error {
        warn!(target: SERVER_TARGET, "File logging disabled: {}", e);
    }
    guard
}
