use crate::config::LoggingConfig;
use anyhow::{anyhow, Result};
use chrono::Local;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

/// Default number of diagnostics to keep in memory
pub const DEFAULT_CAPACITY: usize = 1000;

/// A captured diagnostic with timestamp and message
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: Level,
    pub target: String,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: Level, target: &str, message: String) -> Self {
        Self {
            timestamp: Local::now().format("%H:%M:%S.%3f").to_string(),
            level,
            target: target.to_string(),
            message,
        }
    }

    pub fn format_for_display(&self) -> String {
        format!(
            "[{}] {} [{}] {}",
            self.timestamp, self.level, self.target, self.message
        )
    }
}

/// Thread-safe bounded buffer of diagnostics; the oldest entries are evicted
#[derive(Debug, Clone)]
pub struct DiagnosticLog {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
    capacity: usize,
}

impl Default for DiagnosticLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl DiagnosticLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    // A panic while holding the lock cannot leave the deque half-updated
    fn lock(&self) -> MutexGuard<'_, VecDeque<LogEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn push(&self, entry: LogEntry) {
        let mut entries = self.lock();
        if entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// The last `count` entries, oldest first
    pub fn get_recent(&self, count: usize) -> Vec<LogEntry> {
        let entries = self.lock();
        let skip = entries.len().saturating_sub(count);
        entries.iter().skip(skip).cloned().collect()
    }

    /// Entries at WARN or more severe
    pub fn warnings(&self) -> Vec<LogEntry> {
        self.lock()
            .iter()
            .filter(|e| e.level <= Level::WARN)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Writer that parses compact fmt output into [`LogEntry`] values
#[derive(Debug, Clone)]
pub struct DiagnosticWriter {
    log: DiagnosticLog,
}

impl DiagnosticWriter {
    pub fn new(log: DiagnosticLog) -> Self {
        Self { log }
    }

    fn parse_line(line: &str) -> LogEntry {
        // Compact format without time is "LEVEL target: message"
        let (level, rest) = match line.split_once(' ') {
            Some((token, rest)) => match token.parse::<Level>() {
                Ok(level) => (level, rest.trim_start()),
                Err(_) => return LogEntry::new(Level::INFO, "general", line.to_string()),
            },
            None => return LogEntry::new(Level::INFO, "general", line.to_string()),
        };

        match rest.split_once(": ") {
            Some((target, message)) if !target.contains(' ') => {
                LogEntry::new(level, target, message.trim().to_string())
            }
            _ => LogEntry::new(level, "general", rest.to_string()),
        }
    }
}

impl std::io::Write for DiagnosticWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Ok(text) = std::str::from_utf8(buf) {
            for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
                self.log.push(Self::parse_line(line));
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for DiagnosticWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

static DIAGNOSTICS: OnceLock<DiagnosticLog> = OnceLock::new();

/// The log installed by [`init_tracing`], if any
pub fn diagnostics() -> Option<DiagnosticLog> {
    DIAGNOSTICS.get().cloned()
}

/// Install a global subscriber that captures diagnostics in memory.
///
/// `RUST_LOG` takes precedence over the configured filter. Calling this a
/// second time returns the already-installed log.
pub fn init_tracing(config: &LoggingConfig) -> Result<DiagnosticLog> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    if let Some(existing) = diagnostics() {
        return Ok(existing);
    }

    let log = DiagnosticLog::new(config.buffer_size);
    let writer = DiagnosticWriter::new(log.clone());

    let fmt_layer = fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .without_time()
        .compact();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .map_err(|e| anyhow!("Invalid log filter '{}': {}", config.filter, e))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))?;

    let log = DIAGNOSTICS.get_or_init(|| log).clone();
    tracing::debug!(target: "tabkit", "Tracing initialized");
    Ok(log)
}
