//! Line-oriented diagnostic sinks.
//!
//! A sink is acquired once per invocation and handed down by reference to
//! every component that reports problems. Only two severities exist.

use crate::error::DiagnosticError;
use chrono::Utc;
use parking_lot::Mutex;
use std::fmt;
use std::io::Write;
use std::net::{TcpStream, ToSocketAddrs};
use std::str::FromStr;
use std::time::{Duration, Instant};

/// Severity of a diagnostic record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Info,
    Warning,
}

impl LogLevel {
    /// The numeric level forwarded to the UDF call string.
    pub fn as_number(self) -> u8 {
        match self {
            LogLevel::Info => 20,
            LogLevel::Warning => 30,
        }
    }
}

impl FromStr for LogLevel {
    type Err = DiagnosticError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INFO" | "20" => Ok(LogLevel::Info),
            "WARNING" | "30" => Ok(LogLevel::Warning),
            _ => Err(DiagnosticError::UnsupportedLogLevel(s.to_string())),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARNING"),
        }
    }
}

/// Destination for diagnostics. Implementations must tolerate concurrent writers.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, level: LogLevel, message: &str);

    fn info(&self, message: &str) {
        self.emit(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.emit(LogLevel::Warning, message);
    }
}

/// Sends each record as one plain-text line over TCP.
///
/// The connection is opened on the first record. Connecting and every write
/// are bounded by the sink's timeout. After a failed connect or write the
/// connection is dropped and records are discarded until the retry delay has
/// passed; the delay doubles with each consecutive failure.
pub struct TcpLineSink {
    host: String,
    port: u16,
    min_level: LogLevel,
    timeout: Duration,
    link: Mutex<Link>,
}

const LISTENER_TIMEOUT: Duration = Duration::from_secs(1);
const RETRY_START: Duration = Duration::from_secs(1);
const RETRY_MAX: Duration = Duration::from_secs(30);

#[derive(Debug)]
struct Link {
    stream: Option<TcpStream>,
    retry_after: Option<Instant>,
    retry_delay: Duration,
}

impl Link {
    fn new() -> Self {
        Self {
            stream: None,
            retry_after: None,
            retry_delay: RETRY_START,
        }
    }

    fn fail(&mut self) {
        self.stream = None;
        self.retry_after = Some(Instant::now() + self.retry_delay);
        self.retry_delay = (self.retry_delay * 2).min(RETRY_MAX);
    }

    fn recover(&mut self) {
        self.retry_after = None;
        self.retry_delay = RETRY_START;
    }
}

impl TcpLineSink {
    pub fn new(host: impl Into<String>, port: u16, min_level: LogLevel) -> Self {
        Self {
            host: host.into(),
            port,
            min_level,
            timeout: LISTENER_TIMEOUT,
            link: Mutex::new(Link::new()),
        }
    }

    /// Bounds both connecting and each write.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    fn connect(&self) -> Option<TcpStream> {
        let addrs = match (self.host.as_str(), self.port).to_socket_addrs() {
            Ok(addrs) => addrs,
            Err(e) => {
                tracing::debug!(host = %self.host, port = self.port, error = %e, "log listener address did not resolve");
                return None;
            }
        };
        for addr in addrs {
            let stream = TcpStream::connect_timeout(&addr, self.timeout)
                .and_then(|stream| stream.set_write_timeout(Some(self.timeout)).map(|_| stream));
            match stream {
                Ok(stream) => return Some(stream),
                Err(e) => {
                    tracing::debug!(%addr, error = %e, "log listener connection failed");
                }
            }
        }
        None
    }
}

impl DiagnosticSink for TcpLineSink {
    fn emit(&self, level: LogLevel, message: &str) {
        if level < self.min_level {
            return;
        }
        let line = format!(
            "{}: {}\r\n",
            Utc::now().format("%Y-%m-%d %H:%M:%S,%3f"),
            message
        );

        let mut link = self.link.lock();
        if link.stream.is_none() {
            if link.retry_after.is_some_and(|at| Instant::now() < at) {
                return;
            }
            match self.connect() {
                Some(stream) => link.stream = Some(stream),
                None => return link.fail(),
            }
        }
        let written = match link.stream.as_mut() {
            Some(stream) => stream.write_all(line.as_bytes()),
            None => return,
        };
        match written {
            Ok(()) => link.recover(),
            Err(e) => {
                tracing::debug!(error = %e, "dropping log listener connection");
                link.fail();
            }
        }
    }
}

/// Forwards records to the `tracing` subscriber of the host process.
#[derive(Debug, Clone, Copy)]
pub struct TracingSink {
    min_level: LogLevel,
}

impl TracingSink {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}

impl DiagnosticSink for TracingSink {
    fn emit(&self, level: LogLevel, message: &str) {
        if level < self.min_level {
            return;
        }
        match level {
            LogLevel::Info => tracing::info!("{}", message),
            LogLevel::Warning => tracing::warn!("{}", message),
        }
    }
}

/// Keeps every record in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<(LogLevel, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<(LogLevel, String)> {
        self.records.lock().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .filter(|(level, _)| *level == LogLevel::Warning)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, level: LogLevel, message: &str) {
        self.records.lock().push((level, message.to_string()));
    }
}
