//! Annotated demo services, one per registration shape.

use wireup_macros::{scoped, service, singleton, transient};

use crate::contracts::{AuditSink, Greeter, Repository};

/// Closed type, one contract: singleton pair registration.
#[singleton]
pub struct ConsoleGreeter;

impl Greeter for ConsoleGreeter {
    fn greet(&self, name: &str) -> String {
        format!("hello, {name}")
    }
}

/// No contracts, keyed: keyed transient self registration.
#[transient(key = "smtp")]
pub struct SmtpMailer {
    /// Outgoing relay host.
    pub host: String,
}

/// Two contracts, singleton: shared-instance fan-out.
#[singleton]
pub struct Recorder;

impl Greeter for Recorder {
    fn greet(&self, name: &str) -> String {
        format!("recorded greeting for {name}")
    }
}

impl AuditSink for Recorder {
    fn record(&self, _line: &str) {}
}

/// Open generic with one open contract.
#[scoped]
pub struct VecRepository<T> {
    items: Vec<T>,
}

impl<T> Default for VecRepository<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Repository<T> for VecRepository<T> {
    fn store(&mut self, item: T) {
        self.items.push(item);
    }
}

/// Category-gated: only registered when "Web" is an active category.
#[scoped(category = "Web")]
pub struct RequestLog;

impl AuditSink for RequestLog {
    fn record(&self, _line: &str) {}
}

/// Idempotent: skipped because `ConsoleGreeter` already covers `Greeter`.
#[singleton(try_add, contract = Greeter)]
pub struct FallbackGreeter;

impl Greeter for FallbackGreeter {
    fn greet(&self, _name: &str) -> String {
        "hello".to_string()
    }
}

/// Legacy base-marker form with a positional lifetime.
#[service(scoped)]
pub struct LegacyCache;
