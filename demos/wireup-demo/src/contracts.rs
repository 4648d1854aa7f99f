//! Contracts the demo services are registered against.

/// Greets a caller.
pub trait Greeter {
    /// Greeting line for `name`.
    fn greet(&self, name: &str) -> String;
}

/// Receives audit records.
pub trait AuditSink {
    /// Records one audit line.
    fn record(&self, line: &str);
}

/// Generic storage contract, registered open.
pub trait Repository<T> {
    /// Stores one item.
    fn store(&mut self, item: T);
}
