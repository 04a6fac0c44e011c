//! Infrastructure adapters for drift reporting sinks.

pub mod sink;
pub use sink::InMemoryDriftSink;
pub use sink::TracingDriftSink;
