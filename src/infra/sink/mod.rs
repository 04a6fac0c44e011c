//! Drift summary sinks.

pub mod memory;
pub mod tracing_sink;

pub use memory::InMemoryDriftSink;
pub use tracing_sink::TracingDriftSink;
