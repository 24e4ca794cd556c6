#![forbid(unsafe_code)]

pub mod sink;

pub use sink::{FailingProgressSink, InMemoryProgressSink, ProgressSink, ProgressWrite, SinkError};
