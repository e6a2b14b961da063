pub mod collector;
pub mod counters;
pub mod cpu;
pub mod error;
pub mod host;
pub mod metadata;
pub mod platform;
pub mod process;
pub mod snapshot;
pub mod source;

pub use collector::Collector;
pub use error::SampleError;
pub use source::{FsSource, LineSource, MemorySource, ProcContext, ProcPaths};
