//! Processor execution core for Octopus
//!
//! This crate provides the execution core of the Octopus model builder:
//! processor templates and their compiled, runnable form, the windowed
//! memory every algorithm accumulates into, the join/dispatch logic that
//! decides when a multi-input processor fires, and the model graph that
//! moves events from sources through processors to sinks.

pub mod algorithms;
pub mod compiled;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod memory;
pub mod model;
pub mod params;
pub mod runner;
pub mod sink;
pub mod source;
pub mod stats;

// Re-export commonly used types
pub use algorithms::{Algorithm, AlgorithmKind, BinaryOp, InputBinding};

pub use compiled::CompiledProcessor;

pub use config::{InputPort, Join, Output, ProcessorConfig};

pub use dispatch::{EventBundle, JoinDispatcher};

pub use error::{ParameterError, ProcessorError, Result as ProcessorResult};

pub use memory::{Memory, MemoryProvider};

pub use model::{CompiledModel, Model, ModelStats};

pub use params::{Constraint, ParameterKind, ParameterSet, ParameterSpec, ParameterValue};

pub use runner::{EventFeed, SourceEvent, StreamRunner};

pub use sink::{EventSink, TraceSink, VecSink};

pub use source::{EventSource, VecSource};

pub use stats::PairStats;
