//! Model graphs
//!
//! A [`Model`] wires named sources, processor templates, and sinks into a
//! directed graph. Like a single processor template, a model is inert until
//! compiled: [`Model::compile`] validates the wiring, compiles every
//! template, and freezes the routing table into a [`CompiledModel`] that
//! moves events synchronously from sources through processors to sinks.
//!
//! # Example
//!
//! ```rust
//! use octopus_processor::algorithms::AlgorithmKind;
//! use octopus_processor::config::ProcessorConfig;
//! use octopus_processor::model::Model;
//! use octopus_types::Event;
//!
//! let mut model = Model::new("demo");
//! model.add_source("readings").unwrap();
//! model
//!     .add_processor(
//!         ProcessorConfig::new("spread", AlgorithmKind::Subtraction)
//!             .with_input(1, "high")
//!             .with_input(2, "low")
//!             .with_join(1, 2)
//!             .with_output("spread", "value"),
//!     )
//!     .unwrap();
//! model.add_sink("out").unwrap();
//! model.connect("readings", "spread", 1).unwrap();
//! model.connect("readings", "spread", 2).unwrap();
//! model.connect_sink("spread", "out").unwrap();
//!
//! let mut compiled = model.compile().unwrap();
//! let delivered = compiled
//!     .push("readings", Event::new("r").with_attribute("high", 9.0).with_attribute("low", 4.0))
//!     .unwrap();
//! assert_eq!(delivered.len(), 1);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use tracing::{debug, info, trace};
use uuid::Uuid;

use octopus_types::Event;

use crate::compiled::CompiledProcessor;
use crate::config::ProcessorConfig;
use crate::error::{ProcessorError, Result};
use crate::sink::EventSink;
use crate::source::EventSource;

/// Where an edge delivers events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
enum Target {
    Processor { name: String, input: u32 },
    Sink { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Edge {
    from: String,
    target: Target,
}

/// Counters for one compiled model's run, in the style of an executor
/// stats block: plain counters, incremented as events move.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ModelStats {
    /// Events pushed in from sources
    pub events_in: u64,

    /// Events delivered to sinks
    pub events_out: u64,

    /// Processor firings that produced a value
    pub fired: u64,

    /// Offers that produced nothing (buffering joins, filling windows,
    /// skipped null operands)
    pub skipped: u64,

    /// Push failures recorded by a surrounding run loop
    pub errors: u64,

    /// When the current run started
    pub started_at: Option<DateTime<Utc>>,

    /// When the current run finished
    pub finished_at: Option<DateTime<Utc>>,
}

impl ModelStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_errors(&mut self) {
        self.errors += 1;
    }

    /// Wall-clock duration of the last completed run.
    pub fn elapsed_seconds(&self) -> Option<f64> {
        let (started, finished) = (self.started_at?, self.finished_at?);
        Some((finished - started).num_milliseconds() as f64 / 1000.0)
    }

    /// Input throughput of the last completed run.
    pub fn events_per_second(&self) -> Option<f64> {
        let elapsed = self.elapsed_seconds()?;
        if elapsed > 0.0 {
            Some(self.events_in as f64 / elapsed)
        } else {
            None
        }
    }
}

/// A mutable model template: named nodes plus the edges between them.
///
/// Sources, processors, and sinks share one name namespace; edges reference
/// nodes by name. Templates stay editable after compile, and compiling
/// again yields a fresh, independent [`CompiledModel`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    sources: Vec<String>,
    processors: Vec<ProcessorConfig>,
    sinks: Vec<String>,
    edges: Vec<Edge>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sources: Vec::new(),
            processors: Vec::new(),
            sinks: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Declares a named source node.
    pub fn add_source(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        self.check_fresh_name(&name)?;
        self.sources.push(name);
        Ok(())
    }

    /// Adds a processor template as a node named after the template.
    pub fn add_processor(&mut self, config: ProcessorConfig) -> Result<()> {
        self.check_fresh_name(&config.name)?;
        self.processors.push(config);
        Ok(())
    }

    /// Declares a named sink node.
    pub fn add_sink(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        self.check_fresh_name(&name)?;
        self.sinks.push(name);
        Ok(())
    }

    /// Wires the output of `from` (a source or processor) into input `input`
    /// of processor `to`.
    pub fn connect(&mut self, from: &str, to: &str, input: u32) -> Result<()> {
        if !self.is_emitter(from) {
            return Err(ProcessorError::connection(format!(
                "'{}' is not a declared source or processor",
                from
            )));
        }
        let Some(config) = self.processor(to) else {
            return Err(ProcessorError::connection(format!(
                "'{}' is not a declared processor",
                to
            )));
        };
        if !config.inputs.iter().any(|p| p.id == input) {
            return Err(ProcessorError::connection(format!(
                "processor '{}' declares no input {}",
                to, input
            )));
        }

        self.edges.push(Edge {
            from: from.to_string(),
            target: Target::Processor {
                name: to.to_string(),
                input,
            },
        });
        Ok(())
    }

    /// Wires the output of `from` (a source or processor) into a sink.
    pub fn connect_sink(&mut self, from: &str, sink: &str) -> Result<()> {
        if !self.is_emitter(from) {
            return Err(ProcessorError::connection(format!(
                "'{}' is not a declared source or processor",
                from
            )));
        }
        if !self.sinks.iter().any(|s| s == sink) {
            return Err(ProcessorError::connection(format!(
                "'{}' is not a declared sink",
                sink
            )));
        }

        self.edges.push(Edge {
            from: from.to_string(),
            target: Target::Sink {
                name: sink.to_string(),
            },
        });
        Ok(())
    }

    pub fn processor(&self, name: &str) -> Option<&ProcessorConfig> {
        self.processors.iter().find(|c| c.name == name)
    }

    /// Mutable access to a processor template, for editing between compiles.
    pub fn processor_mut(&mut self, name: &str) -> Option<&mut ProcessorConfig> {
        self.processors.iter_mut().find(|c| c.name == name)
    }

    /// Compiles every processor template and freezes the routing table.
    ///
    /// Any template that fails validation aborts the compile with its
    /// field-identifying error. The returned model owns all runtime state;
    /// editing this template afterwards never affects it.
    pub fn compile(&self) -> Result<CompiledModel> {
        self.check_acyclic()?;

        let mut processors = HashMap::with_capacity(self.processors.len());
        for config in &self.processors {
            processors.insert(config.name.clone(), config.compile()?);
        }

        let mut routes: HashMap<String, Vec<Target>> = HashMap::new();
        for edge in &self.edges {
            routes
                .entry(edge.from.clone())
                .or_default()
                .push(edge.target.clone());
        }

        let compilation_id = Uuid::new_v4();
        info!(
            model = %self.name,
            %compilation_id,
            processors = processors.len(),
            edges = self.edges.len(),
            "compiled model"
        );

        Ok(CompiledModel {
            name: self.name.clone(),
            compilation_id,
            sources: self.sources.iter().cloned().collect(),
            processors,
            routes,
            declared_sinks: self.sinks.iter().cloned().collect(),
            sink_bindings: HashMap::new(),
            stats: ModelStats::new(),
        })
    }

    fn check_fresh_name(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(ProcessorError::connection("node name must not be empty"));
        }
        if self.is_emitter(name) || self.sinks.iter().any(|s| s == name) {
            return Err(ProcessorError::connection(format!(
                "duplicate node name '{}'",
                name
            )));
        }
        Ok(())
    }

    fn is_emitter(&self, name: &str) -> bool {
        self.sources.iter().any(|s| s == name) || self.processor(name).is_some()
    }

    /// Kahn's algorithm over processor-to-processor edges. A synchronous
    /// push would never terminate on a cyclic graph, so cycles are a
    /// compile-time wiring error.
    fn check_acyclic(&self) -> Result<()> {
        let mut indegree: HashMap<&str, usize> = self
            .processors
            .iter()
            .map(|c| (c.name.as_str(), 0))
            .collect();
        let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();

        for edge in &self.edges {
            let Target::Processor { name: to, .. } = &edge.target else {
                continue;
            };
            // Edges out of sources cannot close a cycle.
            if !indegree.contains_key(edge.from.as_str()) {
                continue;
            }
            adjacency
                .entry(edge.from.as_str())
                .or_default()
                .push(to.as_str());
            if let Some(degree) = indegree.get_mut(to.as_str()) {
                *degree += 1;
            }
        }

        let mut ready: VecDeque<&str> = indegree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(name, _)| *name)
            .collect();
        let mut resolved = 0usize;

        while let Some(node) = ready.pop_front() {
            resolved += 1;
            for &next in adjacency.get(node).into_iter().flatten() {
                if let Some(degree) = indegree.get_mut(next) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push_back(next);
                    }
                }
            }
        }

        if resolved < indegree.len() {
            let stuck = indegree
                .iter()
                .filter(|(_, degree)| **degree > 0)
                .map(|(name, _)| *name)
                .min()
                .unwrap_or("?");
            return Err(ProcessorError::connection(format!(
                "cycle through processor '{}'",
                stuck
            )));
        }
        Ok(())
    }
}

/// A compiled model: compiled processors plus the frozen routing table.
pub struct CompiledModel {
    name: String,
    compilation_id: Uuid,
    sources: HashSet<String>,
    processors: HashMap<String, CompiledProcessor>,
    routes: HashMap<String, Vec<Target>>,
    declared_sinks: HashSet<String>,
    sink_bindings: HashMap<String, Box<dyn EventSink + Send>>,
    stats: ModelStats,
}

impl CompiledModel {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identifier of this compilation, distinct for every `Model::compile`.
    pub fn compilation_id(&self) -> Uuid {
        self.compilation_id
    }

    pub fn processor(&self, name: &str) -> Option<&CompiledProcessor> {
        self.processors.get(name)
    }

    pub fn stats(&self) -> &ModelStats {
        &self.stats
    }

    pub(crate) fn stats_mut(&mut self) -> &mut ModelStats {
        &mut self.stats
    }

    /// Binds a sink implementation to a declared sink node. Events routed to
    /// that node are handed to the binding as they arrive.
    pub fn bind_sink(&mut self, name: &str, sink: impl EventSink + Send + 'static) -> Result<()> {
        if !self.declared_sinks.contains(name) {
            return Err(ProcessorError::connection(format!(
                "'{}' is not a declared sink",
                name
            )));
        }
        self.sink_bindings.insert(name.to_string(), Box::new(sink));
        Ok(())
    }

    /// Pushes one event in on a source and propagates it to completion.
    ///
    /// Propagation is breadth-first: the event is offered to every processor
    /// wired to the source; each firing re-enters the queue under the
    /// processor's name until nothing more fires. Returns the events that
    /// reached sink nodes, in delivery order.
    pub fn push(&mut self, source: &str, event: Event) -> Result<Vec<Event>> {
        if !self.sources.contains(source) {
            return Err(ProcessorError::connection(format!(
                "unknown source '{}'",
                source
            )));
        }
        self.stats.events_in += 1;

        let mut delivered = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back((source.to_string(), event));

        while let Some((from, event)) = queue.pop_front() {
            let targets = match self.routes.get(&from) {
                Some(targets) => targets.clone(),
                None => continue,
            };
            for target in targets {
                match target {
                    Target::Processor { name, input } => {
                        let processor = self.processors.get_mut(&name).ok_or_else(|| {
                            ProcessorError::connection(format!(
                                "route to unknown processor '{}'",
                                name
                            ))
                        })?;
                        match processor.offer(input, event.clone())? {
                            Some(produced) => {
                                self.stats.fired += 1;
                                trace!(model = %self.name, processor = %name, "fired");
                                queue.push_back((name, produced));
                            }
                            None => self.stats.skipped += 1,
                        }
                    }
                    Target::Sink { name } => {
                        if let Some(sink) = self.sink_bindings.get_mut(&name) {
                            sink.accept(&event);
                        }
                        self.stats.events_out += 1;
                        delivered.push(event.clone());
                    }
                }
            }
        }

        Ok(delivered)
    }

    /// Drains an event source into the model, one push per event.
    pub fn run(&mut self, source: &str, mut events: impl EventSource) -> Result<ModelStats> {
        self.stats.started_at = Some(Utc::now());
        while let Some(event) = events.next() {
            self.push(source, event)?;
        }
        self.stats.finished_at = Some(Utc::now());

        debug!(
            model = %self.name,
            events_in = self.stats.events_in,
            events_out = self.stats.events_out,
            fired = self.stats.fired,
            skipped = self.stats.skipped,
            "source drained"
        );
        Ok(self.stats.clone())
    }

    /// Resets every processor's window state and zeroes the counters.
    pub fn reset(&mut self) {
        for processor in self.processors.values_mut() {
            processor.reset();
        }
        self.stats = ModelStats::new();
    }
}

impl fmt::Debug for CompiledModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledModel")
            .field("name", &self.name)
            .field("compilation_id", &self.compilation_id)
            .field("processors", &self.processors.len())
            .field("routes", &self.routes.len())
            .field("stats", &self.stats)
            .finish()
    }
}
