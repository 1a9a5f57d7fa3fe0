//! The grammar/specimen state machine.
//!
//! Two steady states: a ready parser with the tree it produced, or a compile
//! diagnostic next to the last good tree. Grammar edits arm a debounced
//! recompile; specimen edits queue a reparse. Both run from [`Pipeline::tick`].

use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use lezer_playground_core::ParseTreeNode;
use lezer_playground_runtime::HighlightSpan;

use crate::compiler::{CompiledParser, GrammarCompiler, SpecimenParser};
use crate::debounce::Debouncer;
use crate::error::PipelineError;
use crate::serialize::serialize;

const PANIC_FALLBACK: &str = "Failed to build parser";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetGrammar(String),
    SetSpecimen(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status<'a> {
    Ready,
    Failed(&'a str),
}

/// Reported to subscribers after each completed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    GrammarEdited,
    SpecimenEdited,
    Compiled { elapsed: Duration },
    CompileFailed(PipelineError),
    Reparsed { node_count: usize },
    ReparseFailed(PipelineError),
    /// A reparse was due but no parser is available.
    ReparseSkipped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Compiler invocations, including ones that failed or panicked.
    pub compiles: usize,
    /// Specimen parses actually run.
    pub reparses: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    Recompile,
    Reparse,
}

/// FIFO of derived work; a task already queued is not queued twice.
#[derive(Debug, Default)]
struct TaskQueue {
    tasks: VecDeque<Task>,
}

impl TaskQueue {
    fn push(&mut self, task: Task) {
        if !self.tasks.contains(&task) {
            self.tasks.push_back(task);
        }
    }

    fn pop(&mut self) -> Option<Task> {
        self.tasks.pop_front()
    }

    fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

type Subscriber = Box<dyn FnMut(&Transition)>;

pub struct Pipeline<C: GrammarCompiler> {
    compiler: C,
    grammar: String,
    specimen: String,
    parser: CompiledParser<C::Parser>,
    tree: Option<ParseTreeNode>,
    specimen_error: Option<PipelineError>,
    debounce: Debouncer,
    queue: TaskQueue,
    subscribers: Vec<Subscriber>,
    stats: Stats,
}

impl<C: GrammarCompiler> Pipeline<C> {
    /// Compiles `grammar` and parses `specimen` right away.
    pub fn new(
        compiler: C,
        grammar: impl Into<String>,
        specimen: impl Into<String>,
        debounce: Duration,
    ) -> Self {
        let mut pipeline = Self {
            compiler,
            grammar: grammar.into(),
            specimen: specimen.into(),
            parser: CompiledParser::Failed {
                diagnostic: String::new(),
            },
            tree: None,
            specimen_error: None,
            debounce: Debouncer::new(debounce),
            queue: TaskQueue::default(),
            subscribers: Vec::new(),
            stats: Stats::default(),
        };
        pipeline.queue.push(Task::Recompile);
        pipeline.drain();
        pipeline
    }

    pub fn grammar(&self) -> &str {
        &self.grammar
    }

    pub fn specimen(&self) -> &str {
        &self.specimen
    }

    pub fn status(&self) -> Status<'_> {
        match &self.parser {
            CompiledParser::Ready { .. } => Status::Ready,
            CompiledParser::Failed { diagnostic } => Status::Failed(diagnostic),
        }
    }

    pub fn parser(&self) -> &CompiledParser<C::Parser> {
        &self.parser
    }

    pub fn tree(&self) -> Option<&ParseTreeNode> {
        self.tree.as_ref()
    }

    /// Why the latest specimen could not be turned into a tree, if it could not.
    pub fn specimen_error(&self) -> Option<&PipelineError> {
        self.specimen_error.as_ref()
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Named-token spans of the current specimen; empty without a parser.
    pub fn highlight(&self) -> Vec<HighlightSpan> {
        self.parser
            .parser()
            .map(|p| p.highlight(&self.specimen))
            .unwrap_or_default()
    }

    /// When the pending recompile becomes due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    /// No recompile armed and no queued work.
    pub fn is_idle(&self) -> bool {
        !self.debounce.is_pending() && self.queue.is_empty()
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&Transition) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn set_grammar(&mut self, text: impl Into<String>, now: Instant) {
        self.grammar = text.into();
        self.debounce.schedule(now);
        tracing::debug!(len = self.grammar.len(), "grammar edited");
        self.notify(Transition::GrammarEdited);
    }

    pub fn set_specimen(&mut self, text: impl Into<String>, now: Instant) {
        self.specimen = text.into();
        self.queue.push(Task::Reparse);
        tracing::debug!(len = self.specimen.len(), ?now, "specimen edited");
        self.notify(Transition::SpecimenEdited);
    }

    pub fn dispatch(&mut self, command: Command, now: Instant) {
        match command {
            Command::SetGrammar(text) => self.set_grammar(text, now),
            Command::SetSpecimen(text) => self.set_specimen(text, now),
        }
    }

    /// Runs whatever is due at `now`: queued reparses and, once the debounce
    /// window has passed, the recompile.
    pub fn tick(&mut self, now: Instant) -> Vec<Transition> {
        if self.debounce.fire(now) {
            self.queue.push(Task::Recompile);
        }
        self.drain()
    }

    /// Runs a pending recompile without waiting for its deadline.
    pub fn flush(&mut self) -> Vec<Transition> {
        if self.debounce.is_pending() {
            self.debounce.cancel();
            self.queue.push(Task::Recompile);
        }
        self.drain()
    }

    fn drain(&mut self) -> Vec<Transition> {
        let mut transitions = Vec::new();
        while let Some(task) = self.queue.pop() {
            let transition = match task {
                Task::Recompile => self.recompile(),
                Task::Reparse => self.reparse(),
            };
            self.notify(transition.clone());
            transitions.push(transition);
        }
        transitions
    }

    fn recompile(&mut self) -> Transition {
        self.stats.compiles += 1;
        tracing::debug!(len = self.grammar.len(), "recompiling grammar");

        let start = Instant::now();
        let compiler = &self.compiler;
        let grammar = self.grammar.as_str();
        let result = panic::catch_unwind(AssertUnwindSafe(|| compiler.compile(grammar)));
        let elapsed = start.elapsed();

        let diagnostic = match result {
            Ok(Ok(parser)) => {
                self.parser = CompiledParser::Ready { parser };
                self.queue.push(Task::Reparse);
                tracing::info!(?elapsed, "grammar compiled");
                return Transition::Compiled { elapsed };
            }
            Ok(Err(diagnostic)) if diagnostic.is_empty() => PANIC_FALLBACK.to_string(),
            Ok(Err(diagnostic)) => diagnostic,
            Err(payload) => panic_message(payload),
        };

        tracing::info!(?elapsed, "grammar failed to compile");
        self.parser = CompiledParser::Failed {
            diagnostic: diagnostic.clone(),
        };
        Transition::CompileFailed(PipelineError::GrammarCompile(diagnostic))
    }

    fn reparse(&mut self) -> Transition {
        let Some(parser) = self.parser.parser() else {
            tracing::debug!("no parser available, reparse skipped");
            return Transition::ReparseSkipped;
        };

        self.stats.reparses += 1;
        let specimen = self.specimen.as_str();
        let parsed = panic::catch_unwind(AssertUnwindSafe(|| parser.parse(specimen)));

        let result = match parsed {
            Ok(Ok(tree)) => serialize(&tree).map_err(PipelineError::from),
            Ok(Err(message)) => Err(PipelineError::SpecimenParse(message)),
            Err(payload) => Err(PipelineError::SpecimenParse(panic_message(payload))),
        };

        match result {
            Ok(tree) => {
                let node_count = tree.node_count();
                tracing::debug!(node_count, "specimen reparsed");
                self.tree = Some(tree);
                self.specimen_error = None;
                Transition::Reparsed { node_count }
            }
            Err(error) => {
                tracing::warn!(%error, "specimen could not be parsed");
                self.specimen_error = Some(error.clone());
                Transition::ReparseFailed(error)
            }
        }
    }

    fn notify(&mut self, transition: Transition) {
        tracing::trace!(subscribers = self.subscribers.len(), ?transition, "notify");
        for subscriber in &mut self.subscribers {
            subscriber(&transition);
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        return (*s).to_string();
    }
    if let Some(s) = payload.downcast_ref::<String>() {
        return s.clone();
    }
    PANIC_FALLBACK.to_string()
}
