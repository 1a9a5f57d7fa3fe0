use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use lezer_playground_pipeline::{
    FileStore, LezerCompiler, MemoryStore, PersistedState, Pipeline, PlaygroundConfig, Session,
    StateStore, Status, Transition,
};

use super::input::{InputError, fail, read_path};

pub struct WatchArgs {
    pub grammar_path: PathBuf,
    pub specimen_path: PathBuf,
    pub state: Option<PathBuf>,
    pub interval_ms: u64,
    pub color: bool,
}

pub fn run(args: WatchArgs, config: &PlaygroundConfig) {
    match args.state.clone() {
        Some(path) => watch(&args, config, FileStore::new(path)),
        None => watch(&args, config, MemoryStore::new()),
    }
}

fn watch<S: StateStore>(args: &WatchArgs, config: &PlaygroundConfig, store: S) {
    let mut watcher = Watcher::open(
        args.grammar_path.clone(),
        args.specimen_path.clone(),
        config,
        store,
    )
    .unwrap_or_else(|e| fail(e));

    print_state(watcher.pipeline(), args.color);

    let interval = Duration::from_millis(args.interval_ms);
    loop {
        thread::sleep(interval);
        let transitions = match watcher.poll(Instant::now()) {
            Ok(transitions) => transitions,
            Err(error) => {
                tracing::warn!(%error, "skipping poll");
                continue;
            }
        };

        for transition in &transitions {
            eprintln!("{}", describe(transition));
        }
        if transitions
            .iter()
            .any(|t| matches!(t, Transition::Reparsed { .. } | Transition::CompileFailed(_)))
        {
            print_state(watcher.pipeline(), args.color);
        }
    }
}

/// Feeds file contents into a [`Session`] whenever they change.
pub struct Watcher<S: StateStore> {
    session: Session<LezerCompiler, S>,
    grammar_path: PathBuf,
    specimen_path: PathBuf,
}

impl<S: StateStore> Watcher<S> {
    /// Starts from the files' current contents, compiled right away.
    ///
    /// The files always win over `store`: it is written, never restored from.
    pub fn open(
        grammar_path: PathBuf,
        specimen_path: PathBuf,
        config: &PlaygroundConfig,
        store: S,
    ) -> Result<Self, InputError> {
        let state = PersistedState::new(read_path(&grammar_path)?, read_path(&specimen_path)?);
        let session = Session::with_state(config.compiler(), store, state, config.debounce());
        Ok(Self {
            session,
            grammar_path,
            specimen_path,
        })
    }

    pub fn pipeline(&self) -> &Pipeline<LezerCompiler> {
        self.session.pipeline()
    }

    /// Picks up file changes, then runs whatever is due at `now`.
    ///
    /// Edits come first in the returned transitions, followed by the work they
    /// or earlier edits made due.
    pub fn poll(&mut self, now: Instant) -> Result<Vec<Transition>, InputError> {
        let mut transitions = self.load_files(now)?;
        transitions.extend(self.session.tick(now));
        Ok(transitions)
    }

    fn load_files(&mut self, now: Instant) -> Result<Vec<Transition>, InputError> {
        let grammar = read_path(&self.grammar_path)?;
        let specimen = read_path(&self.specimen_path)?;
        let mut edits = Vec::new();

        if grammar != self.session.pipeline().grammar() {
            self.session.set_grammar(grammar, now);
            edits.push(Transition::GrammarEdited);
        }
        if specimen != self.session.pipeline().specimen() {
            self.session.set_specimen(specimen, now);
            edits.push(Transition::SpecimenEdited);
        }
        Ok(edits)
    }
}

pub fn describe(transition: &Transition) -> String {
    match transition {
        Transition::GrammarEdited => "grammar changed".to_string(),
        Transition::SpecimenEdited => "specimen changed".to_string(),
        Transition::Compiled { elapsed } => format!("compiled in {elapsed:.1?}"),
        Transition::CompileFailed(_) => "grammar failed to compile".to_string(),
        Transition::Reparsed { node_count } => format!("parsed ({node_count} nodes)"),
        Transition::ReparseFailed(error) => format!("parse failed: {error}"),
        Transition::ReparseSkipped => "parse skipped: no parser".to_string(),
    }
}

fn print_state(pipeline: &Pipeline<LezerCompiler>, color: bool) {
    if let Status::Failed(diagnostic) = pipeline.status() {
        eprint!("{diagnostic}");
    }
    if let Some(tree) = pipeline.tree() {
        print!(
            "{}",
            tree.printer()
                .source(pipeline.specimen())
                .colored(color)
                .dump()
        );
    }
}
