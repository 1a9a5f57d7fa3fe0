//! A pipeline bound to a [`StateStore`].

use std::time::{Duration, Instant};

use crate::compiler::GrammarCompiler;
use crate::defaults::{DEFAULT_GRAMMAR, DEFAULT_SPECIMEN};
use crate::persist::{PersistedState, StateStore};
use crate::pipeline::{Command, Pipeline, Transition};

/// Restores the editors on open and saves them after every edit.
pub struct Session<C: GrammarCompiler, S: StateStore> {
    pipeline: Pipeline<C>,
    store: S,
}

impl<C: GrammarCompiler, S: StateStore> Session<C, S> {
    pub fn open(compiler: C, store: S, debounce: Duration) -> Self {
        let state = store.load().unwrap_or_else(|| {
            tracing::debug!("no saved state, using defaults");
            PersistedState::new(DEFAULT_GRAMMAR, DEFAULT_SPECIMEN)
        });

        let pipeline = Pipeline::new(compiler, state.grammar(), state.specimen(), debounce);
        Self { pipeline, store }
    }

    /// Opens on `state` without restoring, overwriting whatever the store held.
    pub fn with_state(compiler: C, store: S, state: PersistedState, debounce: Duration) -> Self {
        let pipeline = Pipeline::new(compiler, state.grammar(), state.specimen(), debounce);
        let mut session = Self { pipeline, store };
        session.save();
        session
    }

    pub fn pipeline(&self) -> &Pipeline<C> {
        &self.pipeline
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn state(&self) -> PersistedState {
        PersistedState::new(self.pipeline.grammar(), self.pipeline.specimen())
    }

    pub fn set_grammar(&mut self, text: impl Into<String>, now: Instant) {
        self.pipeline.set_grammar(text, now);
        self.save();
    }

    pub fn set_specimen(&mut self, text: impl Into<String>, now: Instant) {
        self.pipeline.set_specimen(text, now);
        self.save();
    }

    pub fn dispatch(&mut self, command: Command, now: Instant) {
        self.pipeline.dispatch(command, now);
        self.save();
    }

    pub fn tick(&mut self, now: Instant) -> Vec<Transition> {
        self.pipeline.tick(now)
    }

    fn save(&mut self) {
        let state = self.state();
        if let Err(error) = self.store.save(&state) {
            tracing::warn!(%error, "failed to save state");
        }
    }
}
