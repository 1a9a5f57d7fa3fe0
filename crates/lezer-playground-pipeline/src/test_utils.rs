//! Scriptable compiler for pipeline tests.
//!
//! Grammar text drives the outcome:
//! - `error: <msg>` fails with `<msg>`
//! - `panic: <msg>` panics with a formatted message
//! - `panic-silent` panics with a non-string payload
//! - anything else compiles to a parser whose root node is named after the grammar
//!
//! The parser turns each whitespace-separated word into a `Word` child. The
//! specimen `fail` makes it return an error, `unbalanced` yields a broken tree.

use std::cell::Cell;
use std::rc::Rc;

use crate::compiler::{GrammarCompiler, SpecimenParser, Traverse, TraverseEvent};

#[derive(Debug, Clone, Default)]
pub(crate) struct MockCompiler {
    calls: Rc<Cell<usize>>,
    parses: Rc<Cell<usize>>,
}

impl MockCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared counter of `compile` calls.
    pub fn calls(&self) -> Rc<Cell<usize>> {
        self.calls.clone()
    }

    /// Shared counter of `parse` calls.
    pub fn parses(&self) -> Rc<Cell<usize>> {
        self.parses.clone()
    }
}

impl GrammarCompiler for MockCompiler {
    type Parser = MockParser;

    fn compile(&self, grammar: &str) -> Result<MockParser, String> {
        self.calls.set(self.calls.get() + 1);

        if let Some(message) = grammar.strip_prefix("error: ") {
            return Err(message.to_string());
        }
        if let Some(message) = grammar.strip_prefix("panic: ") {
            panic!("{message}");
        }
        if grammar == "panic-silent" {
            std::panic::panic_any(42_u32);
        }

        Ok(MockParser {
            root: grammar.to_string(),
            parses: self.parses.clone(),
        })
    }
}

#[derive(Debug)]
pub(crate) struct MockParser {
    root: String,
    parses: Rc<Cell<usize>>,
}

impl SpecimenParser for MockParser {
    type Tree = MockTree;

    fn parse(&self, specimen: &str) -> Result<MockTree, String> {
        self.parses.set(self.parses.get() + 1);

        match specimen {
            "fail" => return Err("execution limit exceeded".to_string()),
            "unbalanced" => return Ok(MockTree(vec![Event::Leave])),
            _ => {}
        }

        let mut events = vec![Event::Enter(self.root.clone(), 0, specimen.len())];
        let mut offset = 0;
        for word in specimen.split_whitespace() {
            let from = offset + specimen[offset..].find(word).unwrap_or(0);
            let to = from + word.len();
            events.push(Event::Enter("Word".to_string(), from, to));
            events.push(Event::Leave);
            offset = to;
        }
        events.push(Event::Leave);
        Ok(MockTree(events))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    Enter(String, usize, usize),
    Leave,
}

/// Replays a fixed event list.
#[derive(Debug, Clone)]
pub(crate) struct MockTree(pub Vec<Event>);

impl Traverse for MockTree {
    fn traverse(&self, sink: &mut dyn FnMut(TraverseEvent<'_>)) {
        for event in &self.0 {
            match event {
                Event::Enter(name, from, to) => sink(TraverseEvent::Enter {
                    name,
                    from: *from,
                    to: *to,
                }),
                Event::Leave => sink(TraverseEvent::Leave),
            }
        }
    }
}
