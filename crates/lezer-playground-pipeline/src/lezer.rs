//! [`GrammarCompiler`] backed by the workspace's own Lezer compiler and runtime.

use lezer_playground_compiler::grammar_file::{DEFAULT_EXEC_FUEL, DEFAULT_RECURSION_FUEL};
use lezer_playground_compiler::{Error, GrammarFileBuilder};
use lezer_playground_runtime::{FuelLimits, HighlightSpan, NodeRef, Parser, Tree, Visitor};

use crate::compiler::{GrammarCompiler, SpecimenParser, Traverse, TraverseEvent};

#[derive(Debug, Clone)]
pub struct LezerCompiler {
    exec_fuel: Option<u32>,
    recursion_fuel: Option<u32>,
    parse_limits: FuelLimits,
}

impl Default for LezerCompiler {
    fn default() -> Self {
        Self {
            exec_fuel: Some(DEFAULT_EXEC_FUEL),
            recursion_fuel: Some(DEFAULT_RECURSION_FUEL),
            parse_limits: FuelLimits::default(),
        }
    }
}

impl LezerCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fuel for the grammar parser; `None` disables a limit.
    pub fn with_compile_fuel(mut self, exec: Option<u32>, recursion: Option<u32>) -> Self {
        self.exec_fuel = exec;
        self.recursion_fuel = recursion;
        self
    }

    pub fn with_parse_limits(mut self, limits: FuelLimits) -> Self {
        self.parse_limits = limits;
        self
    }
}

impl GrammarCompiler for LezerCompiler {
    type Parser = Parser;

    fn compile(&self, grammar: &str) -> Result<Parser, String> {
        let file = GrammarFileBuilder::new(grammar)
            .with_exec_fuel(self.exec_fuel)
            .with_recursion_fuel(self.recursion_fuel)
            .parse()
            .map_err(|e| e.to_string())?
            .analyze();
        match file.compile() {
            Ok(compiled) => Ok(Parser::new(compiled.grammar).with_limits(self.parse_limits)),
            Err(Error::GrammarInvalid(diagnostics)) => Err(diagnostics.render(grammar)),
            Err(e) => Err(e.to_string()),
        }
    }
}

impl SpecimenParser for Parser {
    type Tree = Tree;

    fn parse(&self, specimen: &str) -> Result<Tree, String> {
        Parser::parse(self, specimen).map_err(|e| e.to_string())
    }

    fn highlight(&self, specimen: &str) -> Vec<HighlightSpan> {
        Parser::highlight(self, specimen)
    }
}

impl Traverse for Tree {
    fn traverse(&self, sink: &mut dyn FnMut(TraverseEvent<'_>)) {
        struct Events<'s> {
            sink: &'s mut dyn FnMut(TraverseEvent<'_>),
        }

        impl Visitor for Events<'_> {
            fn enter(&mut self, node: NodeRef<'_>) {
                (self.sink)(TraverseEvent::Enter {
                    name: node.name(),
                    from: node.from(),
                    to: node.to(),
                });
            }

            fn leave(&mut self, _node: NodeRef<'_>) {
                (self.sink)(TraverseEvent::Leave);
            }
        }

        self.iterate(&mut Events { sink });
    }
}
