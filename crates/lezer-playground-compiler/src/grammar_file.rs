//! Staged compilation of one grammar source: parse, analyze, lower.

use std::fmt::Write;
use std::sync::Arc;

use lezer_playground_runtime::Grammar;

use crate::analyze::{Symbols, analyze};
use crate::diagnostics::Diagnostics;
use crate::parser::{self, Parse, Parser, Root, SyntaxNode, lexer::lex};
use crate::{Error, lower};

pub const DEFAULT_EXEC_FUEL: u32 = 1_000_000;
pub const DEFAULT_RECURSION_FUEL: u32 = 4096;

pub struct GrammarFileBuilder<'src> {
    source: &'src str,
    exec_fuel: Option<u32>,
    recursion_fuel: Option<u32>,
}

impl<'src> GrammarFileBuilder<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            exec_fuel: Some(DEFAULT_EXEC_FUEL),
            recursion_fuel: Some(DEFAULT_RECURSION_FUEL),
        }
    }

    /// `None` disables the limit.
    pub fn with_exec_fuel(mut self, limit: Option<u32>) -> Self {
        self.exec_fuel = limit;
        self
    }

    pub fn with_recursion_fuel(mut self, limit: Option<u32>) -> Self {
        self.recursion_fuel = limit;
        self
    }

    pub fn parse(self) -> crate::Result<GrammarParsed<'src>> {
        let parser = Parser::new(self.source, lex(self.source))
            .with_exec_fuel(self.exec_fuel)
            .with_recursion_fuel(self.recursion_fuel);
        let (parse, diag) = parser::parse_with_parser(parser)?;

        tracing::trace!(diagnostics = diag.len(), "parsed grammar");

        Ok(GrammarParsed {
            source: self.source,
            parse,
            diag,
        })
    }
}

#[derive(Debug)]
pub struct GrammarParsed<'src> {
    source: &'src str,
    parse: Parse,
    diag: Diagnostics,
}

impl<'src> GrammarParsed<'src> {
    pub fn analyze(mut self) -> GrammarFile<'src> {
        let root = self.parse.root();
        let (symbols, diag) = analyze(&root);
        self.diag.extend(diag);

        GrammarFile {
            source: self.source,
            parse: self.parse,
            root,
            symbols,
            diag: self.diag,
        }
    }

    pub fn diagnostics(&self) -> Diagnostics {
        self.diag.clone()
    }
}

/// A parsed and analyzed grammar, ready to be compiled.
#[derive(Debug)]
pub struct GrammarFile<'src> {
    source: &'src str,
    parse: Parse,
    root: Root,
    symbols: Symbols,
    diag: Diagnostics,
}

/// Output of [`GrammarFile::compile`].
#[derive(Debug, Clone)]
pub struct Compiled {
    pub grammar: Arc<Grammar>,
    /// Warnings collected on the way.
    pub diagnostics: Diagnostics,
}

impl<'src> GrammarFile<'src> {
    pub fn source(&self) -> &'src str {
        self.source
    }

    pub fn syntax(&self) -> SyntaxNode {
        self.parse.syntax()
    }

    pub fn root(&self) -> &Root {
        &self.root
    }

    pub fn symbols(&self) -> &Symbols {
        &self.symbols
    }

    /// Diagnostics with cascading errors suppressed.
    pub fn diagnostics(&self) -> Diagnostics {
        self.diag.filtered()
    }

    pub fn diagnostics_raw(&self) -> Diagnostics {
        self.diag.clone()
    }

    pub fn is_valid(&self) -> bool {
        !self.diag.has_errors()
    }

    /// Lowers the grammar into runtime tables.
    ///
    /// Fails with [`Error::GrammarInvalid`] when any error diagnostic was reported.
    pub fn compile(&self) -> crate::Result<Compiled> {
        if !self.is_valid() {
            return Err(Error::GrammarInvalid(self.diagnostics()));
        }

        let grammar = lower::lower(&self.symbols)?;
        tracing::debug!(
            tokens = grammar.tokens().len(),
            nonterminals = grammar.nonterminals().len(),
            productions = grammar.productions().len(),
            "compiled grammar"
        );

        Ok(Compiled {
            grammar: Arc::new(grammar),
            diagnostics: self.diagnostics(),
        })
    }

    /// Indented CST listing; `trivia` includes whitespace and comments.
    pub fn dump_cst(&self, trivia: bool) -> String {
        let mut out = String::new();
        format_cst(&self.syntax(), 0, trivia, &mut out).expect("String write never fails");
        out
    }
}

impl<'src> TryFrom<&'src str> for GrammarFile<'src> {
    type Error = Error;

    fn try_from(source: &'src str) -> crate::Result<Self> {
        Ok(GrammarFileBuilder::new(source).parse()?.analyze())
    }
}

fn format_cst(node: &SyntaxNode, depth: usize, trivia: bool, w: &mut impl Write) -> std::fmt::Result {
    let indent = "  ".repeat(depth);
    writeln!(w, "{indent}{:?}", node.kind())?;

    for child in node.children_with_tokens() {
        match child {
            rowan::NodeOrToken::Node(n) => format_cst(&n, depth + 1, trivia, w)?,
            rowan::NodeOrToken::Token(t) => {
                if !trivia && t.kind().is_trivia() {
                    continue;
                }
                writeln!(w, "{indent}  {:?} {:?}", t.kind(), t.text())?;
            }
        }
    }
    Ok(())
}
