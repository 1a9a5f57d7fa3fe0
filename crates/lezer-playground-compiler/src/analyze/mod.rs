//! Semantic analysis: symbol collection and validation.
//!
//! Runs after parsing on a tree that may contain errors. Every check reports
//! through [`Diagnostics`]; nothing here aborts.


use indexmap::{IndexMap, IndexSet};
use rowan::TextRange;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::parser::{Body, Expr, Item, Root};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionKind {
    Rule,
    Token,
}

/// A named rule or token rule.
#[derive(Debug, Clone)]
pub struct Definition {
    pub kind: DefinitionKind,
    pub is_top: bool,
    pub name_range: TextRange,
    pub body: Option<Body>,
}

/// Declarations of a grammar, in source order.
#[derive(Debug, Clone, Default)]
pub struct Symbols {
    pub top: Option<String>,
    pub definitions: IndexMap<String, Definition>,
    /// `@precedence` entries of the `@tokens` block, highest first.
    pub token_precedence: Vec<Expr>,
    /// Bodies of `@skip` declarations.
    pub skip: Vec<Expr>,
}

impl Symbols {
    pub fn get(&self, name: &str) -> Option<&Definition> {
        self.definitions.get(name)
    }

    pub fn rules(&self) -> impl Iterator<Item = (&str, &Definition)> {
        self.definitions
            .iter()
            .filter(|(_, d)| d.kind == DefinitionKind::Rule)
            .map(|(n, d)| (n.as_str(), d))
    }

    pub fn tokens(&self) -> impl Iterator<Item = (&str, &Definition)> {
        self.definitions
            .iter()
            .filter(|(_, d)| d.kind == DefinitionKind::Token)
            .map(|(n, d)| (n.as_str(), d))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Rule,
    Token,
}

pub fn analyze(root: &Root) -> (Symbols, Diagnostics) {
    let mut analyzer = Analyzer::default();
    analyzer.collect(root);
    analyzer.check_bodies();
    analyzer.check_recursive_tokens();
    analyzer.check_unused_rules();
    (analyzer.symbols, analyzer.diagnostics)
}

#[derive(Default)]
struct Analyzer {
    symbols: Symbols,
    diagnostics: Diagnostics,
    /// Token name → token names referenced by its body.
    token_refs: IndexMap<String, Vec<String>>,
    /// Rule name → rule names referenced by its body.
    rule_refs: IndexMap<String, Vec<String>>,
    skip_rule_refs: Vec<String>,
}

impl Analyzer {
    fn collect(&mut self, root: &Root) {
        let mut top_count = 0;

        for item in root.items() {
            match item {
                Item::Top(top) => {
                    top_count += 1;
                    let Some(name) = top.name() else { continue };
                    if top_count > 1 {
                        self.diagnostics
                            .report(DiagnosticKind::DuplicateTop, name.text_range())
                            .emit();
                        continue;
                    }
                    self.symbols.top = Some(name.text().to_string());
                    self.define(
                        name.text(),
                        name.text_range(),
                        top.body(),
                        DefinitionKind::Rule,
                        true,
                    );
                }
                Item::Rule(rule) => {
                    let Some(name) = rule.name() else { continue };
                    self.define(
                        name.text(),
                        name.text_range(),
                        rule.body(),
                        DefinitionKind::Rule,
                        false,
                    );
                }
                Item::Tokens(block) => {
                    for rule in block.rules() {
                        let Some(name) = rule.name() else { continue };
                        self.define(
                            name.text(),
                            name.text_range(),
                            rule.body(),
                            DefinitionKind::Token,
                            false,
                        );
                    }
                    for precedence in block.precedences() {
                        self.symbols.token_precedence.extend(precedence.entries());
                    }
                }
                Item::Skip(skip) => {
                    if let Some(expr) = skip.body().and_then(|b| b.expr()) {
                        self.symbols.skip.push(expr);
                    }
                }
                Item::Precedence(_) | Item::Directive(_) | Item::Unsupported(_) => {}
            }
        }

        if top_count == 0 {
            self.diagnostics
                .report(DiagnosticKind::MissingTop, TextRange::empty(0.into()))
                .emit();
        }
    }

    fn define(
        &mut self,
        name: &str,
        name_range: TextRange,
        body: Option<Body>,
        kind: DefinitionKind,
        is_top: bool,
    ) {
        if let Some(existing) = self.symbols.definitions.get(name) {
            let first = existing.name_range;
            self.diagnostics
                .report(DiagnosticKind::DuplicateDefinition, name_range)
                .message(name)
                .related_to("first defined here", first)
                .emit();
            return;
        }
        self.symbols.definitions.insert(
            name.to_string(),
            Definition {
                kind,
                is_top,
                name_range,
                body,
            },
        );
    }

    fn check_bodies(&mut self) {
        let definitions: Vec<(String, Definition)> = self
            .symbols
            .definitions
            .iter()
            .map(|(n, d)| (n.clone(), d.clone()))
            .collect();

        for (name, definition) in &definitions {
            let Some(expr) = definition.body.as_ref().and_then(|b| b.expr()) else {
                continue;
            };
            let context = match definition.kind {
                DefinitionKind::Rule => Context::Rule,
                DefinitionKind::Token => Context::Token,
            };
            let mut refs = Vec::new();
            self.check_expr(&expr, context, &mut refs);
            match definition.kind {
                DefinitionKind::Rule => self.rule_refs.insert(name.clone(), refs),
                DefinitionKind::Token => self.token_refs.insert(name.clone(), refs),
            };
        }

        for expr in self.symbols.skip.clone() {
            let mut refs = Vec::new();
            self.check_expr(&expr, Context::Rule, &mut refs);
            self.skip_rule_refs.extend(refs);
            self.check_skip(&expr);
        }

        for entry in self.symbols.token_precedence.clone() {
            self.check_expr(&entry, Context::Token, &mut Vec::new());
        }
    }

    /// Validates `expr` and pushes the names it references (rules in rule
    /// context, tokens in token context) into `refs`.
    fn check_expr(&mut self, expr: &Expr, context: Context, refs: &mut Vec<String>) {
        match expr {
            Expr::Choice(choice) => {
                for alt in choice.alternatives() {
                    self.check_expr(&alt, context, refs);
                }
            }
            Expr::Seq(seq) => {
                for item in seq.items() {
                    self.check_expr(&item, context, refs);
                }
            }
            Expr::Repeat(repeat) => {
                if let Some(inner) = repeat.inner() {
                    self.check_expr(&inner, context, refs);
                }
            }
            Expr::Group(group) => {
                if let Some(inner) = group.inner() {
                    self.check_expr(&inner, context, refs);
                }
            }
            Expr::Ref(r) => {
                let Some(name) = r.name() else { return };
                let text = name.text();
                let Some(definition) = self.symbols.get(text) else {
                    self.diagnostics
                        .report(DiagnosticKind::UndefinedReference, name.text_range())
                        .message(text)
                        .emit();
                    return;
                };
                match (context, definition.kind) {
                    (Context::Token, DefinitionKind::Rule) => {
                        self.diagnostics
                            .report(DiagnosticKind::TokenReferencesRule, name.text_range())
                            .message(text)
                            .emit();
                    }
                    (Context::Token, DefinitionKind::Token)
                    | (Context::Rule, DefinitionKind::Rule) => refs.push(text.to_string()),
                    (Context::Rule, DefinitionKind::Token) => {}
                }
            }
            Expr::Literal(literal) => {
                if literal.value().is_none() {
                    self.diagnostics
                        .report(DiagnosticKind::InvalidEscape, literal.as_cst().text_range())
                        .emit();
                }
            }
            Expr::CharSet(set) => {
                let range = set.as_cst().text_range();
                if context == Context::Rule {
                    self.report_token_syntax(range, "character sets");
                    return;
                }
                match set.ranges() {
                    None => {
                        self.diagnostics
                            .report(DiagnosticKind::InvalidCharSet, range)
                            .emit();
                    }
                    Some(ranges) if ranges.is_empty() && !set.is_negated() => {
                        self.diagnostics
                            .report(DiagnosticKind::InvalidCharSet, range)
                            .message("the set is empty")
                            .emit();
                    }
                    Some(_) => {}
                }
            }
            Expr::AnyChar(any) => {
                if context == Context::Rule {
                    self.report_token_syntax(any.as_cst().text_range(), "`_`");
                }
            }
            Expr::Builtin(builtin) => {
                if context == Context::Rule
                    && let Some(name) = builtin.name()
                {
                    self.report_token_syntax(name.text_range(), &format!("`{}`", name.text()));
                }
            }
            Expr::Marker(_) | Expr::Unsupported(_) => {}
        }
    }

    fn report_token_syntax(&mut self, range: TextRange, what: &str) {
        self.diagnostics
            .report(DiagnosticKind::TokenSyntaxOutsideTokens, range)
            .message(what)
            .emit();
    }

    /// `@skip` accepts a choice of tokens and literals.
    fn check_skip(&mut self, expr: &Expr) {
        match expr {
            Expr::Choice(choice) => {
                for alt in choice.alternatives() {
                    self.check_skip(&alt);
                }
            }
            Expr::Group(group) => {
                if let Some(inner) = group.inner() {
                    self.check_skip(&inner);
                }
            }
            Expr::Literal(_) => {}
            Expr::Ref(r) => {
                let Some(name) = r.name() else { return };
                if let Some(definition) = self.symbols.get(name.text())
                    && definition.kind == DefinitionKind::Rule
                {
                    self.diagnostics
                        .report(DiagnosticKind::InvalidSkip, name.text_range())
                        .message(format!("`{}` is not a token", name.text()))
                        .emit();
                }
            }
            other => {
                self.diagnostics
                    .report(DiagnosticKind::InvalidSkip, other.as_cst().text_range())
                    .message("expected tokens separated by `|`")
                    .emit();
            }
        }
    }

    fn check_recursive_tokens(&mut self) {
        let mut done: IndexSet<String> = IndexSet::new();
        let mut reported: IndexSet<String> = IndexSet::new();

        for start in self.token_refs.keys() {
            if done.contains(start) {
                continue;
            }
            // Iterative DFS: (token, next edge index)
            let mut stack: Vec<(&str, usize)> = vec![(start.as_str(), 0)];
            let mut on_path: IndexSet<&str> = IndexSet::new();
            on_path.insert(start.as_str());

            while let Some(&(name, edge)) = stack.last() {
                let edges = self.token_refs.get(name).map_or(&[][..], |e| e.as_slice());
                let Some(target) = edges.get(edge) else {
                    stack.pop();
                    on_path.shift_remove(name);
                    done.insert(name.to_string());
                    continue;
                };
                if let Some(top) = stack.last_mut() {
                    top.1 += 1;
                }
                if on_path.contains(target.as_str()) {
                    reported.insert(target.clone());
                } else if !done.contains(target) {
                    on_path.insert(target.as_str());
                    stack.push((target.as_str(), 0));
                }
            }
        }

        for name in reported {
            if let Some(definition) = self.symbols.get(&name) {
                self.diagnostics
                    .report(DiagnosticKind::RecursiveToken, definition.name_range)
                    .message(&name)
                    .emit();
            }
        }
    }

    fn check_unused_rules(&mut self) {
        let Some(top) = self.symbols.top.clone() else {
            return;
        };

        let mut reachable: IndexSet<String> = IndexSet::new();
        let mut queue: Vec<String> = vec![top];
        queue.extend(self.skip_rule_refs.iter().cloned());

        while let Some(name) = queue.pop() {
            if !reachable.insert(name.clone()) {
                continue;
            }
            if let Some(refs) = self.rule_refs.get(&name) {
                queue.extend(refs.iter().cloned());
            }
        }

        let unused: Vec<(String, TextRange)> = self
            .symbols
            .rules()
            .filter(|(name, _)| !reachable.contains(*name))
            .map(|(name, d)| (name.to_string(), d.name_range))
            .collect();
        for (name, range) in unused {
            self.diagnostics
                .report(DiagnosticKind::UnusedRule, range)
                .message(&name)
                .emit();
        }
    }
}
