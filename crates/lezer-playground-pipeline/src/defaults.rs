//! Content shown when nothing was restored.

pub const DEFAULT_GRAMMAR: &str = r#"@top Program { expression }

expression { Name | Number | BinaryExpression }

BinaryExpression { "(" expression Operator expression ")" }

@tokens {
  Name { @asciiLetter+ }
  Number { @digit+ }
  Operator { $[+-] }
}

@detectDelim
"#;

pub const DEFAULT_SPECIMEN: &str = "(100-(foo+4))";
