use rowan::TextRange;

/// Diagnostic kinds ordered by priority (highest priority first).
///
/// When two diagnostics have overlapping spans, the higher-priority one
/// suppresses the lower-priority one. This prevents cascading error noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // These cause cascading errors throughout the rest of the file
    UnclosedBlock,
    UnclosedGroup,

    // User omitted something required - root cause errors
    ExpectedRuleName,
    ExpectedBody,
    ExpectedMarkerName,

    // User wrote something that doesn't belong
    UnexpectedToken,
    UnknownDeclaration,
    UnknownBuiltin,
    Unsupported,
    InvalidEscape,
    InvalidCharSet,

    // Valid syntax, invalid semantics
    MissingTop,
    DuplicateTop,
    DuplicateDefinition,
    UndefinedReference,
    TokenReferencesRule,
    TokenSyntaxOutsideTokens,
    RecursiveToken,
    InvalidSkip,

    // Observations
    UnusedRule,
}

impl DiagnosticKind {
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::UnusedRule => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Whether this kind suppresses `other` when spans overlap.
    ///
    /// Uses enum discriminant ordering: lower position = higher priority.
    pub fn suppresses(&self, other: &DiagnosticKind) -> bool {
        self < other
    }

    /// Unclosed blocks cause cascading errors but yield to root-cause errors at the same position.
    pub fn is_structural_error(&self) -> bool {
        matches!(self, Self::UnclosedBlock | Self::UnclosedGroup)
    }

    /// User omitted something required.
    pub fn is_root_cause_error(&self) -> bool {
        matches!(
            self,
            Self::ExpectedRuleName | Self::ExpectedBody | Self::ExpectedMarkerName
        )
    }

    /// Base message for this diagnostic kind, used when no custom message is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::UnclosedBlock => "missing closing `}`",
            Self::UnclosedGroup => "missing closing `)`",

            Self::ExpectedRuleName => "expected a rule name",
            Self::ExpectedBody => "expected `{`",
            Self::ExpectedMarkerName => "expected a marker name",

            Self::UnexpectedToken => "unexpected token",
            Self::UnknownDeclaration => "unknown declaration",
            Self::UnknownBuiltin => "unknown builtin",
            Self::Unsupported => "unsupported construct",
            Self::InvalidEscape => "invalid escape sequence",
            Self::InvalidCharSet => "invalid character set",

            Self::MissingTop => "missing `@top` rule",
            Self::DuplicateTop => "multiple `@top` rules",
            Self::DuplicateDefinition => "duplicate definition",
            Self::UndefinedReference => "undefined reference",
            Self::TokenReferencesRule => "token rules can only reference tokens",
            Self::TokenSyntaxOutsideTokens => "token syntax outside `@tokens`",
            Self::RecursiveToken => "recursive token",
            Self::InvalidSkip => "invalid `@skip` expression",

            Self::UnusedRule => "unused rule",
        }
    }

    /// `fallback_message()` without detail, otherwise a kind-specific sentence around it.
    pub fn message(&self, detail: Option<&str>) -> String {
        let Some(d) = detail else {
            return self.fallback_message().to_string();
        };
        match self {
            Self::UnclosedBlock | Self::UnclosedGroup => format!("unclosed {d}"),
            Self::UnknownDeclaration => format!("unknown declaration `{d}`"),
            Self::UnknownBuiltin => format!("unknown builtin `{d}`"),
            Self::Unsupported => format!("{d} are not supported"),
            Self::DuplicateDefinition => format!("`{d}` is already defined"),
            Self::UndefinedReference => format!("`{d}` is not defined"),
            Self::TokenReferencesRule => {
                format!("token rules can only reference tokens, `{d}` is a rule")
            }
            Self::TokenSyntaxOutsideTokens => format!("{d} can only be used in `@tokens`"),
            Self::RecursiveToken => format!("token `{d}` refers to itself"),
            Self::UnusedRule => format!("rule `{d}` is unused"),
            _ => format!("{}: {d}", self.fallback_message()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub(crate) range: TextRange,
    pub(crate) message: String,
}

impl RelatedInfo {
    pub fn new(range: TextRange, message: impl Into<String>) -> Self {
        Self {
            range,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    /// The range shown to the user (underlined in output).
    pub(crate) range: TextRange,
    /// Errors within another error's suppression range may be suppressed.
    /// Defaults to `range`; the parser widens it to the enclosing open block.
    pub(crate) suppression_range: TextRange,
    pub(crate) message: String,
    pub(crate) related: Vec<RelatedInfo>,
}

impl DiagnosticMessage {
    pub(crate) fn new(kind: DiagnosticKind, range: TextRange, message: impl Into<String>) -> Self {
        Self {
            kind,
            range,
            suppression_range: range,
            message: message.into(),
            related: Vec::new(),
        }
    }

    pub(crate) fn with_default_message(kind: DiagnosticKind, range: TextRange) -> Self {
        Self::new(kind, range, kind.fallback_message())
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.kind.default_severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }

    /// Whether `other` is a cascade of this diagnostic and should be hidden.
    ///
    /// A higher-priority kind hides anything strictly inside its suppression
    /// range. At the same start offset, a root cause hides a structural error,
    /// never the other way around.
    pub(crate) fn shadows(&self, other: &DiagnosticMessage) -> bool {
        let (mine, theirs) = (self.kind, other.kind);
        let inside = self.suppression_range.start() < other.range.start()
            && other.range.end() <= self.suppression_range.end();
        if inside && mine.suppresses(&theirs) {
            return true;
        }
        if self.range.start() != other.range.start() {
            return false;
        }
        if mine.is_structural_error() && theirs.is_root_cause_error() {
            return false;
        }
        (mine.is_root_cause_error() && theirs.is_structural_error()) || mine.suppresses(&theirs)
    }
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}..{}: {}",
            self.severity(),
            u32::from(self.range.start()),
            u32::from(self.range.end()),
            self.message
        )?;
        for related in &self.related {
            write!(
                f,
                " (related: {} at {}..{})",
                related.message,
                u32::from(related.range.start()),
                u32::from(related.range.end())
            )?;
        }
        Ok(())
    }
}
