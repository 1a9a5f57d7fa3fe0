//! ANSI palette for tree and JSON output.

/// One escape sequence per role; all empty when color is off.
#[derive(Clone, Copy, Debug)]
pub struct Colors {
    /// Node names and JSON keys.
    pub name: &'static str,
    /// Source slices and JSON strings.
    pub text: &'static str,
    /// `⚠` nodes.
    pub error: &'static str,
    /// Spans and punctuation.
    pub muted: &'static str,
    pub reset: &'static str,
}

impl Default for Colors {
    fn default() -> Self {
        Self::OFF
    }
}

impl Colors {
    pub const ON: Self = Self {
        name: "\x1b[34m",
        text: "\x1b[32m",
        error: "\x1b[31m",
        muted: "\x1b[2m",
        reset: "\x1b[0m",
    };

    pub const OFF: Self = Self {
        name: "",
        text: "",
        error: "",
        muted: "",
        reset: "",
    };

    pub fn new(enabled: bool) -> Self {
        if enabled { Self::ON } else { Self::OFF }
    }
}
