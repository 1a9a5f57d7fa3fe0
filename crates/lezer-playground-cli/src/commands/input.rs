use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("cannot use both {flag} and positional {name}")]
    Conflict { flag: &'static str, name: &'static str },

    #[error("{name} required (positional or {flag})")]
    Missing { flag: &'static str, name: &'static str },

    #[error("failed to read '{}': {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to read stdin: {0}")]
    Stdin(#[source] io::Error),
}

/// Which of the two editors an input feeds.
#[derive(Debug, Clone, Copy)]
pub enum Editor {
    Grammar,
    Specimen,
}

impl Editor {
    fn flag(self) -> &'static str {
        match self {
            Editor::Grammar => "-g/--grammar",
            Editor::Specimen => "-s/--specimen",
        }
    }

    fn name(self) -> &'static str {
        match self {
            Editor::Grammar => "GRAMMAR",
            Editor::Specimen => "SPECIMEN",
        }
    }
}

/// Inline text or the contents of `path` (`-` reads stdin).
pub fn load(editor: Editor, path: Option<&Path>, text: Option<&str>) -> Result<String, InputError> {
    load_optional(editor, path, text)?.ok_or(InputError::Missing {
        flag: editor.flag(),
        name: editor.name(),
    })
}

/// Like [`load`], but `Ok(None)` when neither was given.
pub fn load_optional(
    editor: Editor,
    path: Option<&Path>,
    text: Option<&str>,
) -> Result<Option<String>, InputError> {
    match (text, path) {
        (Some(_), Some(_)) => Err(InputError::Conflict {
            flag: editor.flag(),
            name: editor.name(),
        }),
        (Some(text), None) => Ok(Some(text.to_string())),
        (None, Some(path)) => read_path(path).map(Some),
        (None, None) => Ok(None),
    }
}

pub fn read_path(path: &Path) -> Result<String, InputError> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(InputError::Stdin)?;
        return Ok(buf);
    }
    fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Prints `error: ...` and exits with status 1.
pub fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("error: {message}");
    std::process::exit(1);
}
