//! Saving and restoring the two editors.
//!
//! Shared links carry the state in the URL fragment: JSON, brotli-compressed,
//! then base64 (URL-safe alphabet, no padding). Stores keep plain JSON.
//! Anything that does not decode to the persisted shape counts as "nothing
//! saved".

use std::collections::HashMap;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

/// Key the state is stored under.
pub const STORAGE_KEY: &str = "lezer-playground-state";

/// Largest decompressed state a fragment may expand to.
pub const MAX_STATE_BYTES: u64 = 1 << 20;

const BROTLI_BUFFER: usize = 4096;
const BROTLI_QUALITY: u32 = 11;
const BROTLI_WINDOW: u32 = 22;

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("invalid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("invalid compressed data: {0}")]
    Decompress(#[source] io::Error),

    #[error("invalid state: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot access {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    pub editors: Editors,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Editors {
    pub grammar: EditorState,
    pub specimen: EditorState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorState {
    pub code: String,
}

impl PersistedState {
    pub fn new(grammar: impl Into<String>, specimen: impl Into<String>) -> Self {
        Self {
            editors: Editors {
                grammar: EditorState {
                    code: grammar.into(),
                },
                specimen: EditorState {
                    code: specimen.into(),
                },
            },
        }
    }

    pub fn grammar(&self) -> &str {
        &self.editors.grammar.code
    }

    pub fn specimen(&self) -> &str {
        &self.editors.specimen.code
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("state always serializes")
    }

    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Compact URL fragment, without the leading `#`.
    pub fn to_fragment(&self) -> String {
        let mut compressed = Vec::new();
        {
            let mut writer = brotli::CompressorWriter::new(
                &mut compressed,
                BROTLI_BUFFER,
                BROTLI_QUALITY,
                BROTLI_WINDOW,
            );
            writer
                .write_all(self.to_json().as_bytes())
                .expect("Vec write never fails");
        }
        URL_SAFE_NO_PAD.encode(compressed)
    }

    /// Accepts a bare fragment, `#fragment`, or a full URL.
    pub fn from_fragment(input: &str) -> Result<Self, PersistError> {
        let fragment = match input.rfind('#') {
            Some(i) => &input[i + 1..],
            None => input,
        };

        let compressed = URL_SAFE_NO_PAD.decode(fragment.trim())?;
        let mut json = Vec::new();
        brotli::Decompressor::new(compressed.as_slice(), BROTLI_BUFFER)
            .take(MAX_STATE_BYTES + 1)
            .read_to_end(&mut json)
            .map_err(PersistError::Decompress)?;
        if json.len() as u64 > MAX_STATE_BYTES {
            return Err(PersistError::Decompress(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("state expands past {MAX_STATE_BYTES} bytes"),
            )));
        }

        Ok(serde_json::from_slice(&json)?)
    }

    /// `base#fragment`.
    pub fn share_url(&self, base: &str) -> String {
        let base = base.split('#').next().unwrap_or(base);
        format!("{base}#{}", self.to_fragment())
    }
}

pub trait StateStore {
    fn save(&mut self, state: &PersistedState) -> Result<(), PersistError>;

    /// `None` when nothing usable was saved.
    fn load(&self) -> Option<PersistedState>;
}

/// Key-value store held in memory, like browser local storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value under [`STORAGE_KEY`].
    pub fn raw(&self) -> Option<&str> {
        self.entries.get(STORAGE_KEY).map(String::as_str)
    }

    pub fn set_raw(&mut self, value: impl Into<String>) {
        self.entries.insert(STORAGE_KEY.to_string(), value.into());
    }
}

impl StateStore for MemoryStore {
    fn save(&mut self, state: &PersistedState) -> Result<(), PersistError> {
        self.set_raw(state.to_json());
        Ok(())
    }

    fn load(&self) -> Option<PersistedState> {
        let raw = self.raw()?;
        PersistedState::from_json(raw)
            .inspect_err(|error| tracing::debug!(%error, "discarding stored state"))
            .ok()
    }
}

/// JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> PersistError {
        PersistError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl StateStore for FileStore {
    fn save(&mut self, state: &PersistedState) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        std::fs::write(&self.path, state.to_json()).map_err(|e| self.io_error(e))
    }

    fn load(&self) -> Option<PersistedState> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::debug!(error = %self.io_error(e), "cannot read stored state");
                return None;
            }
        };
        PersistedState::from_json(&raw)
            .inspect_err(|error| {
                tracing::debug!(%error, path = %self.path.display(), "discarding stored state")
            })
            .ok()
    }
}
