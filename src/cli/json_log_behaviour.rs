use std::path::PathBuf;

/// Where, if anywhere, JSON-formatted logs are written
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum JsonLogBehaviour {
    /// Human-readable stderr logging only
    #[default]
    None,
    /// Also write JSON lines to this file
    File(PathBuf),
}

impl JsonLogBehaviour {
    #[must_use]
    pub fn file(&self) -> Option<&PathBuf> {
        match self {
            JsonLogBehaviour::None => None,
            JsonLogBehaviour::File(path) => Some(path),
        }
    }
}
