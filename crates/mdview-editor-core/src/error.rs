//! Error types for editor operations.
//!
//! None of these are fatal: each is confined to the operation that raised it
//! and leaves the document and history untouched.

use miette::Diagnostic;
use thiserror::Error;

const MIB: u64 = 1024 * 1024;

fn mebibytes(bytes: &u64) -> f64 {
    *bytes as f64 / MIB as f64
}

/// Errors surfaced by editor operations.
#[derive(Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum EditorError {
    /// The imported file is over the size ceiling.
    #[error("file too large: {:.1}MB (maximum size is {}MB)", mebibytes(.size), .limit / MIB)]
    #[diagnostic(code(mdview::import::too_large), help("split the document or raise `max_import_bytes`"))]
    ImportTooLarge { size: u64, limit: u64 },

    /// The imported file could not be read as UTF-8 text.
    #[error("could not read file: {0}")]
    #[diagnostic(code(mdview::import::unreadable))]
    ImportUnreadable(String),

    /// An export collaborator failed.
    #[error("export failed: {0}")]
    #[diagnostic(code(mdview::export))]
    Export(String),

    /// The platform denied clipboard access.
    #[error("clipboard write failed: {0}")]
    #[diagnostic(code(mdview::clipboard))]
    Clipboard(String),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

/// Errors loading or saving configuration.
#[derive(Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to access config file: {0}")]
    #[diagnostic(code(mdview::config::io))]
    Io(#[from] std::io::Error),

    #[error("invalid JSON config: {0}")]
    #[diagnostic(code(mdview::config::json))]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML config: {0}")]
    #[diagnostic(code(mdview::config::toml))]
    TomlDe(#[from] toml::de::Error),

    #[error("could not write TOML config: {0}")]
    #[diagnostic(code(mdview::config::toml))]
    TomlSer(#[from] toml::ser::Error),

    #[error("unsupported config format: {0}")]
    #[diagnostic(
        code(mdview::config::format),
        help("use a .json or .toml file")
    )]
    UnsupportedFormat(String),
}
