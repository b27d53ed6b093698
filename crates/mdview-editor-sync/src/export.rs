//! Export artifacts.
//!
//! Markdown export is built in. PDF and Word generation are opaque
//! converters registered by the host; they receive the document text and the
//! rendered HTML and return the file bytes.

use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use mdview_editor_core::EditorError;

/// Export file formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Markdown,
    Pdf,
    Word,
}

impl ExportFormat {
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Markdown => "markdown-preview.md",
            Self::Pdf => "markdown-preview.pdf",
            Self::Word => "markdown-preview.docx",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Markdown => "text/markdown",
            Self::Pdf => "application/pdf",
            Self::Word => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Markdown => "markdown",
            Self::Pdf => "pdf",
            Self::Word => "word",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "pdf" => Ok(Self::Pdf),
            "word" | "docx" => Ok(Self::Word),
            other => Err(format!("unknown export format `{other}` (expected markdown, pdf or word)")),
        }
    }
}

/// What a converter gets to work with.
#[derive(Clone, Copy, Debug)]
pub struct ExportInput<'a> {
    pub markdown: &'a str,
    /// Markup currently shown in the preview. May be empty.
    pub html: &'a str,
}

/// A finished export file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: &'static str,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// Write the artifact into `dir` under its file name.
    pub async fn write_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        let path = dir.join(self.file_name);
        tokio::fs::write(&path, &self.bytes).await?;
        Ok(path)
    }
}

/// Produces the bytes of one export format.
pub trait ArtifactConverter: Send + Sync {
    fn format(&self) -> ExportFormat;

    fn convert(&self, input: ExportInput<'_>) -> Result<Vec<u8>, Box<dyn Error + Send + Sync>>;
}

/// Writes the document text unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownExporter;

impl ArtifactConverter for MarkdownExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Markdown
    }

    fn convert(&self, input: ExportInput<'_>) -> Result<Vec<u8>, Box<dyn Error + Send + Sync>> {
        Ok(input.markdown.as_bytes().to_vec())
    }
}

/// Registered converters, one per format.
pub struct Exporters {
    converters: Vec<Box<dyn ArtifactConverter>>,
}

impl Default for Exporters {
    fn default() -> Self {
        Self {
            converters: vec![Box::new(MarkdownExporter)],
        }
    }
}

impl Exporters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a converter, replacing any existing one for the same format.
    pub fn register(&mut self, converter: Box<dyn ArtifactConverter>) {
        let format = converter.format();
        self.converters.retain(|c| c.format() != format);
        self.converters.push(converter);
    }

    pub fn supports(&self, format: ExportFormat) -> bool {
        self.converters.iter().any(|c| c.format() == format)
    }

    /// Run the converter for `format`. Failures are logged and returned.
    pub fn export(
        &self,
        format: ExportFormat,
        input: ExportInput<'_>,
    ) -> Result<Artifact, EditorError> {
        let Some(converter) = self.converters.iter().find(|c| c.format() == format) else {
            tracing::warn!(%format, "export aborted: no converter registered");
            return Err(EditorError::Export(format!(
                "no converter registered for {format}"
            )));
        };

        match converter.convert(input) {
            Ok(bytes) => {
                tracing::debug!(%format, bytes = bytes.len(), "export finished");
                Ok(Artifact {
                    file_name: format.file_name(),
                    mime: format.mime(),
                    bytes,
                })
            }
            Err(err) => {
                tracing::warn!(%format, error = %err, "export failed");
                Err(EditorError::Export(err.to_string()))
            }
        }
    }
}
