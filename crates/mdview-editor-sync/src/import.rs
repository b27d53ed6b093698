//! Reading markdown files into the editor.

use std::fmt::Display;
use std::path::Path;

use mdview_editor_core::EditorError;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Read `path` as UTF-8 text, refusing anything over `limit` bytes.
///
/// The reported size is checked first. The read itself stops one byte past
/// `limit`, so pipes, device files and files that grow after the check are
/// held to the same ceiling.
pub async fn read_markdown_file(path: &Path, limit: u64) -> Result<String, EditorError> {
    let unreadable =
        |e: std::io::Error| EditorError::ImportUnreadable(format!("{}: {e}", path.display()));

    let size = tokio::fs::metadata(path).await.map_err(unreadable)?.len();
    if size > limit {
        tracing::warn!(path = %path.display(), size, limit, "import rejected: file too large");
        return Err(EditorError::ImportTooLarge { size, limit });
    }

    let file = tokio::fs::File::open(path).await.map_err(unreadable)?;
    let text = read_bounded(file, limit, path.display()).await?;
    tracing::debug!(path = %path.display(), len = text.len(), "file imported");
    Ok(text)
}

/// Read at most `limit` bytes of UTF-8 from `reader`.
///
/// A source with more than `limit` bytes is rejected with the number of
/// bytes seen, which is `limit + 1`.
pub async fn read_bounded<R>(
    reader: R,
    limit: u64,
    source: impl Display,
) -> Result<String, EditorError>
where
    R: AsyncRead + Unpin,
{
    let mut bytes = Vec::new();
    reader
        .take(limit.saturating_add(1))
        .read_to_end(&mut bytes)
        .await
        .map_err(|e| EditorError::ImportUnreadable(format!("{source}: {e}")))?;

    let size = bytes.len() as u64;
    if size > limit {
        tracing::warn!(%source, limit, "import rejected: stream exceeds the size ceiling");
        return Err(EditorError::ImportTooLarge { size, limit });
    }

    String::from_utf8(bytes).map_err(|e| EditorError::ImportUnreadable(format!("{source}: {e}")))
}
