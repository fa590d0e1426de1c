//! Output sink – materialises finished PDF bytes either as a file on disk
//! or as an in-memory attachment with suggested HTTP metadata.
//!
//! Both targets share the layout semantics entirely; only the destination
//! differs. On a write failure the error propagates as-is and any partially
//! written file is left for the caller to discard — the sink makes no
//! retry or cleanup decisions of its own.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::Error;
use crate::pipeline::RenderMode;

/// Content type advertised for generated documents.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// File-target name: `<prefix>-<ISO 8601 timestamp>.pdf` with `:` and `.`
/// replaced by `-` so the name is safe on every filesystem.
pub fn file_name(mode: RenderMode, generated_at: DateTime<Utc>) -> String {
    let stamp = generated_at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("{}-{}.pdf", mode.file_prefix(), stamp)
}

/// Write the document into `dir` under the conventional name and return the
/// full path. The file is flushed and synced before the path is handed
/// back, so the caller may serve or delete it immediately.
pub fn save_to_dir(
    bytes: &[u8],
    dir: &Path,
    mode: RenderMode,
    generated_at: DateTime<Utc>,
) -> Result<PathBuf, Error> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name(mode, generated_at));

    let file = fs::File::create(&path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(bytes)?;
    writer.flush()?;
    writer
        .into_inner()
        .map_err(std::io::IntoInnerError::into_error)?
        .sync_all()?;

    log::debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(path)
}

/// Buffer target: the finished document plus the metadata an HTTP caller
/// would put on the response.
#[derive(Debug, Clone)]
pub struct PdfAttachment {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl PdfAttachment {
    pub fn new(bytes: Vec<u8>, mode: RenderMode, generated_at: DateTime<Utc>) -> Self {
        let filename = format!(
            "{}_{}.pdf",
            mode.attachment_label(),
            generated_at.format("%Y-%m-%d")
        );
        Self { filename, bytes }
    }

    pub fn content_type(&self) -> &'static str {
        PDF_CONTENT_TYPE
    }

    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }

    pub fn content_length(&self) -> usize {
        self.bytes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> DateTime<Utc> {
        "2024-03-01T10:20:30.400Z".parse().unwrap()
    }

    #[test]
    fn file_name_replaces_reserved_characters() {
        let name = file_name(RenderMode::Summary, date());
        assert_eq!(name, "productos-2024-03-01T10-20-30-400Z.pdf");

        let detailed = file_name(RenderMode::Detailed, date());
        assert!(detailed.starts_with("productos-detallado-"));
    }

    #[test]
    fn save_writes_the_exact_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let payload = b"%PDF-1.7 not really".to_vec();
        let path = save_to_dir(&payload, dir.path(), RenderMode::Summary, date()).unwrap();
        assert!(path.exists());
        assert_eq!(fs::read(&path).unwrap(), payload);
    }

    #[test]
    fn attachment_metadata() {
        let att = PdfAttachment::new(vec![1, 2, 3], RenderMode::Detailed, date());
        assert_eq!(att.filename, "catalogo_detallado_2024-03-01.pdf");
        assert_eq!(att.content_type(), "application/pdf");
        assert_eq!(
            att.content_disposition(),
            "attachment; filename=\"catalogo_detallado_2024-03-01.pdf\""
        );
        assert_eq!(att.content_length(), 3);
    }
}
