use crate::error::FakturaError;
use crate::extraction::PageContent;
use std::io::Write;
use std::process::Command;

/// Text extraction via pdftotext (from poppler-utils).
///
/// Uses `pdftotext -layout` so column alignment survives as whitespace,
/// which is what the layout table parser keys on.
pub struct PdftotextSource;

impl PdftotextSource {
    pub fn new() -> Self {
        PdftotextSource
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }

    /// Extract text content from PDF bytes, one PageContent per page.
    pub fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, FakturaError> {
        // pdftotext wants a file path; stage the bytes in a temp file.
        let mut tmpfile =
            tempfile::NamedTempFile::new().map_err(|e| FakturaError::Extraction(e.to_string()))?;
        tmpfile
            .write_all(pdf_bytes)
            .map_err(|e| FakturaError::Extraction(e.to_string()))?;

        let output = Command::new("pdftotext")
            .arg("-layout")
            .arg(tmpfile.path())
            .arg("-") // output to stdout
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    FakturaError::PdftotextNotFound
                } else {
                    FakturaError::Extraction(format!("pdftotext failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(FakturaError::PdftotextFailed { code, stderr });
        }

        let text = String::from_utf8_lossy(&output.stdout);

        // pdftotext separates pages with form feed \x0c.
        let pages: Vec<PageContent> = text
            .split('\x0c')
            .enumerate()
            .map(|(i, page_text)| PageContent {
                page_number: i + 1,
                lines: page_text.lines().map(|l| l.to_string()).collect(),
            })
            .filter(|p| !p.lines.is_empty() || p.page_number == 1)
            .collect();

        Ok(pages)
    }
}

impl Default for PdftotextSource {
    fn default() -> Self {
        Self::new()
    }
}
