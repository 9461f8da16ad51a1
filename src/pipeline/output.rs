use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::domain::EntityDocument;
use crate::error::{EtlError, Result};
use crate::pipeline::ingestion::STDIO_PATH;

/// Serialize the entity document
pub fn render_document(document: &EntityDocument, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(document)?
    } else {
        serde_json::to_string(document)?
    };
    Ok(rendered)
}

/// Persist the entity document to `path` (`-` for stdout)
pub fn write_document(document: &EntityDocument, path: &Path, pretty: bool) -> Result<()> {
    let content = render_document(document, pretty)?;
    let target = path.display().to_string();

    if path.as_os_str() == STDIO_PATH {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(content.as_bytes())
            .and_then(|_| stdout.write_all(b"\n"))
            .map_err(|e| EtlError::output_failure("stdout", e))?;
        return Ok(());
    }

    // Ensure output directory exists
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| EtlError::output_failure(&target, e))?;
    }

    fs::write(path, content).map_err(|e| EtlError::output_failure(&target, e))?;
    info!("💾 Saved entity document to {}", target);
    Ok(())
}
