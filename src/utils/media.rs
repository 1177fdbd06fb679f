use std::path::Path;

use tokio::fs;
use uuid::Uuid;

use crate::error::{Error, Result};

pub const RESUME_DIR: &str = "resumes";
pub const RESUME_EXTENSIONS: [&str; 5] = ["pdf", "doc", "docx", "txt", "rtf"];

/// Lowercased extension of an acceptable resume upload. PDFs must also look
/// like PDFs.
pub fn resume_extension(filename: &str, data: &[u8]) -> Result<String> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if !RESUME_EXTENSIONS.contains(&ext.as_str()) {
        return Err(Error::field(
            "resume",
            "extension",
            format!(
                "File extension \"{}\" is not allowed. Allowed extensions are: {}.",
                ext,
                RESUME_EXTENSIONS.join(", ")
            ),
        ));
    }
    if data.is_empty() {
        return Err(Error::field(
            "resume",
            "empty",
            "The submitted file is empty.",
        ));
    }
    if ext == "pdf" && !data.starts_with(b"%PDF") {
        return Err(Error::field("resume", "content", "Invalid PDF file content."));
    }
    Ok(ext)
}

/// Writes the upload under `<media_root>/resumes/` with a generated name and
/// returns the path relative to `media_root`.
pub async fn store_resume(media_root: &str, filename: &str, data: &[u8]) -> Result<String> {
    let ext = resume_extension(filename, data)?;

    let dir = Path::new(media_root).join(RESUME_DIR);
    fs::create_dir_all(&dir).await?;

    let name = format!("{}.{}", Uuid::new_v4(), ext);
    fs::write(dir.join(&name), data).await.map_err(|e| {
        tracing::error!("Failed to write resume file: {}", e);
        Error::Io(e)
    })?;

    Ok(format!("{}/{}", RESUME_DIR, name))
}
