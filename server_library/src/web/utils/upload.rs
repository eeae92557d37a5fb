use crate::web::utils::response::ApiError;
use crate::utils::logging::*;
use actix_multipart::{Field, Multipart};
use futures::TryStreamExt;
use sanitize_filename::sanitize;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

pub const UPLOAD_FIELD: &str = "file";
pub const ALLOWED_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "gif", "mp4", "avi", "mov"];

#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Sanitized client filename.
    pub filename: String,
    pub storage_name: String,
    pub path: PathBuf,
}

impl UploadedFile {
    /// Storage name without its extension.
    pub fn stem(&self) -> &str {
        Path::new(&self.storage_name)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(&self.storage_name)
    }
}

/// Checks the client filename and returns its sanitized form.
pub fn validate_filename(filename: &str) -> Result<String, UploadEntry> {
    if filename.is_empty() {
        return Err(UploadEntry::EmptyFilenameError);
    }
    let extension = match filename.rsplit_once('.') {
        Some((_, extension)) => extension.to_lowercase(),
        None => return Err(UploadEntry::UnsupportedFormatError(filename.to_string())),
    };
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(UploadEntry::UnsupportedFormatError(extension));
    }
    let sanitized = sanitize(filename);
    if sanitized.is_empty() {
        return Err(UploadEntry::InvalidFilenameError);
    }
    Ok(sanitized)
}

/// Streams the first `file` field of `payload` into `folder`. Other fields
/// are skipped. A file larger than `limit` bytes is removed again.
pub async fn save_upload(mut payload: Multipart, folder: &Path, limit: usize) -> Result<UploadedFile, ApiError> {
    while let Some(mut field) = payload.try_next().await.map_err(invalid_payload)? {
        let filename = field.content_disposition()
            .filter(|content_disposition| content_disposition.get_name() == Some(UPLOAD_FIELD))
            .and_then(|content_disposition| content_disposition.get_filename())
            .map(str::to_string);
        let filename = match filename {
            Some(filename) => filename,
            None => {
                drain(&mut field).await?;
                continue;
            }
        };
        let sanitized = validate_filename(&filename)?;
        let storage_name = format!("{}_{}", Uuid::new_v4(), sanitized);
        let path = folder.join(&storage_name);
        create_file(&path, &mut field, limit).await?;
        return Ok(UploadedFile {
            filename: sanitized,
            storage_name,
            path,
        });
    }
    Err(UploadEntry::MissingFileError.into())
}

async fn create_file(path: &Path, field: &mut Field, limit: usize) -> Result<(), ApiError> {
    let mut file = File::create(path).await
        .map_err(|err| IOEntry::OpenFileError(path.display().to_string(), err))?;
    let mut written = 0_usize;
    while let Some(chunk) = field.try_next().await.map_err(invalid_payload)? {
        written += chunk.len();
        if written > limit {
            drop(file);
            let _ = fs::remove_file(path).await;
            return Err(UploadEntry::FileTooLargeError(limit).into());
        }
        file.write_all(&chunk).await
            .map_err(|err| IOEntry::WriteFileError(path.display().to_string(), err))?;
    }
    file.flush().await
        .map_err(|err| IOEntry::WriteFileError(path.display().to_string(), err))?;
    Ok(())
}

async fn drain(field: &mut Field) -> Result<(), ApiError> {
    while field.try_next().await.map_err(invalid_payload)?.is_some() {}
    Ok(())
}

fn invalid_payload(err: impl ToString) -> UploadEntry {
    UploadEntry::InvalidPayloadError(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_allowed_extensions_in_any_case() {
        assert_eq!(validate_filename("belt.JPG").unwrap(), "belt.JPG");
        assert_eq!(validate_filename("clip.mov").unwrap(), "clip.mov");
        assert_eq!(validate_filename("багаж.jpeg").unwrap(), "багаж.jpeg");
    }

    #[test]
    fn rejects_empty_and_unsupported_names() {
        assert!(matches!(validate_filename(""), Err(UploadEntry::EmptyFilenameError)));
        assert!(matches!(validate_filename("notes.txt"), Err(UploadEntry::UnsupportedFormatError(extension)) if extension == "txt"));
        assert!(matches!(validate_filename("no_extension"), Err(UploadEntry::UnsupportedFormatError(_))));
    }

    #[test]
    fn strips_path_components() {
        let sanitized = validate_filename("../../etc/passwd.png").unwrap();
        assert!(!sanitized.contains('/'));
        assert!(sanitized.ends_with("passwd.png"));
    }

    #[test]
    fn stem_drops_extension() {
        let upload = UploadedFile {
            filename: "belt.png".to_string(),
            storage_name: "1234_belt.png".to_string(),
            path: PathBuf::from("uploads/1234_belt.png"),
        };
        assert_eq!(upload.stem(), "1234_belt");
    }
}
