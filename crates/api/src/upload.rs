// upload.rs - reads the multipart application form and stores its files

use crate::error::ApiError;
use actix_multipart::{Field, Multipart};
use database::applicants::model::NewApplicant;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

pub const MAX_FILE_BYTES: usize = 5 * 1024 * 1024;
const MAX_TEXT_BYTES: usize = 4 * 1024;

const CV_EXTENSIONS: [&str; 2] = ["pdf", "docx"];
const PHOTO_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

fn extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

pub fn is_allowed_cv(file_name: &str) -> bool {
    extension(file_name).map_or(false, |e| CV_EXTENSIONS.contains(&e.as_str()))
}

pub fn is_allowed_photo(file_name: &str) -> bool {
    extension(file_name).map_or(false, |e| PHOTO_EXTENSIONS.contains(&e.as_str()))
}

// Unique on disk, and never able to escape the uploads directory
pub fn stored_file_name(original: &str) -> String {
    let base = Path::new(original)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}-{}", Uuid::new_v4().simple(), cleaned)
}

async fn read_field(field: &mut Field, limit: usize) -> Result<Vec<u8>, ApiError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| ApiError::BadRequest(e.to_string()))?;
        if bytes.len() + chunk.len() > limit {
            return Err(ApiError::BadRequest(format!(
                "Field exceeds the {} byte limit",
                limit
            )));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

struct PendingFile {
    original: String,
    bytes: Vec<u8>,
}

async fn save(dir: &Path, file: PendingFile) -> Result<String, ApiError> {
    tokio::fs::create_dir_all(dir).await?;
    let name = stored_file_name(&file.original);
    let path: PathBuf = dir.join(&name);
    tokio::fs::write(&path, &file.bytes).await?;
    debug!("Stored {} as {}", file.original, path.display());
    Ok(name)
}

/// Removes files written for a submission that never got stored.
pub async fn discard_files(uploads_dir: &Path, names: &[String]) {
    for name in names {
        let path = uploads_dir.join(name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => debug!("Removed orphaned upload {}", path.display()),
            Err(e) => warn!("Failed to remove orphaned upload {}: {}", path.display(), e),
        }
    }
}

/// Parses the application form. Files are only written once every field
/// has been read and validated.
pub async fn read_application(mut payload: Multipart, uploads_dir: &Path) -> Result<NewApplicant, ApiError> {
    let mut applicant = NewApplicant::default();
    let mut cv: Option<PendingFile> = None;
    let mut photo: Option<PendingFile> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| ApiError::BadRequest(e.to_string()))?;
        let disposition = field.content_disposition();
        let name = disposition.get_name().unwrap_or_default().to_string();
        let file_name = disposition.get_filename().map(str::to_string);

        match (name.as_str(), file_name) {
            ("cv", Some(file_name)) => {
                if !is_allowed_cv(&file_name) {
                    return Err(ApiError::BadRequest(
                        "CV must be a PDF or DOCX file".to_string(),
                    ));
                }
                let bytes = read_field(&mut field, MAX_FILE_BYTES).await?;
                cv = Some(PendingFile {
                    original: file_name,
                    bytes,
                });
            }
            ("photo", Some(file_name)) => {
                if !is_allowed_photo(&file_name) {
                    return Err(ApiError::BadRequest(
                        "Photo must be a JPG, PNG or WEBP image".to_string(),
                    ));
                }
                let bytes = read_field(&mut field, MAX_FILE_BYTES).await?;
                photo = Some(PendingFile {
                    original: file_name,
                    bytes,
                });
            }
            (name, _) => {
                let bytes = read_field(&mut field, MAX_TEXT_BYTES).await?;
                let value = String::from_utf8(bytes)
                    .map_err(|_| ApiError::BadRequest(format!("Field {} is not UTF-8", name)))?;
                let value = value.trim().to_string();
                match name {
                    "name" => applicant.name = value,
                    "phone" => applicant.phone = value,
                    "email" => applicant.email = value,
                    "address" => applicant.address = value,
                    "nid" => applicant.nid = value,
                    "lastDegree" => applicant.last_degree = value,
                    "subject" => applicant.subject = value,
                    "applyFor" => applicant.apply_for = value,
                    "selectedSubject" => {
                        applicant.selected_subject = Some(value).filter(|v| !v.is_empty())
                    }
                    other => warn!("Ignoring unexpected form field {}", other),
                }
            }
        }
    }

    for (label, value) in [
        ("name", &applicant.name),
        ("phone", &applicant.phone),
        ("applyFor", &applicant.apply_for),
    ] {
        if value.is_empty() {
            return Err(ApiError::BadRequest(format!("Missing required field {}", label)));
        }
    }

    if let Some(file) = cv {
        applicant.cv_url = Some(save(uploads_dir, file).await?);
    }
    if let Some(file) = photo {
        applicant.photo_url = Some(save(uploads_dir, file).await?);
    }

    Ok(applicant)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cv_accepts_pdf_and_docx_only() {
        assert!(is_allowed_cv("resume.pdf"));
        assert!(is_allowed_cv("Resume.DOCX"));
        assert!(!is_allowed_cv("resume.doc"));
        assert!(!is_allowed_cv("resume"));
        assert!(!is_allowed_cv("resume.pdf.exe"));
    }

    #[test]
    fn photo_accepts_common_images() {
        assert!(is_allowed_photo("me.JPG"));
        assert!(is_allowed_photo("me.png"));
        assert!(!is_allowed_photo("me.gif"));
    }

    #[test]
    fn stored_names_are_unique_and_flat() {
        let a = stored_file_name("../../etc/passwd");
        let b = stored_file_name("../../etc/passwd");
        assert_ne!(a, b);
        assert!(a.ends_with("-passwd"));
        assert!(!a.contains('/'));

        let spaced = stored_file_name("my cv (final).pdf");
        assert!(spaced.ends_with("-my_cv__final_.pdf"));
    }
}
