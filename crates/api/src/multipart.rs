//! Reading `multipart/form-data` bodies that carry one file plus text fields.

use std::collections::HashMap;
use std::str::FromStr;

use axum::body::Bytes;
use axum::extract::Multipart;
use vitrine_core::error::CoreError;
use vitrine_core::file_store::StoredFile;
use vitrine_core::upload::{validate_upload, AcceptedUpload, ResourceKind};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Room left above a policy's file limit for the other parts and boundaries.
pub const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// A file part, fully buffered.
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// The text fields and the single file part of a form.
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    file: Option<UploadedFile>,
}

impl UploadForm {
    /// Drain `multipart`, buffering the part named `file_field`.
    ///
    /// The file is read chunk by chunk and rejected as soon as it grows past
    /// `max_bytes`. A second file part, or a file under any other name, is a
    /// bad request.
    pub async fn read(mut multipart: Multipart, file_field: &str, max_bytes: u64) -> AppResult<Self> {
        let mut form = UploadForm::default();

        while let Some(mut field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name != file_field {
                if field.file_name().is_some() {
                    return Err(AppError::BadRequest(format!("Unexpected file field '{name}'")));
                }
                let value = field.text().await?;
                form.fields.insert(name, value);
                continue;
            }

            if form.file.is_some() {
                return Err(AppError::BadRequest("Only one file may be uploaded".into()));
            }

            let file_name = field
                .file_name()
                .map(str::to_string)
                .filter(|n| !n.trim().is_empty())
                .ok_or_else(|| AppError::BadRequest(format!("'{file_field}' must be a file")))?;
            let content_type = field.content_type().map(str::to_string);

            let mut buf: Vec<u8> = Vec::new();
            while let Some(chunk) = field.chunk().await? {
                if (buf.len() + chunk.len()) as u64 > max_bytes {
                    return Err(AppError::Core(CoreError::PayloadTooLarge(format!(
                        "File exceeds the {} MB limit",
                        max_bytes / (1024 * 1024)
                    ))));
                }
                buf.extend_from_slice(&chunk);
            }

            form.file = Some(UploadedFile {
                file_name,
                content_type,
                bytes: Bytes::from(buf),
            });
        }

        Ok(form)
    }

    /// A text field, trimmed, or `None` when absent or blank.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn required(&self, name: &str, message: &str) -> AppResult<String> {
        self.text(name)
            .map(str::to_string)
            .ok_or_else(|| AppError::Core(CoreError::Validation(message.to_string())))
    }

    /// Parse an optional field, failing validation when it is present but malformed.
    pub fn parse<T: FromStr>(&self, name: &str) -> AppResult<Option<T>> {
        self.text(name)
            .map(|raw| {
                raw.parse::<T>().map_err(|_| {
                    AppError::Core(CoreError::Validation(format!("Invalid value for '{name}'")))
                })
            })
            .transpose()
    }

    /// A boolean field. Accepts `true`/`false` and `1`/`0`.
    pub fn flag(&self, name: &str) -> AppResult<Option<bool>> {
        match self.text(name) {
            None => Ok(None),
            Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => Ok(Some(true)),
            Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => Ok(Some(false)),
            Some(_) => Err(AppError::Core(CoreError::Validation(format!(
                "Invalid value for '{name}'"
            )))),
        }
    }

    pub fn take_file(&mut self) -> Option<UploadedFile> {
        self.file.take()
    }
}

/// Check `file` against the upload policy of `kind`. Nothing touches the disk.
pub fn accept(kind: ResourceKind, file: &UploadedFile) -> AppResult<AcceptedUpload> {
    let accepted = validate_upload(
        kind,
        &file.file_name,
        file.content_type.as_deref(),
        &file.bytes,
    )?;
    Ok(accepted)
}

/// Write an accepted file under the upload root.
pub async fn store(
    state: &AppState,
    accepted: &AcceptedUpload,
    file: &UploadedFile,
) -> AppResult<StoredFile> {
    let stored = state.files.save(accepted, &file.bytes).await?;
    Ok(stored)
}
