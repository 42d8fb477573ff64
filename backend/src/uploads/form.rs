//! Multipart body reading

use axum::extract::multipart::{Multipart, MultipartError};
use std::collections::HashMap;

use super::UploadedFile;
use crate::error::ApiError;

/// A fully read multipart body: text fields and non-empty files by name
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await.map_err(bad_multipart)?;
                    // Browsers send an empty part for an untouched file input
                    if bytes.is_empty() {
                        continue;
                    }
                    form.files.insert(
                        name,
                        UploadedFile {
                            file_name,
                            content_type,
                            bytes,
                        },
                    );
                }
                None => {
                    let value = field.text().await.map_err(bad_multipart)?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    /// Text field value, empty when absent
    pub fn text(&self, name: &str) -> String {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    /// Remove and return the named image file, if one was sent
    pub fn take_image(&mut self, name: &str) -> Result<Option<UploadedFile>, ApiError> {
        match self.files.remove(name) {
            Some(file) if !file.is_image() => {
                Err(ApiError::BadRequest("file must be an image".to_string()))
            }
            other => Ok(other),
        }
    }

    /// Like [`take_image`](Self::take_image) but the file is mandatory
    pub fn require_image(&mut self, name: &str) -> Result<UploadedFile, ApiError> {
        self.take_image(name)?
            .ok_or_else(|| ApiError::BadRequest("no file uploaded".to_string()))
    }
}

fn bad_multipart(err: MultipartError) -> ApiError {
    ApiError::BadRequest(err.body_text())
}
