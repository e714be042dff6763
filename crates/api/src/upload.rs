//! Image upload intake and on-disk storage.
//!
//! [`UploadForm`] reads a create/update request body into text fields plus
//! at most one image. Files are held in memory (bounded by
//! [`MAX_UPLOAD_BYTES`](haosenyi_core::upload::MAX_UPLOAD_BYTES)) until the
//! handler has validated the text fields, then written by [`UploadStore`].

use std::collections::HashMap;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::Form;
use haosenyi_core::upload::{check_content_type, generate_stored_filename, UploadError, UploadGuard};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// File field names
// ---------------------------------------------------------------------------

/// The one multipart field a resource accepts its image under.
pub trait FileField {
    const NAME: &'static str;
}

/// Article cover image, sent as `coverImage`.
#[derive(Debug)]
pub struct CoverImage;

impl FileField for CoverImage {
    const NAME: &'static str = "coverImage";
}

/// Work screenshot, sent as `imageUrl`.
#[derive(Debug)]
pub struct WorkImage;

impl FileField for WorkImage {
    const NAME: &'static str = "imageUrl";
}

// ---------------------------------------------------------------------------
// Request intake
// ---------------------------------------------------------------------------

/// An accepted image that has not been written to disk yet.
#[derive(Debug, Clone)]
pub struct PendingUpload {
    pub field: &'static str,
    pub original_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Text fields of a form body, keyed by field name.
#[derive(Debug, Clone, Default)]
pub struct FormFields(HashMap<String, String>);

impl FormFields {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Build from a JSON object. Strings are taken as-is, `null` counts as
    /// absent, and every other value uses its JSON text (`true`, `3`).
    fn from_json(object: serde_json::Map<String, Value>) -> Self {
        let fields = object
            .into_iter()
            .filter_map(|(name, value)| match value {
                Value::Null => None,
                Value::String(s) => Some((name, s)),
                other => Some((name, other.to_string())),
            })
            .collect();
        Self(fields)
    }
}

/// Create/update request body for a resource whose image lives under `F::NAME`.
///
/// Accepts `multipart/form-data`, `application/json`, or
/// `application/x-www-form-urlencoded`. An empty body yields no fields.
#[derive(Debug)]
pub struct UploadForm<F> {
    pub fields: FormFields,
    pub file: Option<PendingUpload>,
    _field: PhantomData<F>,
}

impl<F: FileField> UploadForm<F> {
    fn text_only(fields: FormFields) -> Self {
        Self {
            fields,
            file: None,
            _field: PhantomData,
        }
    }
}

impl<F> FromRequest<AppState> for UploadForm<F>
where
    F: FileField + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state).await?;
            return read_multipart::<F>(multipart).await;
        }
        if content_type.starts_with("application/json") {
            let AppJson(object) =
                AppJson::<serde_json::Map<String, Value>>::from_request(req, state).await?;
            return Ok(Self::text_only(FormFields::from_json(object)));
        }
        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state).await?;
            return Ok(Self::text_only(FormFields(fields)));
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        if body.is_empty() {
            return Ok(Self::text_only(FormFields::default()));
        }
        Err(AppError::BadRequest(
            "Expected a multipart/form-data or application/json body".into(),
        ))
    }
}

/// Drain a multipart body, enforcing the single-image policy.
///
/// File parts with an empty filename are what browsers send for an untouched
/// file input; they are skipped. Image bytes are counted while streaming so
/// an oversized file is rejected as soon as it crosses the limit.
async fn read_multipart<F: FileField>(mut multipart: Multipart) -> AppResult<UploadForm<F>> {
    let mut fields = FormFields::default();
    let mut file: Option<PendingUpload> = None;

    while let Some(mut field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        let Some(original_name) = field.file_name().map(str::to_string) else {
            let value = field.text().await?;
            fields.insert(name, value);
            continue;
        };
        if original_name.is_empty() {
            continue;
        }

        if name != F::NAME {
            return Err(UploadError::UnexpectedField(name).into());
        }
        if file.is_some() {
            return Err(UploadError::TooManyFiles.into());
        }

        let content_type = field.content_type().map(str::to_string);
        check_content_type(content_type.as_deref())?;

        let mut guard = UploadGuard::default();
        let mut buffer = Vec::new();
        while let Some(chunk) = field.chunk().await? {
            guard.accept(chunk.len())?;
            buffer.extend_from_slice(&chunk);
        }

        tracing::debug!(
            field = F::NAME,
            original_name = %original_name,
            bytes = guard.received(),
            "Received image upload"
        );

        file = Some(PendingUpload {
            field: F::NAME,
            original_name,
            content_type: content_type.unwrap_or_default(),
            bytes: Bytes::from(buffer),
        });
    }

    Ok(UploadForm {
        fields,
        file,
        _field: PhantomData,
    })
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// Directory uploaded images are written to and served from.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the upload directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Write `upload` under a freshly generated name and return that name.
    pub async fn save(&self, upload: &PendingUpload) -> AppResult<String> {
        let filename = generate_stored_filename(upload.field, &upload.original_name);
        let path = self.dir.join(&filename);

        self.ensure_dir().await.map_err(|e| {
            AppError::InternalError(format!("Failed to create upload directory: {e}"))
        })?;
        tokio::fs::write(&path, &upload.bytes)
            .await
            .map_err(|e| AppError::InternalError(format!("Failed to store upload: {e}")))?;

        tracing::info!(
            filename = %filename,
            content_type = %upload.content_type,
            bytes = upload.bytes.len(),
            "Stored upload"
        );
        Ok(filename)
    }

    /// [`save`](Self::save) when a file was sent.
    pub async fn save_optional(&self, upload: Option<&PendingUpload>) -> AppResult<Option<String>> {
        match upload {
            Some(upload) => self.save(upload).await.map(Some),
            None => Ok(None),
        }
    }

    /// Delete a stored file. Failures are logged, never returned.
    pub async fn remove(&self, filename: &str) {
        if !is_plain_filename(filename) {
            tracing::warn!(filename, "Refusing to remove upload outside the upload directory");
            return;
        }
        match tokio::fs::remove_file(self.dir.join(filename)).await {
            Ok(()) => tracing::debug!(filename, "Removed upload"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(filename, "Upload already gone");
            }
            Err(e) => tracing::warn!(filename, error = %e, "Failed to remove upload"),
        }
    }

    /// [`remove`](Self::remove) when there is a file to remove.
    pub async fn discard(&self, filename: Option<&str>) {
        if let Some(filename) = filename {
            self.remove(filename).await;
        }
    }
}

/// A bare file name with no directory components.
fn is_plain_filename(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.contains('\0')
}
