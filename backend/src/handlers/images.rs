//! Image resource handlers
//!
//! Five operations over image records: list, get, create, update, delete.
//! Create and update take multipart bodies so a blob can ride along with the
//! metadata; the blob goes to the storage gateway first and the returned
//! location/key are merged into the record before it is persisted.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use image_storage::image_record::{ImageRecord, NewImageRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::AuthenticatedUser,
    blob_storage::StoredBlob,
    handlers::MAX_FILE_BYTES,
    ownership::check_ownership,
    state::AppState,
    types::AppError,
};

static MIME_TYPE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.+-]+/[\w.+-]+$").expect("Invalid regex"));

/// Metadata fields collected from a multipart body
///
/// Blank text parts are dropped while reading, so a blanked optional field
/// never overwrites an existing value. An `owner` part, or any other unknown
/// part, is ignored outright.
#[derive(Debug, Default)]
struct ImageForm {
    name: Option<String>,
    url: Option<String>,
    file_type: Option<String>,
    tag: Option<String>,
    favorite: Option<bool>,
    file: Option<FilePart>,
}

#[derive(Debug)]
struct FilePart {
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: bytes::Bytes,
}

/// Required fields of a record about to be created
#[derive(Debug, Validate)]
struct CreateImagePayload {
    #[validate(length(min = 1, message = "name is required"))]
    name: String,
    #[validate(length(min = 1, message = "url is required when no file is attached"))]
    url: String,
    #[validate(regex(path = "*MIME_TYPE_REGEX", message = "fileType must be a MIME type"))]
    file_type: String,
}

/// Response envelope for a single record
#[derive(Debug, Serialize)]
pub struct ImageEnvelope {
    /// The record
    pub image: ImageRecord,
}

/// Response envelope for the list operation
#[derive(Debug, Serialize)]
pub struct ImageListEnvelope {
    /// All records owned by the acting identity, newest first
    pub images: Vec<ImageRecord>,
}

async fn read_form(multipart: &mut Multipart) -> Result<ImageForm, AppError> {
    let mut form = ImageForm::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(field_name) = field.name().map(ToString::to_string) else {
            continue;
        };

        if field_name == "file" {
            let file_name = field.file_name().map(ToString::to_string);
            let content_type = field.content_type().map(ToString::to_string);
            let bytes = field.bytes().await?;

            if bytes.len() > MAX_FILE_BYTES {
                return Err(AppError::new(
                    StatusCode::PAYLOAD_TOO_LARGE,
                    "payload_too_large",
                    "File part exceeds the 15 MiB upload cap",
                    false,
                ));
            }

            // An empty file part counts as no file at all
            if !bytes.is_empty() {
                form.file = Some(FilePart {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            continue;
        }

        let value = field.text().await?;
        let value = value.trim();
        // Blank fields are treated as not provided
        if value.is_empty() {
            continue;
        }

        match field_name.as_str() {
            "name" => form.name = Some(value.to_string()),
            "url" => form.url = Some(value.to_string()),
            "fileType" => form.file_type = Some(value.to_string()),
            "tag" => form.tag = Some(value.to_string()),
            "favorite" => {
                form.favorite = Some(value.parse().map_err(|_| {
                    AppError::validation("favorite must be \"true\" or \"false\"")
                })?);
            }
            // `owner` and anything else the client sends is dropped; the
            // owner only ever comes from the acting identity
            _ => {}
        }
    }

    Ok(form)
}

/// Storage keys are a random UUID plus the original file extension, so
/// concurrent uploads of the same file name cannot collide.
fn storage_key_for(file_name: Option<&str>) -> String {
    let extension = file_name
        .and_then(|name| std::path::Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| ext.to_ascii_lowercase());

    match extension {
        Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
        None => Uuid::new_v4().to_string(),
    }
}

async fn upload_blob(state: &AppState, file: &FilePart) -> Result<StoredBlob, AppError> {
    let key = storage_key_for(file.file_name.as_deref());
    let content_type = file
        .content_type
        .clone()
        .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string());

    let stored = state
        .blob_storage
        .upload(&key, &content_type, file.bytes.clone())
        .await?;

    info!(key = %stored.key, "uploaded blob to storage gateway");
    Ok(stored)
}

fn first_validation_message(errors: &validator::ValidationErrors) -> AppError {
    let message = errors
        .field_errors()
        .into_values()
        .filter_map(|field_errors| field_errors.first().cloned())
        .filter_map(|error| error.message.as_ref().map(ToString::to_string))
        .next()
        .unwrap_or_else(|| "validation failed".to_string());

    AppError::validation(message)
}

/// `GET /v1/images`
///
/// Lists all records owned by the acting identity, newest first.
#[instrument(skip(state))]
pub async fn list_images(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ImageListEnvelope>, AppError> {
    let images = state.record_store.list_by_owner(&user.user_id).await?;

    Ok(Json(ImageListEnvelope { images }))
}

/// `GET /v1/images/{id}`
///
/// Fetches a single record. Not owner-scoped: any authenticated identity can
/// read any record; ownership gates mutation only.
///
/// # Errors
///
/// - `404 NOT_FOUND` - No record with the given id
#[instrument(skip(state, _user))]
pub async fn get_image(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<ImageEnvelope>, AppError> {
    let image = state
        .record_store
        .get_one(&id)
        .await?
        .ok_or_else(AppError::not_found)?;

    Ok(Json(ImageEnvelope { image }))
}

/// `POST /v1/images`
///
/// Creates a record from multipart metadata, uploading the optional `file`
/// part to the storage gateway first and merging the returned location/key
/// into the record. The owner is always the acting identity, regardless of
/// anything in the request body.
///
/// # Errors
///
/// - `400 BAD_REQUEST` - Missing name, or missing url/fileType with no file
/// - `5xx` - Gateway upload failure; nothing is persisted
#[instrument(skip(state, multipart))]
pub async fn create_image(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ImageEnvelope>), AppError> {
    let form = read_form(&mut multipart).await?;

    // Cheap metadata check before any gateway traffic
    if form.name.is_none() {
        return Err(AppError::validation("name is required"));
    }

    let uploaded = match &form.file {
        Some(file) => Some(upload_blob(&state, file).await?),
        None => None,
    };

    let payload = CreateImagePayload {
        name: form.name.clone().unwrap_or_default(),
        url: uploaded
            .as_ref()
            .map(|blob| blob.location.clone())
            .or_else(|| form.url.clone())
            .unwrap_or_default(),
        file_type: form
            .file_type
            .clone()
            .or_else(|| form.file.as_ref().and_then(|f| f.content_type.clone()))
            .unwrap_or_default(),
    };
    payload
        .validate()
        .map_err(|errors| first_validation_message(&errors))?;

    let image = state
        .record_store
        .create(NewImageRecord {
            name: payload.name,
            url: payload.url,
            file_type: payload.file_type,
            storage_key: uploaded.map(|blob| blob.key),
            owner: user.user_id,
            favorite: form.favorite,
            tag: form.tag,
        })
        .await?;

    info!(image_id = %image.id, "created image record");
    Ok((StatusCode::CREATED, Json(ImageEnvelope { image })))
}

/// `PATCH /v1/images/{id}`
///
/// Applies a multipart metadata patch to an owned record. A fresh `file`
/// part is uploaded under a new key and wins over any `url` field in the
/// same request; the previous blob is left in place.
///
/// # Errors
///
/// - `404 NOT_FOUND` - No record with the given id
/// - `403 FORBIDDEN` - Acting identity does not own the record
#[instrument(skip(state, multipart))]
pub async fn update_image(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<StatusCode, AppError> {
    let form = read_form(&mut multipart).await?;

    let mut image = state
        .record_store
        .get_one(&id)
        .await?
        .ok_or_else(AppError::not_found)?;

    check_ownership(&user, &image)?;

    if let Some(name) = form.name {
        image.name = name;
    }
    if let Some(url) = form.url {
        image.url = url;
    }
    if let Some(tag) = form.tag {
        image.tag = Some(tag);
    }
    if let Some(favorite) = form.favorite {
        image.favorite = Some(favorite);
    }
    let explicit_file_type = form.file_type.is_some();
    if let Some(file_type) = form.file_type {
        if !MIME_TYPE_REGEX.is_match(&file_type) {
            return Err(AppError::validation("fileType must be a MIME type"));
        }
        image.file_type = file_type;
    }

    if let Some(file) = &form.file {
        // Without an explicit fileType the part's content type takes over,
        // held to the same shape check, and rejected before any gateway call
        let fallback_type = if explicit_file_type {
            None
        } else {
            file.content_type.clone()
        };
        if let Some(content_type) = &fallback_type {
            if !MIME_TYPE_REGEX.is_match(content_type) {
                return Err(AppError::validation("fileType must be a MIME type"));
            }
        }

        let stored = upload_blob(&state, file).await?;
        image.url = stored.location;
        image.storage_key = Some(stored.key);
        if let Some(content_type) = fallback_type {
            image.file_type = content_type;
        }
    }

    state.record_store.update(image).await?;

    info!(image_id = %id, "updated image record");
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /v1/images/{id}`
///
/// Deletes an owned record, releasing its blob first when one was uploaded
/// through this API. The gateway delete is best effort: a failure is logged
/// and the record is deleted regardless.
///
/// # Errors
///
/// - `404 NOT_FOUND` - No record with the given id
/// - `403 FORBIDDEN` - Acting identity does not own the record
#[instrument(skip(state))]
pub async fn delete_image(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let image = state
        .record_store
        .get_one(&id)
        .await?
        .ok_or_else(AppError::not_found)?;

    check_ownership(&user, &image)?;

    if let Some(key) = &image.storage_key {
        if let Err(err) = state.blob_storage.delete(key).await {
            warn!(key = %key, error = %err, "failed to release blob, leaving it orphaned");
        }
    }

    state.record_store.delete(&image.id).await?;

    info!(image_id = %image.id, "deleted image record");
    Ok(StatusCode::NO_CONTENT)
}
