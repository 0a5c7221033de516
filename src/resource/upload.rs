use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures::TryStreamExt;
use log::info;

use super::redirect;
use crate::error::{AppError, UploadError};
use crate::session::Authenticated;
use crate::upload::{secure_filename, UploadPolicy};
use crate::view::FormView;

/// Multipart field carrying the image.
const IMAGE_FIELD: &str = "imagefile";

pub async fn form(_user: Authenticated) -> FormView {
    FormView::blank("upload")
}

/// Check the submitted image's filename. Nothing is stored: the file's
/// contents are read and discarded.
pub async fn upload(
    Authenticated(user): Authenticated,
    policy: web::Data<dyn UploadPolicy>,
    mut payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let mut filename = None;

    while let Some(mut field) = payload.try_next().await? {
        let disposition = field.content_disposition();
        if filename.is_none() && disposition.and_then(|cd| cd.get_name()) == Some(IMAGE_FIELD) {
            filename = disposition
                .and_then(|cd| cd.get_filename())
                .map(str::to_string);
        }

        while field.try_next().await?.is_some() {}
    }

    let filename = filename.ok_or(AppError::Upload(UploadError::NoFilePart))?;
    if filename.is_empty() {
        return Err(AppError::Upload(UploadError::NoSelectedFile));
    }
    if !policy.is_allowed_extension(&filename) {
        return Err(AppError::Upload(UploadError::DisallowedType));
    }

    info!("user {} uploaded {}", user, secure_filename(&filename));
    Ok(redirect("/browse"))
}
