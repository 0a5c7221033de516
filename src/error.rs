use actix_web::{
    http::{header, StatusCode},
    HttpResponse, ResponseError,
};
use log::error;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::view::FormView;

/// Failures reported by a `CredentialStore`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username already exists")]
    DuplicateUsername,
    #[error("connection pool: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("query: {0}")]
    Query(#[from] diesel::result::Error),
}

#[derive(Debug, Error)]
pub enum HashError {
    #[error("system random generator failed")]
    Random,
}

/// Outcome of a registration or login attempt that did not succeed.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("must provide username")]
    MissingUsername,
    #[error("must provide password")]
    MissingPassword,
    #[error("password doesn't match confirmation")]
    PasswordMismatch,
    #[error("Username is already taken. Please try again.")]
    UsernameTaken,
    #[error("invalid username and/or password")]
    InvalidCredentials,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Hash(#[from] HashError),
}

impl AuthError {
    /// Short code the forms use to highlight the offending field.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingUsername => "username",
            AuthError::MissingPassword => "password",
            AuthError::PasswordMismatch => "match",
            AuthError::UsernameTaken => "duplicate",
            AuthError::InvalidCredentials => "noexist",
            AuthError::Store(_) | AuthError::Hash(_) => "internal",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingUsername
            | AuthError::MissingPassword
            | AuthError::PasswordMismatch => StatusCode::BAD_REQUEST,
            AuthError::UsernameTaken => StatusCode::CONFLICT,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Store(_) | AuthError::Hash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn is_internal(&self) -> bool {
        matches!(self, AuthError::Store(_) | AuthError::Hash(_))
    }
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file part")]
    NoFilePart,
    #[error("No selected file")]
    NoSelectedFile,
    #[error("File type not allowed")]
    DisallowedType,
}

impl UploadError {
    pub fn code(&self) -> &'static str {
        match self {
            UploadError::NoFilePart => "nofile",
            UploadError::NoSelectedFile => "noselect",
            UploadError::DisallowedType => "filetype",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name}: {value:?} is not a valid value")]
    Invalid { name: &'static str, value: String },
    #[error("{} not found. Make sure to create the '{name}' secret with 'docker secret create' before starting the service.", path.display())]
    MissingSecret { name: String, path: PathBuf },
    #[error("failed to read secret {}: {source}", path.display())]
    Secret { path: PathBuf, source: io::Error },
    #[error("failed to open database: {0}")]
    Database(#[from] StoreError),
}

/// Every error a request handler can end with.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("registration rejected: {0}")]
    Register(AuthError),
    #[error("login rejected: {0}")]
    Login(AuthError),
    #[error("upload rejected: {0}")]
    Upload(UploadError),
    #[error("login required")]
    LoginRequired,
    #[error("malformed multipart body: {0}")]
    Multipart(#[from] actix_multipart::MultipartError),
    #[error("blocking task cancelled")]
    Blocking(#[from] actix_web::error::BlockingError),
    #[error("session: {0}")]
    Session(String),
}

impl AppError {
    fn form_error(form: &'static str, err: &AuthError) -> HttpResponse {
        if err.is_internal() {
            error!("{} failed: {}", form, err);
            return internal_error();
        }

        HttpResponse::build(err.status()).json(FormView::failed(form, err.code(), err.to_string()))
    }
}

fn internal_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(FormView::message("error", "internal server error"))
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Register(e) | AppError::Login(e) => e.status(),
            AppError::Upload(_) | AppError::Multipart(_) => StatusCode::BAD_REQUEST,
            AppError::LoginRequired => StatusCode::FOUND,
            AppError::Blocking(_) | AppError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Register(e) => AppError::form_error("register", e),
            AppError::Login(e) => AppError::form_error("login", e),
            AppError::Upload(e) => HttpResponse::BadRequest()
                .json(FormView::failed("upload", e.code(), e.to_string())),
            AppError::Multipart(e) => HttpResponse::BadRequest()
                .json(FormView::failed("upload", "multipart", e.to_string())),
            AppError::LoginRequired => HttpResponse::Found()
                .insert_header((header::LOCATION, "/login"))
                .finish(),
            AppError::Blocking(_) | AppError::Session(_) => {
                error!("{}", self);
                internal_error()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_codes_match_form_markers() {
        assert_eq!(AuthError::MissingUsername.code(), "username");
        assert_eq!(AuthError::MissingPassword.code(), "password");
        assert_eq!(AuthError::PasswordMismatch.code(), "match");
        assert_eq!(AuthError::UsernameTaken.code(), "duplicate");
        assert_eq!(AuthError::InvalidCredentials.code(), "noexist");
    }

    #[test]
    fn statuses() {
        let taken = AppError::Register(AuthError::UsernameTaken);
        assert_eq!(taken.error_response().status(), StatusCode::CONFLICT);

        let invalid = AppError::Login(AuthError::InvalidCredentials);
        assert_eq!(invalid.error_response().status(), StatusCode::UNAUTHORIZED);

        let missing = AppError::Login(AuthError::MissingPassword);
        assert_eq!(missing.error_response().status(), StatusCode::BAD_REQUEST);

        let store = AppError::Register(AuthError::Store(StoreError::Query(
            diesel::result::Error::NotFound,
        )));
        assert_eq!(store.error_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn login_required_redirects() {
        let res = AppError::LoginRequired.error_response();
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(res.headers().get(header::LOCATION).unwrap(), "/login");
    }
}
