use actix_identity::{Identity, IdentityExt};
use actix_session::{
    config::CookieContentSecurity, storage::CookieSessionStore, Session, SessionExt,
    SessionMiddleware,
};
use actix_web::{cookie::Key, dev::Payload, FromRequest, HttpMessage, HttpRequest};
use futures::future::{ready, Ready};

use crate::config::CookieSettings;
use crate::error::AppError;
use crate::models::UserId;

pub const COOKIE_NAME: &str = "pandas-session";

/// Who the current request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticated(UserId),
}

/// Request-scoped view of the session cookie.
pub struct SessionContext {
    req: HttpRequest,
    session: Session,
}

impl SessionContext {
    fn for_request(req: &HttpRequest) -> Self {
        SessionContext {
            req: req.clone(),
            session: req.get_session(),
        }
    }

    pub fn state(&self) -> AuthState {
        current_user(&self.req).map_or(AuthState::Anonymous, AuthState::Authenticated)
    }

    /// Remember `user` for the rest of this browser session.
    pub fn establish(&self, user: UserId) -> Result<(), AppError> {
        Identity::login(&self.req.extensions(), user.to_string())
            .map(|_| ())
            .map_err(|e| AppError::Session(e.to_string()))
    }

    /// Drop whatever the session holds but keep the session itself, so a
    /// login later in the same request is still recorded.
    pub fn clear(&self) {
        self.session.clear();
    }

    /// Forget the session entirely and expire its cookie. Safe to call when
    /// nobody is logged in.
    pub fn end(&self) {
        self.session.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(SessionContext::for_request(req)))
    }
}

fn current_user(req: &HttpRequest) -> Option<UserId> {
    req.get_identity()
        .ok()
        .and_then(|identity| identity.id().ok())
        .and_then(|id| id.parse().ok())
}

/// Extractor for routes that require a logged-in user. Anonymous requests are
/// redirected to the login page.
pub struct Authenticated(pub UserId);

impl FromRequest for Authenticated {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(current_user(req).map(Authenticated).ok_or(AppError::LoginRequired))
    }
}

pub fn session_middleware(key: Key, cookie: &CookieSettings) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(COOKIE_NAME.to_string())
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_domain(cookie.domain.clone())
        .cookie_secure(cookie.secure)
        .build()
}
