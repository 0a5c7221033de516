use actix_web::{web, HttpResponse};
use log::info;

use super::redirect;
use crate::auth::{AuthFlow, LoginParams};
use crate::error::AppError;
use crate::session::SessionContext;
use crate::view::FormView;

// Both handlers forget the current user before doing anything else, so
// visiting the login page logs out whoever was logged in.

pub async fn form(session: SessionContext) -> FormView {
    session.clear();
    FormView::blank("login")
}

/// A body that doesn't parse as the login form is still a visit to the login
/// page: the session is cleared before the form error is returned.
pub async fn login(
    session: SessionContext,
    params: Result<web::Form<LoginParams>, actix_web::Error>,
    flow: web::Data<AuthFlow>,
) -> Result<HttpResponse, actix_web::Error> {
    session.clear();

    let params = params?.into_inner();
    let username = params.username.clone();
    let id = web::block(move || flow.authenticate(&params))
        .await
        .map_err(AppError::from)?
        .map_err(AppError::Login)?;

    session.establish(id)?;
    info!("{} logged in as user {}", username, id);

    Ok(redirect("/"))
}
