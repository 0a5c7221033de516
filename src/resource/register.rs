use actix_web::{web, HttpResponse};

use super::redirect;
use crate::auth::{AuthFlow, RegisterParams};
use crate::error::AppError;
use crate::view::FormView;

pub async fn form() -> FormView {
    FormView::blank("register")
}

/// Create the account and send the user to the login page. Registering does
/// not log anyone in.
pub async fn register(
    params: web::Form<RegisterParams>,
    flow: web::Data<AuthFlow>,
) -> Result<HttpResponse, AppError> {
    let params = params.into_inner();
    web::block(move || flow.register(&params))
        .await?
        .map_err(AppError::Register)?;

    Ok(redirect("/login"))
}
