use actix_web::HttpResponse;
use log::info;

use super::redirect;
use crate::session::{AuthState, SessionContext};

pub async fn logout(session: SessionContext) -> HttpResponse {
    if let AuthState::Authenticated(id) = session.state() {
        info!("user {} logged out", id);
    }
    session.end();

    redirect("/")
}
