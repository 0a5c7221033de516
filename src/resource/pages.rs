use crate::session::{AuthState, Authenticated, SessionContext};
use crate::view::PageView;

pub async fn index(session: SessionContext) -> PageView {
    let user = match session.state() {
        AuthState::Authenticated(id) => Some(id),
        AuthState::Anonymous => None,
    };
    PageView::new("index", user)
}

pub async fn browse(Authenticated(user): Authenticated) -> PageView {
    PageView::new("browse", Some(user))
}
