//! JSON documents answered in place of rendered pages.

use actix_web::{body::BoxBody, HttpRequest, HttpResponse, Responder};
use log::error;
use serde::Serialize;

use crate::models::UserId;

/// State of a form page: which form, and what went wrong with the last
/// submission, if anything.
#[derive(Debug, Serialize)]
pub struct FormView {
    pub form: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FormView {
    pub fn blank(form: &'static str) -> Self {
        FormView {
            form,
            error: None,
            message: None,
        }
    }

    pub fn failed(form: &'static str, error: &'static str, message: String) -> Self {
        FormView {
            form,
            error: Some(error),
            message: Some(message),
        }
    }

    pub fn message<S: Into<String>>(form: &'static str, message: S) -> Self {
        FormView {
            form,
            error: None,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PageView {
    pub page: &'static str,
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i32>,
}

impl PageView {
    pub fn new(page: &'static str, user: Option<UserId>) -> Self {
        PageView {
            page,
            authenticated: user.is_some(),
            user_id: user.map(|UserId(id)| id),
        }
    }
}

fn json_response<T: Serialize>(value: &T) -> HttpResponse {
    match serde_json::to_string(value) {
        Ok(body) => HttpResponse::Ok()
            .content_type("application/json")
            .body(body),
        Err(e) => {
            error!("{}", e);
            HttpResponse::InternalServerError().finish()
        }
    }
}

impl Responder for FormView {
    type Body = BoxBody;

    fn respond_to(self, _req: &HttpRequest) -> HttpResponse<Self::Body> {
        json_response(&self)
    }
}

impl Responder for PageView {
    type Body = BoxBody;

    fn respond_to(self, _req: &HttpRequest) -> HttpResponse<Self::Body> {
        json_response(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_form_omits_error_fields() {
        let json = serde_json::to_value(FormView::blank("login")).unwrap();
        assert_eq!(json, serde_json::json!({ "form": "login" }));
    }

    #[test]
    fn page_reports_user() {
        let json = serde_json::to_value(PageView::new("browse", Some(UserId(7)))).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "page": "browse", "authenticated": true, "user_id": 7 })
        );
    }
}
