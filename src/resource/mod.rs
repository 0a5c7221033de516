pub mod login;
pub mod logout;
pub mod pages;
pub mod register;
pub mod upload;

use actix_web::{http::header, middleware::DefaultHeaders, web, HttpResponse};

/// Routes (keep updated!)
/// - /             GET: index
/// - /browse       GET: browse page, login required
/// - /upload       GET: upload form, POST multipart `imagefile`; login required
/// - /register     GET: form, POST { username, password, confirmation }
/// - /login        GET: form, POST { username, password }; both log out first
/// - /logout       GET: log out, back to /
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(pages::index)))
        .service(web::resource("/browse").route(web::get().to(pages::browse)))
        .service(
            web::resource("/upload")
                .route(web::get().to(upload::form))
                .route(web::post().to(upload::upload)),
        )
        .service(
            web::resource("/register")
                .route(web::get().to(register::form))
                .route(web::post().to(register::register)),
        )
        .service(
            web::resource("/login")
                .route(web::get().to(login::form))
                .route(web::post().to(login::login)),
        )
        .service(web::resource("/logout").route(web::get().to(logout::logout)));
}

/// Ensure responses aren't cached.
pub fn no_cache_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add((header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"))
        .add((header::EXPIRES, "0"))
        .add((header::PRAGMA, "no-cache"))
}

pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}
