#[macro_use]
extern crate diesel;

mod auth;
mod config;
mod error;
mod hash;
mod models;
mod resource;
mod schema;
mod secret;
mod session;
mod store;
mod upload;
mod view;

use actix_identity::IdentityMiddleware;
use actix_web::{cookie::Key, middleware, web, App, HttpServer};
use log::{error, info};
use std::sync::Arc;

use auth::AuthFlow;
use config::Settings;
use error::ConfigError;
use hash::Argon2Hasher;
use secret::Secrets;
use store::{CredentialStore, SqliteStore};
use upload::{ExtensionAllowList, UploadPolicy};

fn open_store(settings: &Settings) -> Result<SqliteStore, ConfigError> {
    let store = SqliteStore::new(store::build_pool(&settings.database_url)?);
    // Create table and index in database if they don't exist
    store.init()?;
    Ok(store)
}

fn exit_on_error<T>(result: Result<T, ConfigError>) -> T {
    match result {
        Ok(v) => v,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("pandas_gallery=info,actix_web=info"),
    )
    .init();

    let settings = exit_on_error(Settings::from_env());
    let secrets = exit_on_error(Secrets::load(&settings.secrets_dir));
    let store = exit_on_error(open_store(&settings));
    info!("using database {}", settings.database_url);

    let flow = web::Data::new(AuthFlow::new(
        Arc::new(store),
        Arc::new(Argon2Hasher::new(secrets.pepper)),
    ));
    let policy: Arc<dyn UploadPolicy> =
        Arc::new(ExtensionAllowList::new(&settings.allowed_extensions));
    let policy = web::Data::from(policy);
    let key = Key::derive_from(&secrets.cookie_key);
    let cookie = settings.cookie.clone();

    info!("Starting HTTP server on {}...", settings.bind_address);
    HttpServer::new(move || {
        App::new()
            .app_data(flow.clone())
            .app_data(policy.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(session::session_middleware(key.clone(), &cookie))
            .wrap(resource::no_cache_headers())
            .wrap(middleware::Logger::default())
            .configure(resource::config)
    })
    .bind(settings.bind_address.as_str())?
    .run()
    .await
}
