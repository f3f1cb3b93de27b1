use actix_session::{config::PersistentSession, storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::{Key, SameSite};
use actix_web::http::header;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;
use env_logger::Env;
use guildhall::config::create_flag_store;
use guildhall::middleware::ClientCtx;
use rand::{distributions::Alphanumeric, Rng};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_lib_mods();
    guildhall::app_config::init();

    let config = guildhall::app_config::get_config();
    let database_url = config
        .database_url()
        .context("No database configured; set GUILDHALL_DATABASE__URL or DATABASE_URL")?;
    let db = guildhall::db::connect(database_url)
        .await
        .context("Failed to connect to the database")?;

    let flags = create_flag_store();
    if let Err(e) = flags.load_from_database(&db).await {
        log::warn!("Feature flags unavailable, using configured defaults: {}", e);
    }

    let secret_key = session_key(&config.server.secret_key);
    let secure_cookies = config.server.secure_cookies;
    let db = Data::new(db);
    let flags = Data::new(flags);

    log::info!("Listening on {}", config.server.bind_address);

    HttpServer::new(move || {
        // Middleware runs in reverse order of registration.
        App::new()
            .configure(guildhall::web::mount(db.clone(), flags.clone()))
            .wrap(
                DefaultHeaders::new()
                    .add((header::X_FRAME_OPTIONS, "DENY"))
                    .add((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
                    .add(("Referrer-Policy", "strict-origin-when-cross-origin")),
            )
            .wrap(ClientCtx::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_same_site(SameSite::Lax)
                    .cookie_secure(secure_cookies)
                    .session_lifecycle(PersistentSession::default())
                    .build(),
            )
            .wrap(Logger::new("%a %r %s %T"))
    })
    .bind(&config.server.bind_address)?
    .run()
    .await?;

    Ok(())
}

/// Session cookies are signed with the configured key. A missing or short
/// key is replaced by a random one, which logs everybody out on restart.
fn session_key(configured: &str) -> Key {
    if configured.len() >= 64 {
        return Key::from(configured.as_bytes());
    }

    let random_string: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect();
    log::warn!(
        "server.secret_key is missing or shorter than 64 bytes. Session cookies will be \
         invalidated every time the application restarts. Need a key? How about:\n{}",
        random_string
    );
    Key::from(random_string.as_bytes())
}

/// Initialize third party crates we rely on but don't have control over.
fn init_lib_mods() {
    // A missing .env is normal in production.
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
}
