//! HTTP handlers and route configuration.

mod auth;
mod health;
mod posts;

use actix_web::web;

use crate::middleware::error::AppError;

/// Where signup sends the client to resubmit its credentials.
pub const LOGIN_PATH: &str = "/api/login";

/// A request body sent either as JSON or as an HTML form.
pub type Body<T> = web::Either<web::Json<T>, web::Form<T>>;

pub fn payload<T>(body: Body<T>) -> T {
    match body {
        web::Either::Left(json) => json.into_inner(),
        web::Either::Right(form) => form.into_inner(),
    }
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::FormConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .route("/logout", web::get().to(auth::logout))
    .service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Session routes
            .route("/user_data", web::get().to(auth::user_data))
            .route("/signup", web::post().to(auth::signup))
            .route("/login", web::post().to(auth::login))
            // Feed routes
            .route("/all", web::get().to(posts::list_posts))
            .route("/new", web::post().to(posts::create_post)),
    );
}
