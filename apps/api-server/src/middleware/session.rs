//! Session cookie extractor and cookie builders.

use actix_web::cookie::{Cookie, SameSite, time};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use std::future::{Ready, ready};

use postboard_core::domain::SessionToken;

use crate::config::{DEFAULT_COOKIE_NAME, SessionConfig};
use crate::state::AppState;

/// The session token presented by the client, if any.
///
/// Never rejects a request: a missing or malformed cookie is simply
/// no token, and the conversation is anonymous.
///
/// ```ignore
/// async fn whoami(state: web::Data<AppState>, session: ClientSession) -> impl Responder {
///     state.auth.current_user(session.token()).await
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClientSession(pub Option<SessionToken>);

impl ClientSession {
    pub fn token(&self) -> Option<&SessionToken> {
        self.0.as_ref()
    }
}

impl FromRequest for ClientSession {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let cookie_name = match req.app_data::<web::Data<AppState>>() {
            Some(state) => state.session.cookie_name.clone(),
            None => {
                tracing::error!("AppState not found in app data");
                DEFAULT_COOKIE_NAME.to_string()
            }
        };

        let token = req.cookie(&cookie_name).and_then(|cookie| {
            let parsed = SessionToken::parse(cookie.value());
            if parsed.is_none() {
                tracing::debug!("Ignoring malformed session cookie");
            }
            parsed
        });

        ready(Ok(ClientSession(token)))
    }
}

/// Cookie carrying a freshly issued session token.
pub fn session_cookie(config: &SessionConfig, token: &SessionToken) -> Cookie<'static> {
    let mut builder = Cookie::build(config.cookie_name.clone(), token.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure);

    if let Some(ttl) = config.ttl {
        let secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        builder = builder.max_age(time::Duration::seconds(secs));
    }

    builder.finish()
}

/// Cookie instructing the client to drop its session token.
pub fn removal_cookie(config: &SessionConfig) -> Cookie<'static> {
    let mut cookie = Cookie::build(config.cookie_name.clone(), "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .finish();
    cookie.make_removal();
    cookie
}
