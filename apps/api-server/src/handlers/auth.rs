//! Authentication handlers.

use actix_web::{HttpResponse, http::header, web};

use postboard_core::domain::{AuthState, User};
use postboard_shared::dto::{CurrentUserResponse, LoginRequest, SignupRequest, UserResponse};

use super::{Body, LOGIN_PATH, payload};
use crate::middleware::error::AppResult;
use crate::middleware::session::{ClientSession, removal_cookie, session_cookie};
use crate::state::AppState;

fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        email: user.email.clone(),
    }
}

/// GET /api/user_data
///
/// The logged-in user's profile, or `{}` for an anonymous conversation.
pub async fn user_data(state: web::Data<AppState>, session: ClientSession) -> HttpResponse {
    let body = match state.auth.current_user(session.token()).await {
        AuthState::Authenticated(user) => CurrentUserResponse::Authenticated(user_response(&user)),
        AuthState::Anonymous => CurrentUserResponse::Anonymous {},
    };

    HttpResponse::Ok().json(body)
}

/// POST /api/signup
///
/// Creates the account and redirects the client to resubmit to login.
pub async fn signup(state: web::Data<AppState>, body: Body<SignupRequest>) -> AppResult<HttpResponse> {
    let req = payload(body);

    state
        .auth
        .signup(req.email.as_deref(), req.password.as_deref())
        .await?;

    Ok(HttpResponse::TemporaryRedirect()
        .insert_header((header::LOCATION, LOGIN_PATH))
        .finish())
}

/// POST /api/login
pub async fn login(
    state: web::Data<AppState>,
    session: ClientSession,
    body: Body<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = payload(body);

    let login = state
        .auth
        .login(req.email.as_deref(), req.password.as_deref(), session.token())
        .await?;

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&state.session, &login.token))
        .json(user_response(&login.user)))
}

/// GET /logout
///
/// Always succeeds; the client ends up anonymous even if the session
/// backend could not be reached.
pub async fn logout(state: web::Data<AppState>, session: ClientSession) -> HttpResponse {
    if let Err(e) = state.auth.logout(session.token()).await {
        tracing::error!(error = %e, "Failed to end session");
    }

    HttpResponse::Found()
        .insert_header((header::LOCATION, "/"))
        .cookie(removal_cookie(&state.session))
        .finish()
}
