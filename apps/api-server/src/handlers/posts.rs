//! Post feed handlers.

use actix_web::{HttpResponse, web};

use postboard_core::domain::{Post, PostDraft};
use postboard_shared::dto::{CreatePostRequest, PostResponse, UserIdField};

use super::{Body, payload};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn post_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        text: post.text,
        user_id: post.user_id.to_string(),
    }
}

/// GET /api/all
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list_posts().await?;
    let body: Vec<PostResponse> = posts.into_iter().map(post_response).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// POST /api/new
///
/// The author is whatever `user_id` the client claims; it is not checked
/// against the session.
pub async fn create_post(
    state: web::Data<AppState>,
    body: Body<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = payload(body);

    let user_id = req
        .user_id
        .as_ref()
        .map(UserIdField::to_id)
        .transpose()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let post = state
        .posts
        .create_post(PostDraft {
            text: req.text,
            user_id,
        })
        .await?;

    Ok(HttpResponse::Ok().json(post_response(post)))
}
