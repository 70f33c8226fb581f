//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Request to sign up. Either field may be missing or `null`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Request to login.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// A user's public profile. Never carries credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
}

/// Body of the current-user query: the profile, or `{}` when anonymous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CurrentUserResponse {
    Authenticated(UserResponse),
    Anonymous {},
}

/// Request to create a post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub user_id: Option<UserIdField>,
}

/// A user id as clients send it: a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserIdField {
    Number(i64),
    Text(String),
}

/// Error for a `user_id` that is not an integer.
#[derive(Debug, thiserror::Error)]
#[error("user_id must be an integer, got {0:?}")]
pub struct InvalidUserId(pub String);

impl UserIdField {
    pub fn to_id(&self) -> Result<i64, InvalidUserId> {
        match self {
            UserIdField::Number(id) => Ok(*id),
            UserIdField::Text(raw) => raw
                .trim()
                .parse()
                .map_err(|_| InvalidUserId(raw.clone())),
        }
    }
}

/// A post as listed in the feed. `user_id` is rendered as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i64,
    pub text: String,
    pub user_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_anonymous_serializes_as_empty_object() {
        let body = serde_json::to_value(CurrentUserResponse::Anonymous {}).unwrap();
        assert_eq!(body, json!({}));
    }

    #[test]
    fn test_authenticated_serializes_profile_only() {
        let body = serde_json::to_value(CurrentUserResponse::Authenticated(UserResponse {
            id: 1,
            email: "test@test.com".to_string(),
        }))
        .unwrap();
        assert_eq!(body, json!({ "id": 1, "email": "test@test.com" }));
    }

    #[test]
    fn test_signup_accepts_null_password() {
        let req: SignupRequest =
            serde_json::from_value(json!({ "email": "a@b.com", "password": null })).unwrap();
        assert_eq!(req.email.as_deref(), Some("a@b.com"));
        assert!(req.password.is_none());

        let req: SignupRequest = serde_json::from_value(json!({})).unwrap();
        assert!(req.email.is_none());
    }

    #[test]
    fn test_user_id_field_accepts_number_or_string() {
        let req: CreatePostRequest =
            serde_json::from_value(json!({ "text": "t", "user_id": 1 })).unwrap();
        assert_eq!(req.user_id.unwrap().to_id().unwrap(), 1);

        let req: CreatePostRequest =
            serde_json::from_value(json!({ "text": "t", "user_id": "12" })).unwrap();
        assert_eq!(req.user_id.unwrap().to_id().unwrap(), 12);

        let bad = UserIdField::Text("abc".to_string());
        assert!(bad.to_id().is_err());
    }

    #[test]
    fn test_post_response_user_id_is_string() {
        let body = serde_json::to_value(PostResponse {
            id: 1,
            text: "test".to_string(),
            user_id: "1".to_string(),
        })
        .unwrap();
        assert_eq!(body["user_id"], json!("1"));
    }
}
