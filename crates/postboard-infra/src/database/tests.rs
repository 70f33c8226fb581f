use chrono::Utc;
use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, RuntimeErr};

use postboard_core::domain::{NewPost, NewUser, Post, User};
use postboard_core::error::RepoError;
use postboard_core::ports::{BaseRepository, PostRepository, UserRepository};

use crate::database::entity::{post, user};
use crate::database::postgres_repo::{PostgresPostRepository, PostgresUserRepository};

fn user_model(id: i64, email: &str) -> user::Model {
    user::Model {
        id,
        email: email.to_owned(),
        password_hash: "$argon2id$hash".to_owned(),
        created_at: Utc::now().into(),
    }
}

fn post_model(id: i64, text: &str, user_id: i64) -> post::Model {
    post::Model {
        id,
        text: text.to_owned(),
        user_id,
        created_at: Utc::now().into(),
    }
}

#[tokio::test]
async fn test_insert_user_returns_assigned_id() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user_model(1, "test@test.com")]])
        .into_connection();
    let repo = PostgresUserRepository::new(db);

    let user: User = repo
        .insert(NewUser::new("test@test.com", "$argon2id$hash"))
        .await
        .unwrap();

    assert_eq!(user.id, 1);
    assert_eq!(user.email, "test@test.com");
}

#[tokio::test]
async fn test_duplicate_email_maps_to_constraint() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([DbErr::Query(RuntimeErr::Internal(
            "duplicate key value violates unique constraint \"users_email_key\"".to_owned(),
        ))])
        .into_connection();
    let repo = PostgresUserRepository::new(db);

    let result: Result<User, RepoError> = repo
        .insert(NewUser::new("test@test.com", "$argon2id$hash"))
        .await;

    assert!(matches!(result, Err(RepoError::Constraint(_))));
}

#[tokio::test]
async fn test_find_user_by_email() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user_model(3, "a@test.com")]])
        .append_query_results([Vec::<user::Model>::new()])
        .into_connection();
    let repo = PostgresUserRepository::new(db);

    let found = repo.find_by_email("a@test.com").await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(3));

    let missing = repo.find_by_email("b@test.com").await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_find_user_by_id() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user_model(1, "a@test.com")]])
        .into_connection();
    let repo = PostgresUserRepository::new(db);

    let user = repo.find_by_id(1).await.unwrap().unwrap();
    assert_eq!(user.email, "a@test.com");
}

#[tokio::test]
async fn test_list_posts() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(1, "first", 1), post_model(2, "second", 9)]])
        .into_connection();
    let repo = PostgresPostRepository::new(db);

    let posts = repo.list().await.unwrap();
    let texts: Vec<_> = posts.iter().map(|p| (p.text.as_str(), p.user_id)).collect();
    assert_eq!(texts, vec![("first", 1), ("second", 9)]);
}

#[tokio::test]
async fn test_insert_post() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(1, "test", 1)]])
        .into_connection();
    let repo = PostgresPostRepository::new(db);

    let post: Post = repo.insert(NewPost::new("test", 1)).await.unwrap();
    assert_eq!(post.id, 1);
    assert_eq!(post.text, "test");
}

#[tokio::test]
async fn test_reset_truncates_table() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();
    let repo = PostgresPostRepository::new(db);

    BaseRepository::<Post, NewPost>::reset(&repo).await.unwrap();
}
