//! User endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{delete, get, post, put},
    Json, Router,
};
use mmdb_core::{NewSkill, NewUser, User, UserPatch};
use serde::Deserialize;

use crate::http::error::ApiError;
use crate::http::extractors::JsonBody;
use crate::http::server::AppState;

/// Create user request
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateUserRequest {
    pub name: String,
    pub location: String,
}

/// Body carrying only a user id
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserIdRequest {
    pub uuid: String,
}

/// Partial update; empty fields are left unchanged
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateUserRequest {
    pub uuid: String,
    pub name: String,
    pub location: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddSkillRequest {
    pub uuid: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub level: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RemoveSkillRequest {
    pub user_uuid: String,
    pub skill_uuid: String,
}

/// POST /users/create
async fn create_user(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateUserRequest>,
) -> Result<Json<User>, ApiError> {
    let user = state
        .records
        .users
        .create(NewUser::new(req.name, req.location))
        .await?;
    Ok(Json(user))
}

/// GET /users
async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.records.users.list().await?))
}

/// POST /user - fetch one user by id
async fn get_user(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<UserIdRequest>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.records.users.find(&req.uuid).await?))
}

/// PUT /users/update
async fn update_user(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    let patch = UserPatch::new(req.name, req.location);
    Ok(Json(state.records.users.update(&req.uuid, patch).await?))
}

/// DELETE /users/delete
async fn delete_user(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<UserIdRequest>,
) -> Result<&'static str, ApiError> {
    state.records.users.delete(&req.uuid).await?;
    Ok("User deleted")
}

/// POST /users/add-skill
async fn add_skill(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<AddSkillRequest>,
) -> Result<Json<User>, ApiError> {
    let skill = NewSkill::new(req.kind, req.level);
    Ok(Json(state.records.users.add_skill(&req.uuid, skill).await?))
}

/// POST /users/remove-skill
async fn remove_skill(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<RemoveSkillRequest>,
) -> Result<Json<User>, ApiError> {
    let user = state
        .records
        .users
        .remove_skill(&req.user_uuid, &req.skill_uuid)
        .await?;
    Ok(Json(user))
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/create", post(create_user))
        .route("/user", post(get_user))
        .route("/users/update", put(update_user))
        .route("/users/delete", delete(delete_user))
        .route("/users/add-skill", post(add_skill))
        .route("/users/remove-skill", post(remove_skill))
}
