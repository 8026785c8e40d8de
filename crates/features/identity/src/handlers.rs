use crate::Identity;
use crate::models::{
    AdminCreate, AdminCreateUser, LoginForm, TokenResponse, UserCreate, UserResponse, UserUpdate,
    UserUpdateResponse,
};
use axum::Json;
use axum::http::StatusCode;
use mcq_derive::api_handler;
use mcq_domain::constants::AUTH_TAG;
use mcq_kernel::prelude::*;
use mcq_kernel::server::ErrorBody;

#[api_handler(
    post,
    path = "/auth/register",
    request_body = UserCreate,
    responses(
        (status = CREATED, description = "User registered", body = UserResponse),
        (status = BAD_REQUEST, description = "Email already registered", body = ErrorBody),
        (status = UNPROCESSABLE_ENTITY, description = "Invalid input", body = ErrorBody),
    ),
    tag = AUTH_TAG,
)]
pub(crate) async fn register(
    Slice(identity): Slice<Identity>,
    ApiJson(body): ApiJson<UserCreate>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = identity.service.register(body).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[api_handler(
    post,
    path = "/auth/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = OK, description = "Access token", body = TokenResponse),
        (status = UNAUTHORIZED, description = "Incorrect email or password", body = ErrorBody),
    ),
    tag = AUTH_TAG,
)]
pub(crate) async fn login(
    Slice(identity): Slice<Identity>,
    ApiForm(form): ApiForm<LoginForm>,
) -> ApiResult<Json<TokenResponse>> {
    let token = identity.service.login(form.username.trim(), &form.password).await?;
    Ok(Json(token))
}

#[api_handler(
    get,
    path = "/auth/me",
    responses(
        (status = OK, description = "The caller's profile", body = UserResponse),
        (status = UNAUTHORIZED, description = "Missing or invalid token", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = AUTH_TAG,
)]
pub(crate) async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}

#[api_handler(
    post,
    path = "/auth/admin/register",
    request_body = AdminCreate,
    responses(
        (status = CREATED, description = "Admin registered", body = UserResponse),
        (status = BAD_REQUEST, description = "Wrong admin secret or email taken", body = ErrorBody),
    ),
    tag = AUTH_TAG,
)]
pub(crate) async fn register_admin(
    Slice(identity): Slice<Identity>,
    ApiJson(body): ApiJson<AdminCreate>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let admin = identity.service.register_admin(body).await?;
    Ok((StatusCode::CREATED, Json(admin.into())))
}

#[api_handler(
    get,
    path = "/auth/admin/me",
    responses(
        (status = OK, description = "The calling admin's profile", body = UserResponse),
        (status = FORBIDDEN, description = "Admin role required", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = AUTH_TAG,
)]
pub(crate) async fn admin_me(AdminUser(admin): AdminUser) -> Json<UserResponse> {
    Json(admin.into())
}

#[api_handler(
    get,
    path = "/auth/users/{user_id}",
    params(("user_id" = i32, Path, description = "User id")),
    responses(
        (status = OK, description = "User profile", body = UserResponse),
        (status = FORBIDDEN, description = "Neither the user nor an admin", body = ErrorBody),
        (status = NOT_FOUND, description = "User not found", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = AUTH_TAG,
)]
pub(crate) async fn get_user(
    Slice(identity): Slice<Identity>,
    caller: CurrentUser,
    ApiPath(user_id): ApiPath<i32>,
) -> ApiResult<Json<UserResponse>> {
    let user = identity.service.get_user(&caller, user_id).await?;
    Ok(Json(user.into()))
}

#[api_handler(
    patch,
    path = "/auth/users/{user_id}",
    params(("user_id" = i32, Path, description = "User id")),
    request_body = UserUpdate,
    responses(
        (status = OK, description = "Updated profile", body = UserUpdateResponse),
        (status = BAD_REQUEST, description = "Phone number already registered", body = ErrorBody),
        (status = FORBIDDEN, description = "Neither the user nor an admin", body = ErrorBody),
        (status = NOT_FOUND, description = "User not found", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = AUTH_TAG,
)]
pub(crate) async fn update_user(
    Slice(identity): Slice<Identity>,
    caller: CurrentUser,
    ApiPath(user_id): ApiPath<i32>,
    ApiJson(body): ApiJson<UserUpdate>,
) -> ApiResult<Json<UserUpdateResponse>> {
    let user = identity.service.update_user(&caller, user_id, body).await?;
    Ok(Json(user.into()))
}

#[api_handler(
    post,
    path = "/auth/admin/create-user",
    request_body = AdminCreateUser,
    responses(
        (status = CREATED, description = "User created", body = UserResponse),
        (status = BAD_REQUEST, description = "Email already registered", body = ErrorBody),
        (status = FORBIDDEN, description = "Admin role required", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = AUTH_TAG,
)]
pub(crate) async fn create_user(
    Slice(identity): Slice<Identity>,
    AdminUser(admin): AdminUser,
    ApiJson(body): ApiJson<AdminCreateUser>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = identity.service.create_user(body).await?;
    tracing::info!(admin_id = admin.id, user_id = user.id, "Admin created user");
    Ok((StatusCode::CREATED, Json(user.into())))
}
