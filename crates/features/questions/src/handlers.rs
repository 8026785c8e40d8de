use crate::Questions;
use crate::models::{QuestionCreate, QuestionFilter, QuestionResponse, QuestionUpdate};
use axum::Json;
use axum::http::StatusCode;
use mcq_derive::api_handler;
use mcq_domain::constants::QUESTIONS_TAG;
use mcq_kernel::prelude::*;
use mcq_kernel::server::ErrorBody;

#[api_handler(
    post,
    path = "/questions",
    request_body = QuestionCreate,
    responses(
        (status = CREATED, description = "Question created", body = QuestionResponse),
        (status = FORBIDDEN, description = "Admin role required", body = ErrorBody),
        (status = NOT_FOUND, description = "Test paper not found", body = ErrorBody),
        (status = UNPROCESSABLE_ENTITY, description = "Invalid options or answer key", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = QUESTIONS_TAG,
)]
pub(crate) async fn create_question(
    Slice(questions): Slice<Questions>,
    AdminUser(_): AdminUser,
    ApiJson(body): ApiJson<QuestionCreate>,
) -> ApiResult<(StatusCode, Json<QuestionResponse>)> {
    let question = questions.service.create(body).await?;
    Ok((StatusCode::CREATED, Json(question.into())))
}

#[api_handler(
    get,
    path = "/questions",
    params(("test_paper_id" = Option<i32>, Query, description = "Only questions of this test paper")),
    responses(
        (status = OK, description = "Questions", body = [QuestionResponse]),
        (status = UNAUTHORIZED, description = "Missing or invalid token", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = QUESTIONS_TAG,
)]
pub(crate) async fn list_questions(
    Slice(questions): Slice<Questions>,
    _caller: CurrentUser,
    ApiQuery(filter): ApiQuery<QuestionFilter>,
) -> ApiResult<Json<Vec<QuestionResponse>>> {
    let list = questions.service.list(filter.test_paper_id).await?;
    Ok(Json(list.into_iter().map(Into::into).collect()))
}

#[api_handler(
    get,
    path = "/questions/{question_id}",
    params(("question_id" = i32, Path, description = "Question id")),
    responses(
        (status = OK, description = "The question", body = QuestionResponse),
        (status = NOT_FOUND, description = "Question not found", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = QUESTIONS_TAG,
)]
pub(crate) async fn get_question(
    Slice(questions): Slice<Questions>,
    _caller: CurrentUser,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<Json<QuestionResponse>> {
    Ok(Json(questions.service.get(id).await?.into()))
}

#[api_handler(
    put,
    path = "/questions/{question_id}",
    params(("question_id" = i32, Path, description = "Question id")),
    request_body = QuestionUpdate,
    responses(
        (status = OK, description = "Updated question", body = QuestionResponse),
        (status = FORBIDDEN, description = "Admin role required", body = ErrorBody),
        (status = NOT_FOUND, description = "Question or test paper not found", body = ErrorBody),
        (status = UNPROCESSABLE_ENTITY, description = "Invalid options or answer key", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = QUESTIONS_TAG,
)]
pub(crate) async fn update_question(
    Slice(questions): Slice<Questions>,
    AdminUser(_): AdminUser,
    ApiPath(id): ApiPath<i32>,
    ApiJson(body): ApiJson<QuestionUpdate>,
) -> ApiResult<Json<QuestionResponse>> {
    Ok(Json(questions.service.update(id, body).await?.into()))
}

#[api_handler(
    delete,
    path = "/questions/{question_id}",
    params(("question_id" = i32, Path, description = "Question id")),
    responses(
        (status = NO_CONTENT, description = "Question deleted"),
        (status = FORBIDDEN, description = "Admin role required", body = ErrorBody),
        (status = NOT_FOUND, description = "Question not found", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = QUESTIONS_TAG,
)]
pub(crate) async fn delete_question(
    Slice(questions): Slice<Questions>,
    AdminUser(_): AdminUser,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<StatusCode> {
    questions.service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
