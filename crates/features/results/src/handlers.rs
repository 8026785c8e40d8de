use crate::Results;
use crate::models::{AnswerSheet, ResultResponse, SubmissionResponse, SubmitRequest};
use axum::Json;
use axum::http::StatusCode;
use mcq_derive::api_handler;
use mcq_domain::constants::{RESULTS_TAG, TEST_PAPERS_TAG};
use mcq_kernel::prelude::*;
use mcq_kernel::server::ErrorBody;

fn listing(results: Vec<mcq_database::entities::result::Model>) -> Json<Vec<ResultResponse>> {
    Json(results.into_iter().map(Into::into).collect())
}

#[api_handler(
    post,
    path = "/results/submit",
    request_body = SubmitRequest,
    responses(
        (status = OK, description = "Scored submission", body = SubmissionResponse),
        (status = BAD_REQUEST, description = "Test paper has no questions", body = ErrorBody),
        (status = FORBIDDEN, description = "Submitting for another user", body = ErrorBody),
        (status = NOT_FOUND, description = "Test paper not found", body = ErrorBody),
        (status = UNPROCESSABLE_ENTITY, description = "Malformed answer sheet", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = RESULTS_TAG,
)]
pub(crate) async fn submit_result(
    Slice(results): Slice<Results>,
    caller: CurrentUser,
    ApiJson(body): ApiJson<SubmitRequest>,
) -> ApiResult<Json<SubmissionResponse>> {
    let (stored, score) =
        results.service.submit(&caller, body.user_id, body.test_paper_id, body.user_answers).await?;
    Ok(Json(SubmissionResponse::new(stored, &score)))
}

#[api_handler(
    post,
    path = "/test-papers/{test_paper_id}/submit",
    params(("test_paper_id" = i32, Path, description = "Test paper id")),
    request_body = AnswerSheet,
    responses(
        (status = OK, description = "Scored submission of the caller", body = SubmissionResponse),
        (status = BAD_REQUEST, description = "Test paper has no questions", body = ErrorBody),
        (status = NOT_FOUND, description = "Test paper not found", body = ErrorBody),
        (status = UNPROCESSABLE_ENTITY, description = "Malformed answer sheet", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = TEST_PAPERS_TAG,
)]
pub(crate) async fn submit_test_paper(
    Slice(results): Slice<Results>,
    caller: CurrentUser,
    ApiPath(test_paper_id): ApiPath<i32>,
    ApiJson(AnswerSheet(sheet)): ApiJson<AnswerSheet>,
) -> ApiResult<Json<SubmissionResponse>> {
    let user_id = caller.0.id;
    let (stored, score) = results.service.submit(&caller, user_id, test_paper_id, sheet).await?;
    Ok(Json(SubmissionResponse::new(stored, &score)))
}

#[api_handler(
    get,
    path = "/results/my-results",
    responses(
        (status = OK, description = "The caller's results, newest first", body = [ResultResponse]),
        (status = UNAUTHORIZED, description = "Missing or invalid token", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = RESULTS_TAG,
)]
pub(crate) async fn my_results(
    Slice(results): Slice<Results>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<Vec<ResultResponse>>> {
    Ok(listing(results.service.for_user(user.id).await?))
}

#[api_handler(
    get,
    path = "/results/users/{user_id}",
    params(("user_id" = i32, Path, description = "User id")),
    responses(
        (status = OK, description = "Results of the user", body = [ResultResponse]),
        (status = FORBIDDEN, description = "Admin role required", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = RESULTS_TAG,
)]
pub(crate) async fn user_results(
    Slice(results): Slice<Results>,
    AdminUser(_): AdminUser,
    ApiPath(user_id): ApiPath<i32>,
) -> ApiResult<Json<Vec<ResultResponse>>> {
    Ok(listing(results.service.for_user(user_id).await?))
}

#[api_handler(
    get,
    path = "/results/test-papers/{test_paper_id}",
    params(("test_paper_id" = i32, Path, description = "Test paper id")),
    responses(
        (status = OK, description = "Results of the test paper", body = [ResultResponse]),
        (status = FORBIDDEN, description = "Admin role required", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = RESULTS_TAG,
)]
pub(crate) async fn paper_results(
    Slice(results): Slice<Results>,
    AdminUser(_): AdminUser,
    ApiPath(test_paper_id): ApiPath<i32>,
) -> ApiResult<Json<Vec<ResultResponse>>> {
    Ok(listing(results.service.for_paper(test_paper_id).await?))
}

#[api_handler(
    get,
    path = "/results/{result_id}",
    params(("result_id" = i32, Path, description = "Result id")),
    responses(
        (status = OK, description = "The result", body = ResultResponse),
        (status = FORBIDDEN, description = "Neither the owner nor an admin", body = ErrorBody),
        (status = NOT_FOUND, description = "Result not found", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = RESULTS_TAG,
)]
pub(crate) async fn get_result(
    Slice(results): Slice<Results>,
    caller: CurrentUser,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<Json<ResultResponse>> {
    Ok(Json(results.service.get(&caller, id).await?.into()))
}

#[api_handler(
    delete,
    path = "/results/{result_id}",
    params(("result_id" = i32, Path, description = "Result id")),
    responses(
        (status = NO_CONTENT, description = "Result deleted"),
        (status = FORBIDDEN, description = "Admin role required", body = ErrorBody),
        (status = NOT_FOUND, description = "Result not found", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = RESULTS_TAG,
)]
pub(crate) async fn delete_result(
    Slice(results): Slice<Results>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<StatusCode> {
    results.service.delete(id).await?;
    tracing::info!(admin_id = admin.id, result_id = id, "Admin deleted result");
    Ok(StatusCode::NO_CONTENT)
}
