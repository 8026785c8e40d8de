use crate::TestPapers;
use crate::models::{TestPaperCreate, TestPaperResponse, TestPaperUpdate};
use axum::Json;
use axum::http::StatusCode;
use mcq_derive::api_handler;
use mcq_domain::constants::TEST_PAPERS_TAG;
use mcq_kernel::prelude::*;
use mcq_kernel::server::ErrorBody;

#[api_handler(
    post,
    path = "/test-papers",
    request_body = TestPaperCreate,
    responses(
        (status = CREATED, description = "Test paper created", body = TestPaperResponse),
        (status = FORBIDDEN, description = "Admin role required", body = ErrorBody),
        (status = UNPROCESSABLE_ENTITY, description = "Invalid input", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = TEST_PAPERS_TAG,
)]
pub(crate) async fn create_test_paper(
    Slice(papers): Slice<TestPapers>,
    AdminUser(_): AdminUser,
    ApiJson(body): ApiJson<TestPaperCreate>,
) -> ApiResult<(StatusCode, Json<TestPaperResponse>)> {
    let paper = papers.service.create(body).await?;
    Ok((StatusCode::CREATED, Json(paper)))
}

#[api_handler(
    get,
    path = "/test-papers",
    responses(
        (status = OK, description = "All test papers", body = [TestPaperResponse]),
        (status = UNAUTHORIZED, description = "Missing or invalid token", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = TEST_PAPERS_TAG,
)]
pub(crate) async fn list_test_papers(
    Slice(papers): Slice<TestPapers>,
    _caller: CurrentUser,
) -> ApiResult<Json<Vec<TestPaperResponse>>> {
    Ok(Json(papers.service.list().await?))
}

#[api_handler(
    get,
    path = "/test-papers/{test_paper_id}",
    params(("test_paper_id" = i32, Path, description = "Test paper id")),
    responses(
        (status = OK, description = "The test paper", body = TestPaperResponse),
        (status = NOT_FOUND, description = "Test paper not found", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = TEST_PAPERS_TAG,
)]
pub(crate) async fn get_test_paper(
    Slice(papers): Slice<TestPapers>,
    _caller: CurrentUser,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<Json<TestPaperResponse>> {
    Ok(Json(papers.service.get(id).await?))
}

#[api_handler(
    put,
    path = "/test-papers/{test_paper_id}",
    params(("test_paper_id" = i32, Path, description = "Test paper id")),
    request_body = TestPaperUpdate,
    responses(
        (status = OK, description = "Updated test paper", body = TestPaperResponse),
        (status = FORBIDDEN, description = "Admin role required", body = ErrorBody),
        (status = NOT_FOUND, description = "Test paper not found", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = TEST_PAPERS_TAG,
)]
pub(crate) async fn update_test_paper(
    Slice(papers): Slice<TestPapers>,
    AdminUser(_): AdminUser,
    ApiPath(id): ApiPath<i32>,
    ApiJson(body): ApiJson<TestPaperUpdate>,
) -> ApiResult<Json<TestPaperResponse>> {
    Ok(Json(papers.service.update(id, body).await?))
}

#[api_handler(
    delete,
    path = "/test-papers/{test_paper_id}",
    params(("test_paper_id" = i32, Path, description = "Test paper id")),
    responses(
        (status = NO_CONTENT, description = "Test paper deleted with its questions and results"),
        (status = FORBIDDEN, description = "Admin role required", body = ErrorBody),
        (status = NOT_FOUND, description = "Test paper not found", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = TEST_PAPERS_TAG,
)]
pub(crate) async fn delete_test_paper(
    Slice(papers): Slice<TestPapers>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<StatusCode> {
    papers.service.delete(id).await?;
    tracing::info!(admin_id = admin.id, test_paper_id = id, "Admin deleted test paper");
    Ok(StatusCode::NO_CONTENT)
}
