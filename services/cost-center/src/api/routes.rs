//! 成本中心路由

use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::rejection::{FormRejection, QueryRejection},
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use pms_errors::AppResult;
use tracing::info;

use super::forms::{
    CostCenterForm, DeleteForm, ListParams, ParentCandidatesParams, form_payload, query_payload,
};
use super::responses::{
    CostCenterDetailResponse, CostCenterNodeResponse, CostCenterOptionResponse,
    CostCenterPageResponse, CostCenterResponse,
};
use crate::application::{
    CostCenterCommandHandler, CostCenterQueryHandler, CreateCostCenterCommand,
    DeleteCostCenterCommand, GetCostCenterQuery, ListCostCentersQuery, ListParentCandidatesQuery,
    UpdateCostCenterCommand,
};
use crate::domain::repositories::CostCenterRepository;

/// 路由共享状态
pub struct CostCenterState<R>
where
    R: CostCenterRepository,
{
    commands: Arc<CostCenterCommandHandler<R>>,
    queries: Arc<CostCenterQueryHandler<R>>,
}

impl<R> CostCenterState<R>
where
    R: CostCenterRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            commands: Arc::new(CostCenterCommandHandler::new(repo.clone())),
            queries: Arc::new(CostCenterQueryHandler::new(repo)),
        }
    }
}

impl<R> Clone for CostCenterState<R>
where
    R: CostCenterRepository,
{
    fn clone(&self) -> Self {
        Self {
            commands: self.commands.clone(),
            queries: self.queries.clone(),
        }
    }
}

/// 成本中心路由
pub fn cost_center_routes<R>(repo: Arc<R>) -> Router
where
    R: CostCenterRepository + 'static,
{
    Router::new()
        .route(
            "/cost-centers",
            get(list_cost_centers::<R>).post(create_cost_center::<R>),
        )
        .route("/cost-centers/all", get(list_all::<R>))
        .route("/cost-centers/active", get(list_active::<R>))
        .route("/cost-centers/tree", get(get_tree::<R>))
        .route("/cost-centers/parents", get(list_parent_candidates::<R>))
        .route("/cost-centers/delete", post(delete_cost_center::<R>))
        .route(
            "/cost-centers/{id}",
            get(get_cost_center::<R>).post(update_cost_center::<R>),
        )
        .with_state(CostCenterState::new(repo))
}

async fn list_cost_centers<R: CostCenterRepository>(
    State(state): State<CostCenterState<R>>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> AppResult<Json<CostCenterPageResponse>> {
    let params = query_payload(params)?;
    let query =
        ListCostCentersQuery::parse(params.page.as_deref(), params.page_size.as_deref())?;
    let page = state.queries.handle_list(query).await?;
    Ok(Json(page.into()))
}

async fn create_cost_center<R: CostCenterRepository>(
    State(state): State<CostCenterState<R>>,
    form: Result<Form<CostCenterForm>, FormRejection>,
) -> AppResult<(StatusCode, Json<CostCenterResponse>)> {
    let form = form_payload(form)?;
    info!(name = ?form.name, "Create cost center request");

    let cmd = CreateCostCenterCommand::parse(&form.fields())?;
    let center = state.commands.handle_create(cmd).await?;
    Ok((StatusCode::CREATED, Json((&center).into())))
}

async fn get_cost_center<R: CostCenterRepository>(
    State(state): State<CostCenterState<R>>,
    Path(id): Path<String>,
) -> AppResult<Json<CostCenterDetailResponse>> {
    let query = GetCostCenterQuery::parse(&id)?;
    let detail = state.queries.handle_get(query).await?;
    Ok(Json(detail.into()))
}

async fn update_cost_center<R: CostCenterRepository>(
    State(state): State<CostCenterState<R>>,
    Path(id): Path<String>,
    form: Result<Form<CostCenterForm>, FormRejection>,
) -> AppResult<Json<CostCenterResponse>> {
    let form = form_payload(form)?;
    info!(%id, "Update cost center request");

    let id = GetCostCenterQuery::parse(&id)?.id;
    let cmd = UpdateCostCenterCommand::parse(id, &form.fields(), form.is_active.as_deref())?;
    let center = state.commands.handle_update(cmd).await?;
    Ok(Json((&center).into()))
}

async fn delete_cost_center<R: CostCenterRepository>(
    State(state): State<CostCenterState<R>>,
    form: Result<Form<DeleteForm>, FormRejection>,
) -> AppResult<StatusCode> {
    let form = form_payload(form)?;
    info!(id = ?form.id, "Delete cost center request");

    let cmd = DeleteCostCenterCommand::parse(form.id.as_deref())?;
    state.commands.handle_delete(cmd).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_parent_candidates<R: CostCenterRepository>(
    State(state): State<CostCenterState<R>>,
    params: Result<Query<ParentCandidatesParams>, QueryRejection>,
) -> AppResult<Json<Vec<CostCenterOptionResponse>>> {
    let params = query_payload(params)?;
    let query = ListParentCandidatesQuery::parse(params.exclude_id.as_deref())?;
    let options = state.queries.handle_parent_candidates(query).await?;
    Ok(Json(options.into_iter().map(Into::into).collect()))
}

async fn list_active<R: CostCenterRepository>(
    State(state): State<CostCenterState<R>>,
) -> AppResult<Json<Vec<CostCenterOptionResponse>>> {
    let options = state.queries.handle_active().await?;
    Ok(Json(options.into_iter().map(Into::into).collect()))
}

async fn list_all<R: CostCenterRepository>(
    State(state): State<CostCenterState<R>>,
) -> AppResult<Json<Vec<CostCenterResponse>>> {
    let centers = state.queries.handle_all().await?;
    Ok(Json(centers.iter().map(Into::into).collect()))
}

async fn get_tree<R: CostCenterRepository>(
    State(state): State<CostCenterState<R>>,
) -> AppResult<Json<Vec<CostCenterNodeResponse>>> {
    let tree = state.queries.handle_tree().await?;
    Ok(Json(tree.into_iter().map(Into::into).collect()))
}
