// libs/catalog-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;
use shared_models::pagination::PageInfo;

use crate::models::{CatalogError, CreateServiceRequest, ServiceListQuery, UpdateServiceRequest};
use crate::services::catalog::CatalogService;

fn professional_id(user: &User) -> Result<Uuid, AppError> {
    Uuid::parse_str(&user.id).map_err(|_| AppError::BadRequest("Invalid professional ID".to_string()))
}

fn map_catalog_error(e: CatalogError) -> AppError {
    match e {
        CatalogError::NotFound => AppError::NotFound("Service not found".to_string()),
        CatalogError::ValidationError(msg) => AppError::ValidationError(msg),
        CatalogError::DatabaseError(msg) => AppError::Internal(msg),
    }
}

#[axum::debug_handler]
pub async fn create_service(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateServiceRequest>,
) -> Result<Json<Value>, AppError> {
    let owner = professional_id(&user)?;
    let catalog = CatalogService::new(&state);

    let service = catalog
        .create_service(owner, request, auth.token())
        .await
        .map_err(map_catalog_error)?;

    Ok(Json(json!({
        "success": true,
        "service": service,
        "message": "Service created successfully"
    })))
}

#[axum::debug_handler]
pub async fn list_services(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<ServiceListQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let owner = professional_id(&user)?;
    let catalog = CatalogService::new(&state);

    let page = query.page_params();
    let services = catalog
        .list_services(
            owner,
            query.category.as_deref(),
            query.is_active,
            &page,
            auth.token(),
        )
        .await
        .map_err(map_catalog_error)?;

    let pagination = PageInfo::new(&page, services.len() as i64);

    Ok(Json(json!({
        "services": services,
        "pagination": pagination
    })))
}

#[axum::debug_handler]
pub async fn get_service(
    State(state): State<Arc<AppConfig>>,
    Path(service_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let catalog = CatalogService::new(&state);

    let service = catalog
        .get_service(service_id, Some(auth.token()))
        .await
        .map_err(map_catalog_error)?;

    // Only the owning professional or an admin may read catalog details.
    if service.professional_id.to_string() != user.id && !user.is_admin() {
        return Err(AppError::Auth("Not authorized to view this service".to_string()));
    }

    Ok(Json(json!(service)))
}

#[axum::debug_handler]
pub async fn update_service(
    State(state): State<Arc<AppConfig>>,
    Path(service_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdateServiceRequest>,
) -> Result<Json<Value>, AppError> {
    let owner = professional_id(&user)?;
    let catalog = CatalogService::new(&state);

    let service = catalog
        .update_service(service_id, owner, request, auth.token())
        .await
        .map_err(map_catalog_error)?;

    Ok(Json(json!({
        "success": true,
        "service": service,
        "message": "Service updated successfully"
    })))
}

#[axum::debug_handler]
pub async fn archive_service(
    State(state): State<Arc<AppConfig>>,
    Path(service_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let owner = professional_id(&user)?;
    let catalog = CatalogService::new(&state);

    let service = catalog
        .archive_service(service_id, owner, auth.token())
        .await
        .map_err(map_catalog_error)?;

    Ok(Json(json!({
        "success": true,
        "service": service,
        "message": "Service archived successfully"
    })))
}
