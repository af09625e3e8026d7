//! Warehouses and sections.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use wareflow_core::validation::ValidationResult;
use wareflow_core::{Section, SectionPatch, Validator, Warehouse, WarehousePatch};

use super::{created, report_response, Data};
use crate::error::ApiResult;
use crate::extract::{IdPath, JsonBody, ReportFilter};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct WarehouseRequest {
    pub warehouse_code: Option<String>,
    pub address: Option<String>,
    pub telephone: Option<String>,
    pub minimum_capacity: Option<i64>,
    pub minimum_temperature: Option<f64>,
}

impl WarehouseRequest {
    pub fn into_entity(self) -> ValidationResult<Warehouse> {
        let mut v = Validator::new();
        let warehouse = Warehouse {
            id: 0,
            warehouse_code: v.required_text("warehouse_code", self.warehouse_code),
            address: v.required_text("address", self.address),
            telephone: v.required_text("telephone", self.telephone),
            minimum_capacity: v.required("minimum_capacity", self.minimum_capacity),
            minimum_temperature: v.required("minimum_temperature", self.minimum_temperature),
        };
        v.finish()?;
        Ok(warehouse)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SectionRequest {
    pub section_number: Option<i64>,
    pub current_temperature: Option<f64>,
    pub minimum_temperature: Option<f64>,
    pub current_capacity: Option<i64>,
    pub minimum_capacity: Option<i64>,
    pub maximum_capacity: Option<i64>,
    pub warehouse_id: Option<i64>,
    pub product_type_id: Option<i64>,
}

impl SectionRequest {
    pub fn into_entity(self) -> ValidationResult<Section> {
        let mut v = Validator::new();
        let section = Section {
            id: 0,
            section_number: v.required("section_number", self.section_number),
            current_temperature: v.required("current_temperature", self.current_temperature),
            minimum_temperature: v.required("minimum_temperature", self.minimum_temperature),
            current_capacity: v.required("current_capacity", self.current_capacity),
            minimum_capacity: v.required("minimum_capacity", self.minimum_capacity),
            maximum_capacity: v.required("maximum_capacity", self.maximum_capacity),
            warehouse_id: v.required("warehouse_id", self.warehouse_id),
            product_type_id: v.required("product_type_id", self.product_type_id),
        };
        v.finish()?;
        Ok(section)
    }
}

// =============================================================================
// Warehouses
// =============================================================================

pub async fn list_warehouses(
    State(state): State<AppState>,
) -> ApiResult<Json<Data<Vec<Warehouse>>>> {
    Ok(Data::json(state.services.warehouses.get_all().await?))
}

pub async fn get_warehouse(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<Data<Warehouse>>> {
    Ok(Data::json(state.services.warehouses.get_by_id(id).await?))
}

pub async fn create_warehouse(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<WarehouseRequest>,
) -> ApiResult<(StatusCode, Json<Data<Warehouse>>)> {
    let warehouse = body.into_entity()?;
    Ok(created(state.services.warehouses.create(warehouse).await?))
}

pub async fn patch_warehouse(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    JsonBody(patch): JsonBody<WarehousePatch>,
) -> ApiResult<Json<Data<Warehouse>>> {
    Ok(Data::json(state.services.warehouses.update(id, patch).await?))
}

pub async fn delete_warehouse(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<StatusCode> {
    state.services.warehouses.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Sections
// =============================================================================

pub async fn list_sections(State(state): State<AppState>) -> ApiResult<Json<Data<Vec<Section>>>> {
    Ok(Data::json(state.services.sections.get_all().await?))
}

pub async fn get_section(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<Data<Section>>> {
    Ok(Data::json(state.services.sections.get_by_id(id).await?))
}

pub async fn create_section(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<SectionRequest>,
) -> ApiResult<(StatusCode, Json<Data<Section>>)> {
    let section = body.into_entity()?;
    Ok(created(state.services.sections.create(section).await?))
}

pub async fn patch_section(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    JsonBody(patch): JsonBody<SectionPatch>,
) -> ApiResult<Json<Data<Section>>> {
    Ok(Data::json(state.services.sections.update(id, patch).await?))
}

pub async fn delete_section(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<StatusCode> {
    state.services.sections.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn report_products(
    State(state): State<AppState>,
    ReportFilter(id): ReportFilter,
) -> ApiResult<Response> {
    let rows = state.services.sections.report_products(id).await?;
    Ok(report_response(id, rows))
}
