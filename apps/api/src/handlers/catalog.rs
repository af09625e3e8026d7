//! Product types, products, product records and product batches.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use wareflow_core::validation::ValidationResult;
use wareflow_core::{
    Product, ProductBatch, ProductPatch, ProductRecord, ProductType, Validator,
};

use super::{created, report_response, Data};
use crate::error::ApiResult;
use crate::extract::{IdPath, JsonBody, ReportFilter};
use crate::state::AppState;

// =============================================================================
// Request DTOs
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ProductTypeRequest {
    pub description: Option<String>,
}

impl ProductTypeRequest {
    pub fn into_entity(self) -> ValidationResult<ProductType> {
        let mut v = Validator::new();
        let product_type = ProductType {
            id: 0,
            description: v.required_text("description", self.description),
        };
        v.finish()?;
        Ok(product_type)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductRequest {
    pub product_code: Option<String>,
    pub description: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub length: Option<f64>,
    pub net_weight: Option<f64>,
    pub expiration_rate: Option<f64>,
    pub recommended_freezing_temperature: Option<f64>,
    pub freezing_rate: Option<f64>,
    pub product_type_id: Option<i64>,
    pub seller_id: Option<i64>,
}

impl ProductRequest {
    pub fn into_entity(self) -> ValidationResult<Product> {
        let mut v = Validator::new();
        let product = Product {
            id: 0,
            product_code: v.required_text("product_code", self.product_code),
            description: v.required_text("description", self.description),
            width: v.required("width", self.width),
            height: v.required("height", self.height),
            length: v.required("length", self.length),
            net_weight: v.required("net_weight", self.net_weight),
            expiration_rate: v.required("expiration_rate", self.expiration_rate),
            recommended_freezing_temperature: v.required(
                "recommended_freezing_temperature",
                self.recommended_freezing_temperature,
            ),
            freezing_rate: v.required("freezing_rate", self.freezing_rate),
            product_type_id: v.required("product_type_id", self.product_type_id),
            seller_id: v.required("seller_id", self.seller_id),
        };
        v.finish()?;
        Ok(product)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductRecordRequest {
    pub last_update_date: Option<String>,
    pub purchase_price: Option<f64>,
    pub sale_price: Option<f64>,
    pub product_id: Option<i64>,
}

impl ProductRecordRequest {
    pub fn into_entity(self) -> ValidationResult<ProductRecord> {
        let mut v = Validator::new();
        let record = ProductRecord {
            id: 0,
            last_update_date: v.required_date("last_update_date", self.last_update_date),
            purchase_price: v.required("purchase_price", self.purchase_price),
            sale_price: v.required("sale_price", self.sale_price),
            product_id: v.required("product_id", self.product_id),
        };
        v.finish()?;
        Ok(record)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductBatchRequest {
    pub batch_number: Option<i64>,
    pub current_quantity: Option<i64>,
    pub current_temperature: Option<f64>,
    pub due_date: Option<String>,
    pub initial_quantity: Option<i64>,
    pub manufacturing_date: Option<String>,
    pub manufacturing_hour: Option<i64>,
    pub minimum_temperature: Option<f64>,
    pub product_id: Option<i64>,
    pub section_id: Option<i64>,
}

impl ProductBatchRequest {
    pub fn into_entity(self) -> ValidationResult<ProductBatch> {
        let mut v = Validator::new();
        let batch = ProductBatch {
            id: 0,
            batch_number: v.required("batch_number", self.batch_number),
            current_quantity: v.required("current_quantity", self.current_quantity),
            current_temperature: v.required("current_temperature", self.current_temperature),
            due_date: v.required_date("due_date", self.due_date),
            initial_quantity: v.required("initial_quantity", self.initial_quantity),
            manufacturing_date: v.required_date("manufacturing_date", self.manufacturing_date),
            manufacturing_hour: v.required("manufacturing_hour", self.manufacturing_hour),
            minimum_temperature: v.required("minimum_temperature", self.minimum_temperature),
            product_id: v.required("product_id", self.product_id),
            section_id: v.required("section_id", self.section_id),
        };
        v.finish()?;
        Ok(batch)
    }
}

// =============================================================================
// Product Types
// =============================================================================

pub async fn list_product_types(
    State(state): State<AppState>,
) -> ApiResult<Json<Data<Vec<ProductType>>>> {
    Ok(Data::json(state.services.product_types.get_all().await?))
}

pub async fn get_product_type(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<Data<ProductType>>> {
    Ok(Data::json(state.services.product_types.get_by_id(id).await?))
}

pub async fn create_product_type(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ProductTypeRequest>,
) -> ApiResult<(StatusCode, Json<Data<ProductType>>)> {
    let product_type = body.into_entity()?;
    Ok(created(state.services.product_types.create(product_type).await?))
}

// =============================================================================
// Products
// =============================================================================

pub async fn list_products(State(state): State<AppState>) -> ApiResult<Json<Data<Vec<Product>>>> {
    Ok(Data::json(state.services.products.get_all().await?))
}

pub async fn get_product(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<Data<Product>>> {
    Ok(Data::json(state.services.products.get_by_id(id).await?))
}

pub async fn create_product(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ProductRequest>,
) -> ApiResult<(StatusCode, Json<Data<Product>>)> {
    let product = body.into_entity()?;
    Ok(created(state.services.products.create(product).await?))
}

pub async fn patch_product(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    JsonBody(patch): JsonBody<ProductPatch>,
) -> ApiResult<Json<Data<Product>>> {
    Ok(Data::json(state.services.products.update(id, patch).await?))
}

pub async fn delete_product(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<StatusCode> {
    state.services.products.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn report_records(
    State(state): State<AppState>,
    ReportFilter(id): ReportFilter,
) -> ApiResult<Response> {
    let rows = state.services.products.report_records(id).await?;
    Ok(report_response(id, rows))
}

// =============================================================================
// Product Records
// =============================================================================

pub async fn list_product_records(
    State(state): State<AppState>,
) -> ApiResult<Json<Data<Vec<ProductRecord>>>> {
    Ok(Data::json(state.services.product_records.get_all().await?))
}

pub async fn get_product_record(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<Data<ProductRecord>>> {
    Ok(Data::json(state.services.product_records.get_by_id(id).await?))
}

pub async fn create_product_record(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ProductRecordRequest>,
) -> ApiResult<(StatusCode, Json<Data<ProductRecord>>)> {
    let record = body.into_entity()?;
    Ok(created(state.services.product_records.create(record).await?))
}

// =============================================================================
// Product Batches
// =============================================================================

pub async fn list_product_batches(
    State(state): State<AppState>,
) -> ApiResult<Json<Data<Vec<ProductBatch>>>> {
    Ok(Data::json(state.services.product_batches.get_all().await?))
}

pub async fn get_product_batch(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<Data<ProductBatch>>> {
    Ok(Data::json(state.services.product_batches.get_by_id(id).await?))
}

pub async fn create_product_batch(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ProductBatchRequest>,
) -> ApiResult<(StatusCode, Json<Data<ProductBatch>>)> {
    let batch = body.into_entity()?;
    Ok(created(state.services.product_batches.create(batch).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_dates_are_field_errors() {
        let errors = ProductBatchRequest {
            batch_number: Some(1),
            current_quantity: Some(5),
            current_temperature: Some(2.0),
            due_date: Some("2023/10/05".into()),
            initial_quantity: Some(5),
            manufacturing_date: None,
            manufacturing_hour: Some(8),
            minimum_temperature: Some(-2.0),
            product_id: Some(0),
            section_id: Some(0),
        }
        .into_entity()
        .unwrap_err();

        assert_eq!(errors.fields(), vec!["due_date", "manufacturing_date"]);
    }
}
