//! Sellers, buyers, employees, localities and carriers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use wareflow_core::validation::ValidationResult;
use wareflow_core::{
    Buyer, BuyerPatch, Carrier, Employee, EmployeePatch, Locality, Seller, SellerPatch, Validator,
};

use super::{created, report_response, Data};
use crate::error::ApiResult;
use crate::extract::{IdPath, JsonBody, ReportFilter};
use crate::state::AppState;

// =============================================================================
// Request DTOs
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct SellerRequest {
    pub cid: Option<i64>,
    pub company_name: Option<String>,
    pub address: Option<String>,
    pub telephone: Option<String>,
    pub locality_id: Option<i64>,
}

impl SellerRequest {
    pub fn into_entity(self) -> ValidationResult<Seller> {
        let mut v = Validator::new();
        let seller = Seller {
            id: 0,
            cid: v.required("cid", self.cid),
            company_name: v.required_text("company_name", self.company_name),
            address: v.required_text("address", self.address),
            telephone: v.required_text("telephone", self.telephone),
            locality_id: v.required("locality_id", self.locality_id),
        };
        v.finish()?;
        Ok(seller)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BuyerRequest {
    pub card_number_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl BuyerRequest {
    pub fn into_entity(self) -> ValidationResult<Buyer> {
        let mut v = Validator::new();
        let buyer = Buyer {
            id: 0,
            card_number_id: v.required_text("card_number_id", self.card_number_id),
            first_name: v.required_text("first_name", self.first_name),
            last_name: v.required_text("last_name", self.last_name),
        };
        v.finish()?;
        Ok(buyer)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct EmployeeRequest {
    pub card_number_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub warehouse_id: Option<i64>,
}

impl EmployeeRequest {
    pub fn into_entity(self) -> ValidationResult<Employee> {
        let mut v = Validator::new();
        let employee = Employee {
            id: 0,
            card_number_id: v.required_text("card_number_id", self.card_number_id),
            first_name: v.required_text("first_name", self.first_name),
            last_name: v.required_text("last_name", self.last_name),
            warehouse_id: v.required("warehouse_id", self.warehouse_id),
        };
        v.finish()?;
        Ok(employee)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LocalityRequest {
    pub locality_name: Option<String>,
    pub province_name: Option<String>,
    pub country_name: Option<String>,
}

impl LocalityRequest {
    pub fn into_entity(self) -> ValidationResult<Locality> {
        let mut v = Validator::new();
        let locality = Locality {
            id: 0,
            locality_name: v.required_text("locality_name", self.locality_name),
            province_name: v.required_text("province_name", self.province_name),
            country_name: v.required_text("country_name", self.country_name),
        };
        v.finish()?;
        Ok(locality)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CarrierRequest {
    pub cid: Option<String>,
    pub company_name: Option<String>,
    pub address: Option<String>,
    pub telephone: Option<String>,
    pub locality_id: Option<i64>,
}

impl CarrierRequest {
    pub fn into_entity(self) -> ValidationResult<Carrier> {
        let mut v = Validator::new();
        let carrier = Carrier {
            id: 0,
            cid: v.required_text("cid", self.cid),
            company_name: v.required_text("company_name", self.company_name),
            address: v.required_text("address", self.address),
            telephone: v.required_text("telephone", self.telephone),
            locality_id: v.required("locality_id", self.locality_id),
        };
        v.finish()?;
        Ok(carrier)
    }
}

// =============================================================================
// Sellers
// =============================================================================

pub async fn list_sellers(State(state): State<AppState>) -> ApiResult<Json<Data<Vec<Seller>>>> {
    Ok(Data::json(state.services.sellers.get_all().await?))
}

pub async fn get_seller(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<Data<Seller>>> {
    Ok(Data::json(state.services.sellers.get_by_id(id).await?))
}

pub async fn create_seller(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<SellerRequest>,
) -> ApiResult<(StatusCode, Json<Data<Seller>>)> {
    let seller = body.into_entity()?;
    Ok(created(state.services.sellers.create(seller).await?))
}

pub async fn patch_seller(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    JsonBody(patch): JsonBody<SellerPatch>,
) -> ApiResult<Json<Data<Seller>>> {
    Ok(Data::json(state.services.sellers.update(id, patch).await?))
}

pub async fn delete_seller(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<StatusCode> {
    state.services.sellers.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Buyers
// =============================================================================

pub async fn list_buyers(State(state): State<AppState>) -> ApiResult<Json<Data<Vec<Buyer>>>> {
    Ok(Data::json(state.services.buyers.get_all().await?))
}

pub async fn get_buyer(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<Data<Buyer>>> {
    Ok(Data::json(state.services.buyers.get_by_id(id).await?))
}

pub async fn create_buyer(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<BuyerRequest>,
) -> ApiResult<(StatusCode, Json<Data<Buyer>>)> {
    let buyer = body.into_entity()?;
    Ok(created(state.services.buyers.create(buyer).await?))
}

pub async fn patch_buyer(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    JsonBody(patch): JsonBody<BuyerPatch>,
) -> ApiResult<Json<Data<Buyer>>> {
    Ok(Data::json(state.services.buyers.update(id, patch).await?))
}

pub async fn delete_buyer(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<StatusCode> {
    state.services.buyers.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn report_purchase_orders(
    State(state): State<AppState>,
    ReportFilter(id): ReportFilter,
) -> ApiResult<Response> {
    let rows = state.services.buyers.report_purchase_orders(id).await?;
    Ok(report_response(id, rows))
}

// =============================================================================
// Employees
// =============================================================================

pub async fn list_employees(
    State(state): State<AppState>,
) -> ApiResult<Json<Data<Vec<Employee>>>> {
    Ok(Data::json(state.services.employees.get_all().await?))
}

pub async fn get_employee(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<Data<Employee>>> {
    Ok(Data::json(state.services.employees.get_by_id(id).await?))
}

pub async fn create_employee(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<EmployeeRequest>,
) -> ApiResult<(StatusCode, Json<Data<Employee>>)> {
    let employee = body.into_entity()?;
    Ok(created(state.services.employees.create(employee).await?))
}

pub async fn patch_employee(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    JsonBody(patch): JsonBody<EmployeePatch>,
) -> ApiResult<Json<Data<Employee>>> {
    Ok(Data::json(state.services.employees.update(id, patch).await?))
}

pub async fn delete_employee(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<StatusCode> {
    state.services.employees.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn report_inbound_orders(
    State(state): State<AppState>,
    ReportFilter(id): ReportFilter,
) -> ApiResult<Response> {
    let rows = state.services.employees.report_inbound_orders(id).await?;
    Ok(report_response(id, rows))
}

// =============================================================================
// Localities
// =============================================================================

pub async fn list_localities(
    State(state): State<AppState>,
) -> ApiResult<Json<Data<Vec<Locality>>>> {
    Ok(Data::json(state.services.localities.get_all().await?))
}

pub async fn get_locality(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<Data<Locality>>> {
    Ok(Data::json(state.services.localities.get_by_id(id).await?))
}

pub async fn create_locality(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LocalityRequest>,
) -> ApiResult<(StatusCode, Json<Data<Locality>>)> {
    let locality = body.into_entity()?;
    Ok(created(state.services.localities.create(locality).await?))
}

pub async fn report_sellers(
    State(state): State<AppState>,
    ReportFilter(id): ReportFilter,
) -> ApiResult<Response> {
    let rows = state.services.localities.report_sellers(id).await?;
    Ok(report_response(id, rows))
}

pub async fn report_carriers(
    State(state): State<AppState>,
    ReportFilter(id): ReportFilter,
) -> ApiResult<Response> {
    let rows = state.services.localities.report_carriers(id).await?;
    Ok(report_response(id, rows))
}

// =============================================================================
// Carriers
// =============================================================================

pub async fn list_carriers(State(state): State<AppState>) -> ApiResult<Json<Data<Vec<Carrier>>>> {
    Ok(Data::json(state.services.carriers.get_all().await?))
}

pub async fn get_carrier(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<Data<Carrier>>> {
    Ok(Data::json(state.services.carriers.get_by_id(id).await?))
}

pub async fn create_carrier(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CarrierRequest>,
) -> ApiResult<(StatusCode, Json<Data<Carrier>>)> {
    let carrier = body.into_entity()?;
    Ok(created(state.services.carriers.create(carrier).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_are_reported_together() {
        let errors = SellerRequest {
            company_name: Some("Acme".into()),
            address: Some("  ".into()),
            ..Default::default()
        }
        .into_entity()
        .unwrap_err();

        assert_eq!(errors.fields(), vec!["cid", "address", "telephone", "locality_id"]);
    }

    #[test]
    fn test_zero_reference_is_present() {
        let employee = EmployeeRequest {
            card_number_id: Some("E1".into()),
            first_name: Some("John".into()),
            last_name: Some("Doe".into()),
            warehouse_id: Some(0),
        }
        .into_entity()
        .unwrap();

        assert_eq!(employee.warehouse_id, 0);
    }
}
