//! Request extractors whose rejections speak [`ApiError`].
//!
//! axum's stock `Json`, `Path` and `Query` reject with their own plain-text
//! bodies and a mix of 400/415/422. These wrappers turn every rejection into
//! a 400 with the usual error body.

use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer};

use crate::error::ApiError;

/// JSON request body.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}

/// The `{id}` path segment.
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub i64);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state).await?;
        Ok(IdPath(id))
    }
}

#[derive(Debug, Deserialize)]
struct ReportQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    id: Option<i64>,
}

/// `?id=` with no digits means no filter.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid report id `{text}`"))),
    }
}

/// The optional `?id=` of report endpoints.
#[derive(Debug, Clone, Copy)]
pub struct ReportFilter(pub Option<i64>);

impl<S> FromRequestParts<S> for ReportFilter
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<ReportQuery>::from_request_parts(parts, state).await?;
        Ok(ReportFilter(query.id))
    }
}
