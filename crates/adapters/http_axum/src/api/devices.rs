//! JSON REST handlers for devices.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use devicehub_app::ports::DeviceRepository;
use devicehub_app::services::device_service::{CreateDeviceRequest, DevicePatch};
use devicehub_domain::device::Device;
use devicehub_domain::error::{DeviceHubError, ValidationError};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating a device.
#[derive(Deserialize)]
pub struct CreateDeviceBody {
    pub name: String,
    pub brand: String,
    pub state: String,
}

impl From<CreateDeviceBody> for CreateDeviceRequest {
    fn from(body: CreateDeviceBody) -> Self {
        Self {
            name: body.name,
            brand: body.brand,
            state: body.state,
        }
    }
}

/// Request body for `PUT` and `PATCH`; absent fields are left unchanged.
#[derive(Deserialize)]
pub struct UpdateDeviceBody {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub state: Option<String>,
}

impl From<UpdateDeviceBody> for DevicePatch {
    fn from(body: UpdateDeviceBody) -> Self {
        Self {
            name: body.name,
            brand: body.brand,
            state: body.state,
        }
    }
}

/// Query string accepted by the list endpoint.
///
/// Empty values are treated as absent.
#[derive(Deserialize)]
pub struct ListQuery {
    pub brand: Option<String>,
    pub state: Option<String>,
}

impl ListQuery {
    fn brand(&self) -> Option<&str> {
        self.brand.as_deref().filter(|v| !v.is_empty())
    }

    fn state(&self) -> Option<&str> {
        self.state.as_deref().filter(|v| !v.is_empty())
    }
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Device>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get and update endpoints.
pub enum GetResponse {
    Ok(Json<Device>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<Device>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the existence check.
pub enum ExistsResponse {
    Found,
    Missing,
}

impl IntoResponse for ExistsResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Found => StatusCode::OK.into_response(),
            Self::Missing => StatusCode::NOT_FOUND.into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /api/v1/devices[?brand=..|?state=..]`
pub async fn list<R>(
    State(state): State<AppState<R>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<ListResponse, ApiError>
where
    R: DeviceRepository + Send + Sync + 'static,
{
    let Query(query) = query?;
    let service = &state.device_service;

    let devices = match (query.brand(), query.state()) {
        (Some(_), Some(_)) => {
            return Err(DeviceHubError::from(ValidationError::ConflictingFilters).into());
        }
        (Some(brand), None) => service.get_devices_by_brand(brand).await?,
        (None, Some(device_state)) => service.get_devices_by_state(device_state).await?,
        (None, None) => service.get_all_devices().await?,
    };
    Ok(ListResponse::Ok(Json(devices)))
}

/// `GET /api/v1/devices/{id}`
pub async fn get<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    R: DeviceRepository + Send + Sync + 'static,
{
    let device = state.device_service.get_device(&id).await?;
    Ok(GetResponse::Ok(Json(device)))
}

/// `HEAD /api/v1/devices/{id}`
pub async fn exists<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<ExistsResponse, ApiError>
where
    R: DeviceRepository + Send + Sync + 'static,
{
    if state.device_service.device_exists(&id).await? {
        Ok(ExistsResponse::Found)
    } else {
        Ok(ExistsResponse::Missing)
    }
}

/// `POST /api/v1/devices`
pub async fn create<R>(
    State(state): State<AppState<R>>,
    body: Result<Json<CreateDeviceBody>, JsonRejection>,
) -> Result<CreateResponse, ApiError>
where
    R: DeviceRepository + Send + Sync + 'static,
{
    let Json(body) = body?;
    let device = state.device_service.create_device(body.into()).await?;
    Ok(CreateResponse::Created(Json(device)))
}

/// `PUT /api/v1/devices/{id}` and `PATCH /api/v1/devices/{id}`
pub async fn update<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    body: Result<Json<UpdateDeviceBody>, JsonRejection>,
) -> Result<GetResponse, ApiError>
where
    R: DeviceRepository + Send + Sync + 'static,
{
    let Json(body) = body?;
    let device = state.device_service.update_device(&id, body.into()).await?;
    Ok(GetResponse::Ok(Json(device)))
}

/// `DELETE /api/v1/devices/{id}`
pub async fn delete<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    R: DeviceRepository + Send + Sync + 'static,
{
    state.device_service.delete_device(&id).await?;
    Ok(DeleteResponse::NoContent)
}
