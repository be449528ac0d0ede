//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod devices;

use axum::Router;
use axum::routing::get;

use devicehub_app::ports::DeviceRepository;

use crate::state::AppState;

/// Build the `/api/v1` sub-router.
pub fn routes<R>() -> Router<AppState<R>>
where
    R: DeviceRepository + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/devices",
            get(devices::list::<R>).post(devices::create::<R>),
        )
        .route(
            "/devices/{id}",
            get(devices::get::<R>)
                .head(devices::exists::<R>)
                .put(devices::update::<R>)
                .patch(devices::update::<R>)
                .delete(devices::delete::<R>),
        )
}
