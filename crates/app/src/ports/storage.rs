//! Storage port — repository trait for device persistence.

use std::future::Future;

use devicehub_domain::device::{Device, DeviceState};
use devicehub_domain::error::DeviceHubError;
use devicehub_domain::id::DeviceId;

/// Repository for persisting and querying [`Device`]s.
///
/// Implementations store and return devices verbatim; they never apply
/// lifecycle rules. Listings are ordered by `creation_time`, newest first,
/// and an empty result is not an error.
///
/// Dropping a returned future cancels the operation. Implementations report
/// store-side timeouts as [`DeviceHubError::DeadlineExceeded`] and a store
/// that is shutting down as [`DeviceHubError::Cancelled`].
pub trait DeviceRepository {
    /// Persist a new device.
    ///
    /// Fails with [`DeviceHubError::Conflict`] if the id is already taken.
    fn create(&self, device: Device) -> impl Future<Output = Result<Device, DeviceHubError>> + Send;

    /// Fetch a device, failing with [`DeviceHubError::NotFound`] if absent.
    fn get_by_id(
        &self,
        id: &DeviceId,
    ) -> impl Future<Output = Result<Device, DeviceHubError>> + Send;

    /// Every stored device.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Device>, DeviceHubError>> + Send;

    /// Devices whose brand equals `brand` exactly.
    fn get_by_brand(
        &self,
        brand: &str,
    ) -> impl Future<Output = Result<Vec<Device>, DeviceHubError>> + Send;

    /// Devices currently in `state`.
    fn get_by_state(
        &self,
        state: DeviceState,
    ) -> impl Future<Output = Result<Vec<Device>, DeviceHubError>> + Send;

    /// Overwrite name, brand and state of an existing device.
    ///
    /// `id` and `creation_time` are never rewritten. Fails with
    /// [`DeviceHubError::NotFound`] if the id does not exist.
    fn update(&self, device: Device) -> impl Future<Output = Result<Device, DeviceHubError>> + Send;

    /// Remove a device, failing with [`DeviceHubError::NotFound`] if absent.
    fn delete(&self, id: &DeviceId) -> impl Future<Output = Result<(), DeviceHubError>> + Send;

    /// Whether a device with `id` is stored.
    fn exists(&self, id: &DeviceId) -> impl Future<Output = Result<bool, DeviceHubError>> + Send;
}
