//! Device service — use-cases for managing devices.
//!
//! Every operation validates its raw input, applies the lifecycle rules of
//! [`Device`] and only then talks to the repository, so the rules hold no
//! matter which adapter drives the service.

use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use devicehub_domain::device::{Device, DeviceState};
use devicehub_domain::error::{DeviceHubError, PreconditionError, ValidationError};
use devicehub_domain::id::DeviceId;

use crate::ports::DeviceRepository;

/// Input for [`DeviceService::create_device`].
#[derive(Debug, Clone)]
pub struct CreateDeviceRequest {
    pub name: String,
    pub brand: String,
    pub state: String,
}

/// Partial update for [`DeviceService::update_device`].
///
/// `None` leaves a field unchanged, `Some` applies the value even when it is
/// empty (and therefore rejected).
#[derive(Debug, Clone, Default)]
pub struct DevicePatch {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub state: Option<String>,
}

impl DevicePatch {
    /// Apply the state change first, then name and brand as one unit.
    ///
    /// A missing name or brand falls back to the device's current value.
    fn apply(self, device: &mut Device) -> Result<(), DeviceHubError> {
        if let Some(state) = self.state {
            device.set_state(DeviceState::from_str(&state)?);
        }
        if self.name.is_some() || self.brand.is_some() {
            let name = self.name.unwrap_or_else(|| device.name().to_string());
            let brand = self.brand.unwrap_or_else(|| device.brand().to_string());
            device.set_name_and_brand(&name, &brand)?;
        }
        Ok(())
    }
}

/// Application service for device CRUD operations.
pub struct DeviceService<R> {
    repo: R,
    deadline: Option<Duration>,
}

impl<R: DeviceRepository> DeviceService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            deadline: None,
        }
    }

    /// Bound every operation by `deadline`; operations that run longer fail
    /// with [`DeviceHubError::DeadlineExceeded`].
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    async fn within_deadline<T>(
        &self,
        operation: impl Future<Output = Result<T, DeviceHubError>>,
    ) -> Result<T, DeviceHubError> {
        match self.deadline {
            Some(limit) => tokio::time::timeout(limit, operation)
                .await
                .unwrap_or(Err(DeviceHubError::DeadlineExceeded)),
            None => operation.await,
        }
    }

    /// Register a new device under a freshly generated id.
    ///
    /// # Errors
    ///
    /// - [`DeviceHubError::Validation`] for a blank name or brand, or an
    ///   unknown state; nothing is persisted
    /// - [`DeviceHubError::Conflict`] if the generated id is already taken
    /// - [`DeviceHubError::Internal`] for any other storage failure
    #[tracing::instrument(skip(self, request), fields(name = %request.name, brand = %request.brand))]
    pub async fn create_device(&self, request: CreateDeviceRequest) -> Result<Device, DeviceHubError> {
        let state = validate_create(&request)?;
        let device = Device::new(DeviceId::generate(), request.name, request.brand, state)?;

        self.within_deadline(async move {
            let created = self
                .repo
                .create(device)
                .await
                .map_err(classify_create_failure)?;
            tracing::info!(id = %created.id(), "device created");
            Ok(created)
        })
        .await
    }

    /// Look up a device by id.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceHubError::Validation`] for a blank id and
    /// [`DeviceHubError::NotFound`] when no device has this id.
    #[tracing::instrument(skip(self))]
    pub async fn get_device(&self, id: &str) -> Result<Device, DeviceHubError> {
        let id = DeviceId::from_str(id)?;
        self.within_deadline(self.repo.get_by_id(&id)).await
    }

    /// Whether a device with this id exists.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceHubError::Validation`] for a blank id, or a storage error.
    #[tracing::instrument(skip(self))]
    pub async fn device_exists(&self, id: &str) -> Result<bool, DeviceHubError> {
        let id = DeviceId::from_str(id)?;
        self.within_deadline(self.repo.exists(&id)).await
    }

    /// List every device, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_all_devices(&self) -> Result<Vec<Device>, DeviceHubError> {
        self.within_deadline(self.repo.get_all()).await
    }

    /// List the devices of one brand, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceHubError::Validation`] for a blank brand, or a storage error.
    #[tracing::instrument(skip(self))]
    pub async fn get_devices_by_brand(&self, brand: &str) -> Result<Vec<Device>, DeviceHubError> {
        if brand.trim().is_empty() {
            return Err(ValidationError::EmptyBrand.into());
        }
        self.within_deadline(self.repo.get_by_brand(brand)).await
    }

    /// List the devices in one state, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceHubError::Validation`] for an unknown state, or a storage error.
    #[tracing::instrument(skip(self))]
    pub async fn get_devices_by_state(&self, state: &str) -> Result<Vec<Device>, DeviceHubError> {
        let state = DeviceState::from_str(state)?;
        self.within_deadline(self.repo.get_by_state(state)).await
    }

    /// Apply a partial update to an existing device.
    ///
    /// The read-modify-write is not guarded: concurrent updates of the same
    /// device race and the last write wins.
    ///
    /// # Errors
    ///
    /// - [`DeviceHubError::Validation`] for a blank id, an unknown state or a
    ///   blank name/brand
    /// - [`DeviceHubError::NotFound`] if the device does not exist (or vanished
    ///   before the write)
    /// - [`DeviceHubError::PreconditionFailed`] when renaming an in-use device
    #[tracing::instrument(skip(self, patch))]
    pub async fn update_device(
        &self,
        id: &str,
        patch: DevicePatch,
    ) -> Result<Device, DeviceHubError> {
        let id = DeviceId::from_str(id)?;

        self.within_deadline(async move {
            let mut device = self.repo.get_by_id(&id).await?;
            patch.apply(&mut device)?;
            let updated = self.repo.update(device).await?;
            tracing::info!(%id, state = %updated.state(), "device updated");
            Ok(updated)
        })
        .await
    }

    /// Delete a device unless it is in use.
    ///
    /// # Errors
    ///
    /// - [`DeviceHubError::Validation`] for a blank id
    /// - [`DeviceHubError::NotFound`] if the device does not exist
    /// - [`DeviceHubError::PreconditionFailed`] while the device is in use
    #[tracing::instrument(skip(self))]
    pub async fn delete_device(&self, id: &str) -> Result<(), DeviceHubError> {
        let id = DeviceId::from_str(id)?;

        self.within_deadline(async move {
            let device = self.repo.get_by_id(&id).await?;
            if !device.can_delete() {
                return Err(PreconditionError::DeleteInUse { id: id.to_string() }.into());
            }
            self.repo.delete(&id).await?;
            tracing::info!(%id, "device deleted");
            Ok(())
        })
        .await
    }
}

fn validate_create(request: &CreateDeviceRequest) -> Result<DeviceState, ValidationError> {
    if request.name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if request.brand.trim().is_empty() {
        return Err(ValidationError::EmptyBrand);
    }
    DeviceState::from_str(&request.state)
}

/// Conflicts and already-classified infrastructure failures pass through;
/// anything else a repository reports on insert is unexpected.
fn classify_create_failure(err: DeviceHubError) -> DeviceHubError {
    match err {
        DeviceHubError::Conflict(_)
        | DeviceHubError::Internal(_)
        | DeviceHubError::Cancelled
        | DeviceHubError::DeadlineExceeded => err,
        other => DeviceHubError::internal(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devicehub_domain::error::{ConflictError, ErrorKind, NotFoundError};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct InMemoryDeviceRepo {
        store: Mutex<HashMap<DeviceId, Device>>,
    }

    fn not_found(id: &DeviceId) -> DeviceHubError {
        NotFoundError {
            entity: "Device",
            id: id.to_string(),
        }
        .into()
    }

    fn newest_first(mut devices: Vec<Device>) -> Vec<Device> {
        devices.sort_by_key(|d| std::cmp::Reverse(d.creation_time()));
        devices
    }

    impl DeviceRepository for InMemoryDeviceRepo {
        async fn create(&self, device: Device) -> Result<Device, DeviceHubError> {
            let mut store = self.store.lock().unwrap();
            if store.contains_key(device.id()) {
                return Err(ConflictError {
                    entity: "Device",
                    id: device.id().to_string(),
                }
                .into());
            }
            store.insert(device.id().clone(), device.clone());
            Ok(device)
        }

        async fn get_by_id(&self, id: &DeviceId) -> Result<Device, DeviceHubError> {
            let store = self.store.lock().unwrap();
            store.get(id).cloned().ok_or_else(|| not_found(id))
        }

        async fn get_all(&self) -> Result<Vec<Device>, DeviceHubError> {
            let store = self.store.lock().unwrap();
            Ok(newest_first(store.values().cloned().collect()))
        }

        async fn get_by_brand(&self, brand: &str) -> Result<Vec<Device>, DeviceHubError> {
            let store = self.store.lock().unwrap();
            let matching = store.values().filter(|d| d.brand() == brand).cloned();
            Ok(newest_first(matching.collect()))
        }

        async fn get_by_state(&self, state: DeviceState) -> Result<Vec<Device>, DeviceHubError> {
            let store = self.store.lock().unwrap();
            let matching = store.values().filter(|d| d.state() == state).cloned();
            Ok(newest_first(matching.collect()))
        }

        async fn update(&self, device: Device) -> Result<Device, DeviceHubError> {
            let mut store = self.store.lock().unwrap();
            match store.get_mut(device.id()) {
                Some(stored) => {
                    *stored = device.clone();
                    Ok(device)
                }
                None => Err(not_found(device.id())),
            }
        }

        async fn delete(&self, id: &DeviceId) -> Result<(), DeviceHubError> {
            let mut store = self.store.lock().unwrap();
            store.remove(id).map(|_| ()).ok_or_else(|| not_found(id))
        }

        async fn exists(&self, id: &DeviceId) -> Result<bool, DeviceHubError> {
            Ok(self.store.lock().unwrap().contains_key(id))
        }
    }

    /// Repository whose every call either fails the same way or never returns.
    enum ScriptedRepo {
        Fail(fn() -> DeviceHubError),
        Stall,
    }

    impl ScriptedRepo {
        async fn respond<T>(&self) -> Result<T, DeviceHubError> {
            match self {
                Self::Fail(make) => Err(make()),
                Self::Stall => std::future::pending().await,
            }
        }
    }

    impl DeviceRepository for ScriptedRepo {
        async fn create(&self, _device: Device) -> Result<Device, DeviceHubError> {
            self.respond().await
        }
        async fn get_by_id(&self, _id: &DeviceId) -> Result<Device, DeviceHubError> {
            self.respond().await
        }
        async fn get_all(&self) -> Result<Vec<Device>, DeviceHubError> {
            self.respond().await
        }
        async fn get_by_brand(&self, _brand: &str) -> Result<Vec<Device>, DeviceHubError> {
            self.respond().await
        }
        async fn get_by_state(&self, _state: DeviceState) -> Result<Vec<Device>, DeviceHubError> {
            self.respond().await
        }
        async fn update(&self, _device: Device) -> Result<Device, DeviceHubError> {
            self.respond().await
        }
        async fn delete(&self, _id: &DeviceId) -> Result<(), DeviceHubError> {
            self.respond().await
        }
        async fn exists(&self, _id: &DeviceId) -> Result<bool, DeviceHubError> {
            self.respond().await
        }
    }

    /// Finds every device on load, but the row is gone by the time it is written.
    struct VanishingRepo;

    fn vanished_device(id: &DeviceId) -> Device {
        Device::new(id.clone(), "Pixel 8", "Google", DeviceState::Available).unwrap()
    }

    impl DeviceRepository for VanishingRepo {
        async fn create(&self, device: Device) -> Result<Device, DeviceHubError> {
            Ok(device)
        }
        async fn get_by_id(&self, id: &DeviceId) -> Result<Device, DeviceHubError> {
            Ok(vanished_device(id))
        }
        async fn get_all(&self) -> Result<Vec<Device>, DeviceHubError> {
            Ok(vec![])
        }
        async fn get_by_brand(&self, _brand: &str) -> Result<Vec<Device>, DeviceHubError> {
            Ok(vec![])
        }
        async fn get_by_state(&self, _state: DeviceState) -> Result<Vec<Device>, DeviceHubError> {
            Ok(vec![])
        }
        async fn update(&self, device: Device) -> Result<Device, DeviceHubError> {
            Err(not_found(device.id()))
        }
        async fn delete(&self, id: &DeviceId) -> Result<(), DeviceHubError> {
            Err(not_found(id))
        }
        async fn exists(&self, _id: &DeviceId) -> Result<bool, DeviceHubError> {
            Ok(false)
        }
    }

    fn make_service() -> DeviceService<InMemoryDeviceRepo> {
        DeviceService::new(InMemoryDeviceRepo::default())
    }

    fn request(name: &str, brand: &str, state: &str) -> CreateDeviceRequest {
        CreateDeviceRequest {
            name: name.to_string(),
            brand: brand.to_string(),
            state: state.to_string(),
        }
    }

    fn iphone() -> CreateDeviceRequest {
        request("iPhone 15", "Apple", "available")
    }

    fn state_patch(state: &str) -> DevicePatch {
        DevicePatch {
            state: Some(state.to_string()),
            ..DevicePatch::default()
        }
    }

    fn name_patch(name: &str) -> DevicePatch {
        DevicePatch {
            name: Some(name.to_string()),
            ..DevicePatch::default()
        }
    }

    fn kind<T: std::fmt::Debug>(result: Result<T, DeviceHubError>) -> ErrorKind {
        result.unwrap_err().kind()
    }

    #[tokio::test]
    async fn should_create_device_when_valid() {
        let svc = make_service();
        let started = chrono::Utc::now();

        let created = svc.create_device(iphone()).await.unwrap();

        assert!(!created.id().as_str().is_empty());
        assert_eq!(created.name(), "iPhone 15");
        assert_eq!(created.brand(), "Apple");
        assert_eq!(created.state(), DeviceState::Available);
        assert!(created.creation_time() >= started);

        let fetched = svc.get_device(created.id().as_str()).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn should_generate_distinct_ids() {
        let svc = make_service();
        let a = svc.create_device(iphone()).await.unwrap();
        let b = svc.create_device(iphone()).await.unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[tokio::test]
    async fn should_reject_invalid_create_without_persisting() {
        let svc = make_service();
        let cases = [
            (request("", "Apple", "available"), ValidationError::EmptyName),
            (request("   ", "Apple", "available"), ValidationError::EmptyName),
            (request("iPhone 15", "", "available"), ValidationError::EmptyBrand),
            (
                request("iPhone 15", "Apple", "invalid"),
                ValidationError::InvalidState("invalid".to_string()),
            ),
        ];

        for (req, expected) in cases {
            let result = svc.create_device(req).await;
            match result {
                Err(DeviceHubError::Validation(err)) => assert_eq!(err, expected),
                other => panic!("expected validation error, got {other:?}"),
            }
        }

        assert!(svc.get_all_devices().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_surface_conflict_from_repository() {
        let svc = DeviceService::new(ScriptedRepo::Fail(|| {
            ConflictError {
                entity: "Device",
                id: "taken".to_string(),
            }
            .into()
        }));
        assert_eq!(kind(svc.create_device(iphone()).await), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn should_wrap_unexpected_create_failures_as_internal() {
        let svc = DeviceService::new(ScriptedRepo::Fail(|| {
            NotFoundError {
                entity: "Device",
                id: "x".to_string(),
            }
            .into()
        }));
        assert_eq!(kind(svc.create_device(iphone()).await), ErrorKind::Internal);

        let svc = DeviceService::new(ScriptedRepo::Fail(|| {
            DeviceHubError::internal(std::io::Error::other("connection reset"))
        }));
        assert_eq!(kind(svc.create_device(iphone()).await), ErrorKind::Internal);
    }

    #[tokio::test]
    async fn should_return_not_found_when_device_missing() {
        let svc = make_service();
        let result = svc.get_device("never-created").await;
        assert!(matches!(result, Err(DeviceHubError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_reject_blank_ids() {
        let svc = make_service();
        assert_eq!(kind(svc.get_device(" ").await), ErrorKind::Validation);
        assert_eq!(kind(svc.device_exists("").await), ErrorKind::Validation);
        assert_eq!(
            kind(svc.update_device("", state_patch("inactive")).await),
            ErrorKind::Validation
        );
        assert_eq!(kind(svc.delete_device("\n").await), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn should_report_existence() {
        let svc = make_service();
        let created = svc.create_device(iphone()).await.unwrap();
        assert!(svc.device_exists(created.id().as_str()).await.unwrap());
        assert!(!svc.device_exists("missing").await.unwrap());
    }

    #[tokio::test]
    async fn should_filter_by_brand_and_state_newest_first() {
        let svc = make_service();
        let first = svc.create_device(iphone()).await.unwrap();
        let second = svc
            .create_device(request("Galaxy S24", "Samsung", "in-use"))
            .await
            .unwrap();
        let third = svc
            .create_device(request("iPad", "Apple", "inactive"))
            .await
            .unwrap();

        let apple = svc.get_devices_by_brand("Apple").await.unwrap();
        let apple_ids: Vec<_> = apple.iter().map(Device::id).collect();
        assert_eq!(apple_ids, vec![third.id(), first.id()]);

        let in_use = svc.get_devices_by_state("in-use").await.unwrap();
        assert_eq!(in_use, vec![second]);

        assert_eq!(svc.get_all_devices().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn should_return_empty_lists_when_nothing_matches() {
        let svc = make_service();
        svc.create_device(iphone()).await.unwrap();
        assert!(svc.get_devices_by_brand("Nokia").await.unwrap().is_empty());
        assert!(svc.get_devices_by_state("inactive").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_reject_invalid_filters() {
        let svc = make_service();
        assert_eq!(kind(svc.get_devices_by_brand("  ").await), ErrorKind::Validation);
        assert_eq!(kind(svc.get_devices_by_state("broken").await), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn should_allow_every_state_transition_through_update() {
        let svc = make_service();
        for from in DeviceState::ALL {
            for to in DeviceState::ALL {
                let created = svc
                    .create_device(request("Pixel 8", "Google", from.as_str()))
                    .await
                    .unwrap();
                let id = created.id().as_str();

                let updated = svc.update_device(id, state_patch(to.as_str())).await.unwrap();
                assert_eq!(updated.state(), to);
                assert_eq!(updated.creation_time(), created.creation_time());
                assert_eq!(svc.get_device(id).await.unwrap().state(), to);
            }
        }
    }

    #[tokio::test]
    async fn should_reject_unknown_state_in_patch() {
        let svc = make_service();
        let created = svc.create_device(iphone()).await.unwrap();
        let id = created.id().as_str();

        let result = svc.update_device(id, state_patch("lost")).await;
        assert_eq!(kind(result), ErrorKind::Validation);
        assert_eq!(svc.get_device(id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn should_refuse_rename_while_in_use_and_keep_stored_values() {
        let svc = make_service();
        let created = svc
            .create_device(request("iPhone 15", "Apple", "in-use"))
            .await
            .unwrap();
        let id = created.id().as_str();

        let patch = DevicePatch {
            brand: Some("Samsung".to_string()),
            ..DevicePatch::default()
        };
        assert_eq!(
            kind(svc.update_device(id, patch).await),
            ErrorKind::PreconditionFailed
        );

        let stored = svc.get_device(id).await.unwrap();
        assert_eq!(stored.name(), "iPhone 15");
        assert_eq!(stored.brand(), "Apple");
    }

    #[tokio::test]
    async fn should_keep_brand_when_only_name_is_patched() {
        let svc = make_service();
        let created = svc.create_device(iphone()).await.unwrap();
        let id = created.id().as_str();

        let updated = svc.update_device(id, name_patch("  iPhone 15 Pro ")).await.unwrap();
        assert_eq!(updated.name(), "iPhone 15 Pro");
        assert_eq!(updated.brand(), "Apple");
        assert_eq!(svc.get_device(id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn should_distinguish_empty_name_from_absent_name() {
        let svc = make_service();
        let created = svc.create_device(iphone()).await.unwrap();
        let id = created.id().as_str();

        let result = svc.update_device(id, name_patch("")).await;
        assert!(matches!(
            result,
            Err(DeviceHubError::Validation(ValidationError::EmptyName))
        ));

        let unchanged = svc.update_device(id, DevicePatch::default()).await.unwrap();
        assert_eq!(unchanged, created);
    }

    #[tokio::test]
    async fn should_apply_state_before_rename() {
        let svc = make_service();
        let created = svc
            .create_device(request("iPhone 15", "Apple", "in-use"))
            .await
            .unwrap();
        let id = created.id().as_str();

        let patch = DevicePatch {
            name: Some("Returned iPhone".to_string()),
            state: Some("available".to_string()),
            ..DevicePatch::default()
        };
        let updated = svc.update_device(id, patch).await.unwrap();
        assert_eq!(updated.name(), "Returned iPhone");
        assert_eq!(updated.state(), DeviceState::Available);

        let patch = DevicePatch {
            name: Some("Borrowed iPhone".to_string()),
            state: Some("in-use".to_string()),
            ..DevicePatch::default()
        };
        assert_eq!(
            kind(svc.update_device(id, patch).await),
            ErrorKind::PreconditionFailed
        );
        assert_eq!(svc.get_device(id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn should_return_not_found_when_updating_missing_device() {
        let svc = make_service();
        let result = svc.update_device("ghost", state_patch("inactive")).await;
        assert_eq!(kind(result), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn should_refuse_delete_while_in_use() {
        let svc = make_service();
        let created = svc
            .create_device(request("iPhone 15", "Apple", "in-use"))
            .await
            .unwrap();
        let id = created.id().as_str();

        assert!(matches!(
            svc.delete_device(id).await,
            Err(DeviceHubError::PreconditionFailed(
                PreconditionError::DeleteInUse { .. }
            ))
        ));
        assert!(svc.device_exists(id).await.unwrap());
    }

    #[tokio::test]
    async fn should_delete_when_not_in_use() {
        let svc = make_service();
        for state in ["available", "inactive"] {
            let created = svc
                .create_device(request("iPhone 15", "Apple", state))
                .await
                .unwrap();
            let id = created.id().as_str();

            svc.delete_device(id).await.unwrap();
            assert_eq!(kind(svc.get_device(id).await), ErrorKind::NotFound);
            assert_eq!(kind(svc.delete_device(id).await), ErrorKind::NotFound);
        }
    }

    #[tokio::test]
    async fn should_follow_device_lifecycle_end_to_end() {
        let svc = make_service();

        let created = svc.create_device(iphone()).await.unwrap();
        let id = created.id().as_str();

        svc.update_device(id, state_patch("in-use")).await.unwrap();
        assert_eq!(
            kind(svc.update_device(id, name_patch("X")).await),
            ErrorKind::PreconditionFailed
        );
        assert_eq!(kind(svc.delete_device(id).await), ErrorKind::PreconditionFailed);

        svc.update_device(id, state_patch("available")).await.unwrap();
        svc.delete_device(id).await.unwrap();
        assert_eq!(kind(svc.get_device(id).await), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn should_fail_with_deadline_exceeded_when_repository_stalls() {
        let svc = DeviceService::new(ScriptedRepo::Stall).with_deadline(Duration::from_millis(20));

        assert_eq!(kind(svc.create_device(iphone()).await), ErrorKind::DeadlineExceeded);
        assert_eq!(kind(svc.get_all_devices().await), ErrorKind::DeadlineExceeded);
        assert_eq!(
            kind(svc.update_device("any", state_patch("inactive")).await),
            ErrorKind::DeadlineExceeded
        );
    }

    #[tokio::test]
    async fn should_pass_cancellation_through() {
        let svc = DeviceService::new(ScriptedRepo::Fail(|| DeviceHubError::Cancelled));
        assert_eq!(kind(svc.get_device("any").await), ErrorKind::Cancelled);
        assert_eq!(kind(svc.create_device(iphone()).await), ErrorKind::Cancelled);
    }

    #[tokio::test]
    async fn should_serve_concurrent_callers() {
        let svc = Arc::new(make_service());
        let (a, b, c) = tokio::join!(
            svc.create_device(iphone()),
            svc.create_device(request("Galaxy S24", "Samsung", "available")),
            svc.create_device(request("Pixel 8", "Google", "inactive")),
        );
        a.unwrap();
        b.unwrap();
        c.unwrap();
        assert_eq!(svc.get_all_devices().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn should_return_not_found_when_device_vanishes_before_write() {
        let svc = DeviceService::new(VanishingRepo);

        let updated = svc.update_device("gone", state_patch("inactive")).await;
        assert_eq!(kind(updated), ErrorKind::NotFound);

        let deleted = svc.delete_device("gone").await;
        assert_eq!(kind(deleted), ErrorKind::NotFound);
    }
}
