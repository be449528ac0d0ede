//! Device — a tracked physical item with a name, a brand and a lifecycle state.
//!
//! The fields are private: every change goes through a method that enforces
//! the lifecycle rules, so a [`Device`] obtained from this crate always
//! satisfies its invariants.

mod state;

pub use state::DeviceState;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{DeviceHubError, PreconditionError, ValidationError};
use crate::id::DeviceId;

/// UTC timestamp used for `creation_time`.
pub type Timestamp = DateTime<Utc>;

/// A tracked device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Device {
    id: DeviceId,
    name: String,
    brand: String,
    state: DeviceState,
    creation_time: Timestamp,
}

impl Device {
    /// Create a new device stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceHubError::Validation`] when `id`, `name` or `brand`
    /// is empty or whitespace-only.
    pub fn new(
        id: DeviceId,
        name: impl Into<String>,
        brand: impl Into<String>,
        state: DeviceState,
    ) -> Result<Self, DeviceHubError> {
        Self::restore(id, name, brand, state, Utc::now())
    }

    /// Rebuild a device from a stored record, keeping its original
    /// `creation_time`.
    ///
    /// # Errors
    ///
    /// Same checks as [`Device::new`].
    pub fn restore(
        id: DeviceId,
        name: impl Into<String>,
        brand: impl Into<String>,
        state: DeviceState,
        creation_time: Timestamp,
    ) -> Result<Self, DeviceHubError> {
        let device = Self {
            id,
            name: name.into(),
            brand: brand.into(),
            state,
            creation_time,
        };
        device.validate()?;
        Ok(device)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.id.as_str().trim().is_empty() {
            return Err(ValidationError::EmptyId);
        }
        check_identity(&self.name, &self.brand)
    }

    #[must_use]
    pub fn id(&self) -> &DeviceId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn brand(&self) -> &str {
        &self.brand
    }

    #[must_use]
    pub fn state(&self) -> DeviceState {
        self.state
    }

    #[must_use]
    pub fn creation_time(&self) -> Timestamp {
        self.creation_time
    }

    /// Whether `name` and `brand` may currently be changed.
    #[must_use]
    pub fn can_mutate_identity(&self) -> bool {
        !self.state.is_in_use()
    }

    /// Whether the device may currently be removed.
    #[must_use]
    pub fn can_delete(&self) -> bool {
        !self.state.is_in_use()
    }

    /// Move the device to `state`. Every transition is allowed.
    pub fn set_state(&mut self, state: DeviceState) {
        self.state = state;
    }

    /// Replace `name` and `brand` together.
    ///
    /// Both values are trimmed before being stored. Nothing changes unless
    /// both are accepted.
    ///
    /// # Errors
    ///
    /// - [`DeviceHubError::PreconditionFailed`] while the device is in use
    /// - [`DeviceHubError::Validation`] if either value is blank
    pub fn set_name_and_brand(&mut self, name: &str, brand: &str) -> Result<(), DeviceHubError> {
        if !self.can_mutate_identity() {
            return Err(PreconditionError::RenameInUse {
                id: self.id.to_string(),
            }
            .into());
        }
        let (name, brand) = (name.trim(), brand.trim());
        check_identity(name, brand)?;
        self.name = name.to_string();
        self.brand = brand.to_string();
        Ok(())
    }
}

fn check_identity(name: &str, brand: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if brand.trim().is_empty() {
        return Err(ValidationError::EmptyBrand);
    }
    Ok(())
}
