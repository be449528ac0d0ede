//! `SQLite` implementation of [`DeviceRepository`].

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use devicehub_app::ports::DeviceRepository;
use devicehub_domain::device::{Device, DeviceState, Timestamp};
use devicehub_domain::error::{ConflictError, DeviceHubError, NotFoundError};
use devicehub_domain::id::DeviceId;

use crate::error::StorageError;

/// Wrapper for converting database rows into domain [`Device`].
struct Wrapper(Device);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let brand: String = row.try_get("brand")?;
        let state: String = row.try_get("state")?;
        let creation_time: String = row.try_get("creation_time")?;

        let id = DeviceId::from_str(&id).map_err(decode)?;
        let state = DeviceState::from_str(&state).map_err(decode)?;
        let creation_time = DateTime::parse_from_rfc3339(&creation_time)
            .map_err(decode)?
            .to_utc();

        Device::restore(id, name, brand, state, creation_time)
            .map(Self)
            .map_err(decode)
    }
}

fn decode(err: impl std::error::Error + Send + Sync + 'static) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(err))
}

/// Fixed-width RFC 3339 so that ordering the text column orders by time.
fn encode_time(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn not_found(id: &DeviceId) -> DeviceHubError {
    NotFoundError {
        entity: "Device",
        id: id.to_string(),
    }
    .into()
}

const INSERT: &str =
    "INSERT INTO devices (id, name, brand, state, creation_time) VALUES (?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str =
    "SELECT id, name, brand, state, creation_time FROM devices WHERE id = ?";
const SELECT_ALL: &str =
    "SELECT id, name, brand, state, creation_time FROM devices ORDER BY creation_time DESC";
const SELECT_BY_BRAND: &str = r"
    SELECT id, name, brand, state, creation_time FROM devices
    WHERE brand = ?
    ORDER BY creation_time DESC
";
const SELECT_BY_STATE: &str = r"
    SELECT id, name, brand, state, creation_time FROM devices
    WHERE state = ?
    ORDER BY creation_time DESC
";
const UPDATE: &str = "UPDATE devices SET name = ?, brand = ?, state = ? WHERE id = ?";
const DELETE_BY_ID: &str = "DELETE FROM devices WHERE id = ?";
const EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM devices WHERE id = ?)";

/// `SQLite`-backed device repository.
#[derive(Clone)]
pub struct SqliteDeviceRepository {
    pool: SqlitePool,
}

impl SqliteDeviceRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_list(
        &self,
        sql: &'static str,
        filter: Option<&str>,
    ) -> Result<Vec<Device>, DeviceHubError> {
        let mut query = sqlx::query_as::<_, Wrapper>(sql);
        if let Some(value) = filter {
            query = query.bind(value.to_string());
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }
}

impl DeviceRepository for SqliteDeviceRepository {
    async fn create(&self, device: Device) -> Result<Device, DeviceHubError> {
        sqlx::query(INSERT)
            .bind(device.id().as_str())
            .bind(device.name())
            .bind(device.brand())
            .bind(device.state().as_str())
            .bind(encode_time(device.creation_time()))
            .execute(&self.pool)
            .await
            .map_err(|err| match err {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    DeviceHubError::from(ConflictError {
                        entity: "Device",
                        id: device.id().to_string(),
                    })
                }
                other => StorageError::from(other).into(),
            })?;

        Ok(device)
    }

    async fn get_by_id(&self, id: &DeviceId) -> Result<Device, DeviceHubError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        row.map(|w| w.0).ok_or_else(|| not_found(id))
    }

    async fn get_all(&self) -> Result<Vec<Device>, DeviceHubError> {
        self.fetch_list(SELECT_ALL, None).await
    }

    async fn get_by_brand(&self, brand: &str) -> Result<Vec<Device>, DeviceHubError> {
        self.fetch_list(SELECT_BY_BRAND, Some(brand)).await
    }

    async fn get_by_state(&self, state: DeviceState) -> Result<Vec<Device>, DeviceHubError> {
        self.fetch_list(SELECT_BY_STATE, Some(state.as_str())).await
    }

    async fn update(&self, device: Device) -> Result<Device, DeviceHubError> {
        let result = sqlx::query(UPDATE)
            .bind(device.name())
            .bind(device.brand())
            .bind(device.state().as_str())
            .bind(device.id().as_str())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        if result.rows_affected() == 0 {
            return Err(not_found(device.id()));
        }
        Ok(device)
    }

    async fn delete(&self, id: &DeviceId) -> Result<(), DeviceHubError> {
        let result = sqlx::query(DELETE_BY_ID)
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn exists(&self, id: &DeviceId) -> Result<bool, DeviceHubError> {
        let found: i64 = sqlx::query_scalar(EXISTS)
            .bind(id.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(found != 0)
    }
}
