//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use reqwest::StatusCode;
use rusqlite::Error as SqlError;
use zipcast_common::StorageError;
use zipcast_domain::ZipcastError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub ZipcastError);

impl From<InfraError> for ZipcastError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ZipcastError> for InfraError {
    fn from(value: ZipcastError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoZipcastError {
    fn into_zipcast(self) -> ZipcastError;
}

/// Domain error for a non-success upstream HTTP status.
///
/// 404 means the upstream has nothing for the request; every other status
/// is an upstream failure that carries the code.
pub fn status_error(status: StatusCode) -> ZipcastError {
    let code = status.as_u16();
    let message =
        format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

    match code {
        404 => ZipcastError::NotFound(message),
        _ => ZipcastError::upstream_status(message, code),
    }
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → ZipcastError */
/* -------------------------------------------------------------------------- */

impl IntoZipcastError for SqlError {
    fn into_zipcast(self) -> ZipcastError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match err.code {
                    ErrorCode::DatabaseBusy => {
                        ZipcastError::StoreUnavailable("database is busy".into())
                    }
                    ErrorCode::DatabaseLocked => {
                        ZipcastError::StoreUnavailable("database is locked".into())
                    }
                    ErrorCode::ReadOnly => {
                        ZipcastError::StoreUnavailable("database is read-only".into())
                    }
                    ErrorCode::DiskFull => ZipcastError::StoreUnavailable("disk is full".into()),
                    ErrorCode::CannotOpen => {
                        ZipcastError::StoreUnavailable("unable to open database file".into())
                    }
                    _ => ZipcastError::StoreUnavailable(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::FromSqlConversionFailure(_, _, cause) => {
                ZipcastError::StoreUnavailable(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                ZipcastError::StoreUnavailable(format!("invalid column type: {ty}"))
            }
            RE::InvalidPath(path) => ZipcastError::StoreUnavailable(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => ZipcastError::StoreUnavailable(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_zipcast())
    }
}

/* -------------------------------------------------------------------------- */
/* StorageError / r2d2::Error → ZipcastError */
/* -------------------------------------------------------------------------- */

impl IntoZipcastError for StorageError {
    fn into_zipcast(self) -> ZipcastError {
        if self.is_busy() {
            return ZipcastError::StoreUnavailable(format!("database busy: {self}"));
        }
        match self {
            StorageError::Rusqlite(err) => err.into_zipcast(),
            other => ZipcastError::StoreUnavailable(other.to_string()),
        }
    }
}

impl From<StorageError> for InfraError {
    fn from(value: StorageError) -> Self {
        InfraError(value.into_zipcast())
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(ZipcastError::StoreUnavailable(format!("connection pool error: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ZipcastError */
/* -------------------------------------------------------------------------- */

impl IntoZipcastError for HttpError {
    fn into_zipcast(self) -> ZipcastError {
        if self.is_timeout() {
            return ZipcastError::upstream("HTTP request timed out");
        }

        if self.is_connect() {
            return ZipcastError::upstream("HTTP connection failure");
        }

        if let Some(status) = self.status() {
            return status_error(status);
        }

        if self.is_decode() {
            return ZipcastError::upstream(format!("invalid upstream payload: {self}"));
        }

        if self.is_builder() {
            return ZipcastError::Internal(format!("invalid HTTP request: {self}"));
        }

        ZipcastError::upstream(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_zipcast())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → ZipcastError */
/* -------------------------------------------------------------------------- */

impl IntoZipcastError for serde_json::Error {
    fn into_zipcast(self) -> ZipcastError {
        ZipcastError::Internal(format!("JSON serialization failed: {self}"))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(value.into_zipcast())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
