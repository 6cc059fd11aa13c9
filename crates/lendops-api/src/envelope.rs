//! The `{ data, error, status }` result envelope returned by every request.

use serde::Serialize;
use tracing::warn;

use crate::error::Error;

/// Normalized outcome of one outbound call.
///
/// `data` and `error` are mutually exclusive, with two exceptions where both
/// are `None`: an HTTP 204, and a 2xx whose body was empty, not JSON, or not
/// shaped like `T`. `status` is 0 when no response was received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseEnvelope<T> {
    pub data: Option<T>,
    pub error: Option<String>,
    pub status: u16,
}

impl<T> ResponseEnvelope<T> {
    pub(crate) fn success(status: u16, data: Option<T>) -> Self {
        Self {
            data,
            error: None,
            status,
        }
    }

    pub(crate) fn no_content() -> Self {
        Self {
            data: None,
            error: None,
            status: 204,
        }
    }

    pub(crate) fn failure(status: u16, message: String) -> Self {
        Self {
            data: None,
            error: Some(message),
            status,
        }
    }

    pub(crate) fn transport_failure(message: String) -> Self {
        Self::failure(0, message)
    }

    /// `true` when no response was obtained.
    pub fn is_transport_failure(&self) -> bool {
        self.status == 0
    }

    /// `true` for a 2xx outcome without an error.
    pub fn is_success(&self) -> bool {
        self.error.is_none() && (200..300).contains(&self.status)
    }

    /// Transform the payload, keeping `error` and `status`.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ResponseEnvelope<U> {
        ResponseEnvelope {
            data: self.data.map(f),
            error: self.error,
            status: self.status,
        }
    }

    /// Take the payload or fail.
    ///
    /// The error carries the upstream message when there is one, otherwise
    /// `fallback`.
    pub fn into_data(self, fallback: &str) -> Result<T, Error> {
        let Self {
            data,
            error,
            status,
        } = self;
        match (data, error) {
            (_, Some(message)) => Err(Error::from_failure(status, message)),
            (Some(data), None) => Ok(data),
            (None, None) => Err(Error::MissingData {
                status,
                message: fallback.to_owned(),
            }),
        }
    }

    /// Succeed on any error-free 2xx, ignoring the payload.
    ///
    /// For endpoints that answer 204 or an empty body.
    pub fn into_unit(self, fallback: &str) -> Result<(), Error> {
        match self.error {
            Some(message) => Err(Error::from_failure(self.status, message)),
            None if (200..300).contains(&self.status) => Ok(()),
            None => Err(Error::Status {
                status: self.status,
                message: fallback.to_owned(),
            }),
        }
    }

    /// Take the payload, or `T::default()` if there is none.
    ///
    /// Only a handful of listing operations use this; they predate the
    /// error convention and their callers render an empty state instead of
    /// an error. The swallowed failure is logged.
    pub fn into_data_or_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self.into_data(context) {
            Ok(data) => data,
            Err(err) => {
                warn!(status = ?err.status(), error = %err, "{context}: falling back to an empty value");
                T::default()
            }
        }
    }
}
