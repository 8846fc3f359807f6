//! Errors surfaced to automation clients.

use thiserror::Error;

use rackmap_core::RackError;

/// Why a request failed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    /// The request line was not valid JSON or not an envelope.
    #[error("invalid JSON: {0}")]
    Json(String),

    /// `type` names no known tool.
    #[error("unknown tool '{0}'")]
    UnknownTool(String),

    /// Parameters missing, mistyped, negative or contradictory.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The engine refused the request.
    #[error(transparent)]
    Rack(#[from] RackError),
}

impl ApiError {
    /// Create an invalid request error.
    pub fn invalid(reason: impl Into<String>) -> Self {
        ApiError::InvalidRequest(reason.into())
    }

    /// Stable snake_case code for the response envelope.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Json(_) => "invalid_json",
            ApiError::UnknownTool(_) => "unknown_tool",
            ApiError::InvalidRequest(_) => "invalid_request",
            ApiError::Rack(e) => e.code(),
        }
    }
}

impl From<rackmap_core::AddressError> for ApiError {
    fn from(e: rackmap_core::AddressError) -> Self {
        ApiError::Rack(e.into())
    }
}

impl From<rackmap_core::MacroError> for ApiError {
    fn from(e: rackmap_core::MacroError) -> Self {
        ApiError::Rack(e.into())
    }
}

impl From<rackmap_core::HostError> for ApiError {
    fn from(e: rackmap_core::HostError) -> Self {
        ApiError::Rack(e.into())
    }
}
