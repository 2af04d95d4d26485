//! Unified error codes for the sync service
//!
//! This module defines all error codes used across the server and admin API.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 4xxx: Sync/conflict errors
//! - 6xxx: Product errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// Caller is not authenticated
    NotAuthenticated = 1001,
    /// Webhook signature verification failed
    SignatureInvalid = 1002,

    // ==================== 4xxx: Sync ====================
    /// Sync conflict not found
    ConflictNotFound = 4001,
    /// Conflict has already been resolved
    ConflictAlreadyResolved = 4002,
    /// Requested resolution is not applicable to this conflict type
    ResolutionUnsupported = 4003,
    /// Manual resolution requires notes
    ResolutionNotesRequired = 4004,
    /// External catalog version token is stale
    CatalogVersionStale = 4005,
    /// External system identifier is not supported
    UnsupportedSystem = 4006,

    // ==================== 6xxx: Product ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product is not linked to an external catalog item
    ProductNotLinked = 6002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// External commerce API error
    ExternalApiError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default human-readable message for this error code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::InvalidFormat => "Invalid format",
            Self::RequiredField => "Required field missing",

            Self::NotAuthenticated => "Not authenticated",
            Self::SignatureInvalid => "Webhook signature verification failed",

            Self::ConflictNotFound => "Sync conflict not found",
            Self::ConflictAlreadyResolved => "Conflict has already been resolved",
            Self::ResolutionUnsupported => "Resolution is not applicable to this conflict type",
            Self::ResolutionNotesRequired => "Manual resolution requires notes",
            Self::CatalogVersionStale => "External catalog version is stale",
            Self::UnsupportedSystem => "External system is not supported",

            Self::ProductNotFound => "Product not found",
            Self::ProductNotLinked => "Product is not linked to an external item",

            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
            Self::NetworkError => "Network error",
            Self::ExternalApiError => "External commerce API error",
            Self::ConfigError => "Configuration error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> u16 {
        code.code()
    }
}

/// Error returned when converting an unknown u16 value to [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Success),
            1 => Ok(Self::Unknown),
            2 => Ok(Self::ValidationFailed),
            3 => Ok(Self::NotFound),
            4 => Ok(Self::AlreadyExists),
            5 => Ok(Self::InvalidRequest),
            6 => Ok(Self::InvalidFormat),
            7 => Ok(Self::RequiredField),

            1001 => Ok(Self::NotAuthenticated),
            1002 => Ok(Self::SignatureInvalid),

            4001 => Ok(Self::ConflictNotFound),
            4002 => Ok(Self::ConflictAlreadyResolved),
            4003 => Ok(Self::ResolutionUnsupported),
            4004 => Ok(Self::ResolutionNotesRequired),
            4005 => Ok(Self::CatalogVersionStale),
            4006 => Ok(Self::UnsupportedSystem),

            6001 => Ok(Self::ProductNotFound),
            6002 => Ok(Self::ProductNotLinked),

            9001 => Ok(Self::InternalError),
            9002 => Ok(Self::DatabaseError),
            9003 => Ok(Self::NetworkError),
            9004 => Ok(Self::ExternalApiError),
            9005 => Ok(Self::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}
