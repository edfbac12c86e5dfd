/// Error types for the sxgeo library
use std::fmt;

/// Result type alias for sxgeo operations
pub type Result<T> = std::result::Result<T, SxGeoError>;

/// Main error type for database loading and lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SxGeoError {
    /// Header or index structure does not fit the buffer
    ///
    /// Raised when the buffer is shorter than the fixed header, when a
    /// derived section boundary lies past the end of the buffer, or when a
    /// table's byte length disagrees with its declared element count.
    MalformedHeader(String),

    /// Query is not a usable dotted-quad IPv4 address
    InvalidAddress(String),

    /// The address resolved to no entry of the country table
    UnknownCountry(String),

    /// I/O errors from the file loader
    Io(String),
}

impl SxGeoError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        SxGeoError::MalformedHeader(msg.into())
    }

    pub(crate) fn invalid_address(msg: impl Into<String>) -> Self {
        SxGeoError::InvalidAddress(msg.into())
    }

    pub(crate) fn unknown_country(msg: impl Into<String>) -> Self {
        SxGeoError::UnknownCountry(msg.into())
    }
}

impl fmt::Display for SxGeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SxGeoError::MalformedHeader(msg) => write!(f, "Malformed header: {}", msg),
            SxGeoError::InvalidAddress(msg) => write!(f, "Invalid address: {}", msg),
            SxGeoError::UnknownCountry(msg) => write!(f, "Unknown country: {}", msg),
            SxGeoError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for SxGeoError {}

impl From<std::io::Error> for SxGeoError {
    fn from(err: std::io::Error) -> Self {
        SxGeoError::Io(err.to_string())
    }
}
