use std::fmt;

use thiserror::Error;

/// Machine-readable refinement of a [`CatalogError::DataFetch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotFound,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures surfaced by the catalog fetch path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Remote unreachable, or it answered with a status nothing else claims.
    #[error("network error: {message}")]
    Network {
        message: String,
        status: Option<u16>,
    },

    /// Remote answered but the payload is unusable, or the entity is missing.
    #[error("data fetch error: {message}")]
    DataFetch {
        message: String,
        code: Option<ErrorCode>,
    },

    /// The request was aborted. Never shown to the user.
    #[error("request cancelled")]
    Cancelled,
}

impl CatalogError {
    pub fn network(message: impl Into<String>) -> Self {
        CatalogError::Network {
            message: message.into(),
            status: None,
        }
    }

    pub fn network_status(status: u16, message: impl Into<String>) -> Self {
        CatalogError::Network {
            message: message.into(),
            status: Some(status),
        }
    }

    pub fn data(message: impl Into<String>) -> Self {
        CatalogError::DataFetch {
            message: message.into(),
            code: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        CatalogError::DataFetch {
            message: message.into(),
            code: Some(ErrorCode::NotFound),
        }
    }

    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            CatalogError::DataFetch { code, .. } => *code,
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.code() == Some(ErrorCode::NotFound)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, CatalogError::Cancelled)
    }

    /// Classify a transport failure. Body decoding problems mean the remote
    /// was reachable, so they land in `DataFetch`.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return CatalogError::data(format!("unreadable response body: {err}"));
        }
        match err.status() {
            Some(status) => CatalogError::network_status(status.as_u16(), err.to_string()),
            None => CatalogError::network(err.to_string()),
        }
    }

    pub fn presentation(&self) -> ErrorPresentation {
        ErrorPresentation::for_error(self)
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// What the UI should show for a failed load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPresentation {
    pub title: &'static str,
    pub message: String,
    pub retry_label: &'static str,
    pub offer_reload: bool,
}

impl ErrorPresentation {
    pub fn for_error(error: &CatalogError) -> Self {
        match error {
            CatalogError::Network { .. } => Self {
                title: "Connection Problem",
                message: "Unable to connect to the server. \
                          Please check your internet connection and try again."
                    .to_string(),
                retry_label: "Retry Connection",
                offer_reload: true,
            },
            CatalogError::DataFetch { message, .. } => Self {
                title: "Data Error",
                message: if message.is_empty() {
                    "An unexpected error occurred. Please try again.".to_string()
                } else {
                    message.clone()
                },
                retry_label: "Try Again",
                offer_reload: false,
            },
            CatalogError::Cancelled => Self {
                title: "Something Went Wrong",
                message: "The request was cancelled.".to_string(),
                retry_label: "Try Again",
                offer_reload: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_a_data_error_with_code() {
        let err = CatalogError::not_found("creature \"9999\" not found");
        assert!(err.is_not_found());
        assert_eq!(err.code().map(|c| c.as_str()), Some("NOT_FOUND"));
        assert!(matches!(err, CatalogError::DataFetch { .. }));
    }

    #[test]
    fn network_errors_offer_reload() {
        let presentation = CatalogError::network("connection refused").presentation();
        assert_eq!(presentation.title, "Connection Problem");
        assert_eq!(presentation.retry_label, "Retry Connection");
        assert!(presentation.offer_reload);
        assert!(!CatalogError::network("x").is_not_found());
    }

    #[test]
    fn data_errors_keep_their_message() {
        let presentation = CatalogError::data("bad payload").presentation();
        assert_eq!(presentation.title, "Data Error");
        assert_eq!(presentation.message, "bad payload");
        assert!(!presentation.offer_reload);
    }
}
