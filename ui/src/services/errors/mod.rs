use thiserror::Error;

use crate::services::config::MessageCatalog;

/// Why a push subscription attempt ended in the failed phase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscriptionError {
    #[error("push capability not available in this browser")]
    CapabilityUnsupported,

    #[error("invalid VAPID key: {0}")]
    InvalidKey(String),

    #[error("subscription request rejected: {0}")]
    AcquisitionFailed(String),

    #[error("subscription submission failed: {0}")]
    TransportFailed(String),

    #[error("server rejected subscription: {}", .0.as_deref().unwrap_or("no reason given"))]
    ServerRejected(Option<String>),
}

/// Failures while decoding a base64url application server key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VapidKeyError {
    #[error("key is not valid base64: {0}")]
    Decode(String),
}

/// Failures while reading a cookie value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CookieError {
    #[error("malformed percent escape at byte {0}")]
    MalformedEscape(usize),

    #[error("decoded cookie value is not UTF-8")]
    InvalidUtf8,
}

/// Failures of the subscription transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request could not be built: {0}")]
    Request(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("response body could not be read: {0}")]
    Body(String),
}

/// Failures reported by the host while showing the install prompt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstallError {
    #[error("install prompt could not be shown: {0}")]
    PromptFailed(String),

    #[error("install choice could not be read: {0}")]
    ChoiceUnavailable(String),
}

impl From<VapidKeyError> for SubscriptionError {
    fn from(error: VapidKeyError) -> Self {
        SubscriptionError::InvalidKey(error.to_string())
    }
}

impl From<TransportError> for SubscriptionError {
    fn from(error: TransportError) -> Self {
        SubscriptionError::TransportFailed(error.to_string())
    }
}

impl From<CookieError> for SubscriptionError {
    fn from(error: CookieError) -> Self {
        SubscriptionError::TransportFailed(format!("CSRF cookie unreadable: {}", error))
    }
}

pub type SubscriptionResult<T> = Result<T, SubscriptionError>;

impl SubscriptionError {
    /// Render the error as the inline message shown next to the opt-in control.
    pub fn user_message(&self, messages: &MessageCatalog) -> String {
        match self {
            SubscriptionError::CapabilityUnsupported => messages.push_not_supported.clone(),
            SubscriptionError::ServerRejected(Some(reason)) if !reason.is_empty() => reason.clone(),
            SubscriptionError::ServerRejected(_) => messages.anonymous_fallback_error.clone(),
            SubscriptionError::InvalidKey(detail)
            | SubscriptionError::AcquisitionFailed(detail)
            | SubscriptionError::TransportFailed(detail) => {
                format!("{}{}", messages.push_failed_prefix, detail)
            }
        }
    }

    /// Whether the user can reasonably try again by pressing the button again.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, SubscriptionError::CapabilityUnsupported)
    }
}
