//! Identity variants of the push subscription flow.
//!
//! The identified (signed-in account) and anonymous (school visitor) flows share
//! one state machine and differ only in endpoint, credential, body field and
//! how the response is judged. That policy lives on [`SubscriptionIdentity`].

use serde_json::{json, Value};

use super::transport::SubmissionResponse;
use crate::services::config::{EndpointConfig, MessageCatalog};
use crate::services::errors::{SubscriptionError, SubscriptionResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionIdentity {
    /// Subscription bound to a signed-in account
    Identified { user_id: u64 },
    /// Anonymous subscription scoped to a school's menu
    Anonymous { school_id: u64 },
}

/// Input of one `subscribe()` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionRequest {
    /// base64url-encoded VAPID public key
    pub vapid_key: String,
    pub identity: SubscriptionIdentity,
}

impl SubscriptionRequest {
    pub fn identified(vapid_key: impl Into<String>, user_id: u64) -> Self {
        Self {
            vapid_key: vapid_key.into(),
            identity: SubscriptionIdentity::Identified { user_id },
        }
    }

    pub fn anonymous(vapid_key: impl Into<String>, school_id: u64) -> Self {
        Self {
            vapid_key: vapid_key.into(),
            identity: SubscriptionIdentity::Anonymous { school_id },
        }
    }
}

impl SubscriptionIdentity {
    pub fn label(&self) -> &'static str {
        match self {
            SubscriptionIdentity::Identified { .. } => "identified",
            SubscriptionIdentity::Anonymous { .. } => "anonymous",
        }
    }

    pub fn endpoint<'a>(&self, endpoints: &'a EndpointConfig) -> &'a str {
        match self {
            SubscriptionIdentity::Identified { .. } => &endpoints.authenticated_path,
            SubscriptionIdentity::Anonymous { .. } => &endpoints.anonymous_path,
        }
    }

    /// Only the account endpoint is CSRF protected; the anonymous one is open.
    pub fn requires_csrf(&self) -> bool {
        matches!(self, SubscriptionIdentity::Identified { .. })
    }

    pub fn body(&self, subscription: Value) -> Value {
        match self {
            SubscriptionIdentity::Identified { user_id } => json!({
                "subscription": subscription,
                "user_id": user_id,
            }),
            SubscriptionIdentity::Anonymous { school_id } => json!({
                "subscription": subscription,
                "school_id": school_id,
            }),
        }
    }

    /// Decide whether a completed submission counts as success.
    ///
    /// The account endpoint has no response contract, so any completed exchange
    /// succeeds. The anonymous endpoint must answer `{"success": true}`.
    pub fn interpret_response(&self, response: &SubmissionResponse) -> SubscriptionResult<()> {
        match self {
            SubscriptionIdentity::Identified { .. } => Ok(()),
            SubscriptionIdentity::Anonymous { .. } => {
                let data: Value = serde_json::from_str(&response.body).map_err(|e| {
                    SubscriptionError::TransportFailed(format!("response is not JSON: {}", e))
                })?;

                if data.get("success") == Some(&Value::Bool(true)) {
                    return Ok(());
                }

                let reason = data
                    .get("error")
                    .and_then(Value::as_str)
                    .filter(|reason| !reason.is_empty())
                    .map(str::to_string);
                Err(SubscriptionError::ServerRejected(reason))
            }
        }
    }

    pub fn success_message<'a>(&self, messages: &'a MessageCatalog) -> &'a str {
        match self {
            SubscriptionIdentity::Identified { .. } => &messages.identified_success,
            SubscriptionIdentity::Anonymous { .. } => &messages.anonymous_success,
        }
    }
}
