//! Push Notification Subscription
//!
//! - **vapid**: base64url application server key transform
//! - **cookie**: CSRF cookie lookup
//! - **host**: service worker / push manager seam
//! - **transport**: submission seam and the reqwest transport
//! - **flow**: identified vs anonymous policy
//! - **manager**: the shared subscription state machine
//! - **worker**: service worker registration at app start

pub mod cookie;
pub mod flow;
pub mod host;
pub mod manager;
pub mod transport;
pub mod vapid;
pub mod worker;

pub use cookie::{get_cookie, CookieSource, StaticCookies};
pub use flow::{SubscriptionIdentity, SubscriptionRequest};
pub use host::{PushHost, PushRegistration, PushSubscriptionOptions, UnsupportedPushHost};
pub use manager::{PushSubscriptionManager, SubscriptionPhase, SubscriptionState};
pub use transport::{HttpTransport, SubmissionRequest, SubmissionResponse, SubscriptionTransport};
pub use vapid::{bytes_to_url_base64, url_base64_to_bytes};
pub use worker::{register_worker, WorkerStatus};
