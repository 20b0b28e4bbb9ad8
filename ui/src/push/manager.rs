//! Push Subscription Manager
//!
//! Drives one subscription attempt through
//! `Idle -> Pending -> {Succeeded, Failed}`:
//!
//! 1. reject immediately (no Pending) if the platform has no push support
//! 2. wait for the service worker registration to become ready
//! 3. subscribe with `userVisibleOnly` and the decoded VAPID key
//! 4. POST the subscription JSON plus identity through the transport
//! 5. settle from the identity's response policy
//!
//! Every error is folded into the state's message; an attempt always settles.
//! The `subscribing` flag keeps a second attempt from starting while one is
//! outstanding and is cleared on every exit path.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::flow::{SubscriptionIdentity, SubscriptionRequest};
use super::host::{PushHost, PushRegistration, PushSubscriptionOptions};
use super::transport::{SubmissionRequest, SubscriptionTransport};
use super::vapid::url_base64_to_bytes;
use crate::services::config::PwaConfig;
use crate::services::errors::{SubscriptionError, SubscriptionResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubscriptionPhase {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionState {
    pub phase: SubscriptionPhase,
    /// Empty unless `phase` is `Failed`
    pub error_message: String,
    /// Empty unless `phase` is `Succeeded`
    pub success_message: String,
    pub error: Option<SubscriptionError>,
    /// Set by the first successful attempt of this manager
    pub enabled: bool,
}

impl SubscriptionState {
    pub fn is_settled(&self) -> bool {
        matches!(
            self.phase,
            SubscriptionPhase::Succeeded | SubscriptionPhase::Failed
        )
    }

    /// False once an attempt failed in a way pressing the button again cannot fix.
    pub fn can_retry(&self) -> bool {
        self.error
            .as_ref()
            .map_or(true, SubscriptionError::is_retryable)
    }
}

/// Clears the subscribing flag when the attempt ends, however it ends.
struct SubscribingGuard<'a>(&'a Cell<bool>);

impl Drop for SubscribingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

type StateListener = Rc<dyn Fn(&SubscriptionState)>;

pub struct PushSubscriptionManager {
    host: Rc<dyn PushHost>,
    transport: Rc<dyn SubscriptionTransport>,
    config: PwaConfig,
    state: RefCell<SubscriptionState>,
    subscribing: Cell<bool>,
    listener: Option<StateListener>,
}

impl PushSubscriptionManager {
    pub fn new(
        host: Rc<dyn PushHost>,
        transport: Rc<dyn SubscriptionTransport>,
        config: PwaConfig,
    ) -> Self {
        Self {
            host,
            transport,
            config,
            state: RefCell::new(SubscriptionState::default()),
            subscribing: Cell::new(false),
            listener: None,
        }
    }

    /// Call `listener` with a fresh snapshot after every state change.
    pub fn with_listener(mut self, listener: impl Fn(&SubscriptionState) + 'static) -> Self {
        self.listener = Some(Rc::new(listener));
        self
    }

    pub fn state(&self) -> SubscriptionState {
        self.state.borrow().clone()
    }

    pub fn is_subscribing(&self) -> bool {
        self.subscribing.get()
    }

    /// Run one attempt against the host's ready registration.
    ///
    /// While an attempt is outstanding, further calls return the current
    /// (Pending) state without doing anything.
    pub async fn subscribe(&self, request: SubscriptionRequest) -> SubscriptionState {
        let Some(_guard) = self.begin_attempt(&request) else {
            return self.state();
        };

        if !self.host.supports_push() {
            return self.settle(&request.identity, Err(SubscriptionError::CapabilityUnsupported));
        }

        self.set_phase(SubscriptionPhase::Pending);
        let result = match self.host.ready_registration().await {
            Ok(registration) => self.acquire_and_submit(registration.as_ref(), &request).await,
            Err(e) => Err(SubscriptionError::AcquisitionFailed(e)),
        };
        self.settle(&request.identity, result)
    }

    /// Run one attempt against a registration the caller already holds,
    /// skipping the readiness wait.
    pub async fn subscribe_with_registration(
        &self,
        registration: &dyn PushRegistration,
        request: SubscriptionRequest,
    ) -> SubscriptionState {
        let Some(_guard) = self.begin_attempt(&request) else {
            return self.state();
        };

        if !self.host.supports_push() {
            return self.settle(&request.identity, Err(SubscriptionError::CapabilityUnsupported));
        }

        self.set_phase(SubscriptionPhase::Pending);
        let result = self.acquire_and_submit(registration, &request).await;
        self.settle(&request.identity, result)
    }

    fn begin_attempt(&self, request: &SubscriptionRequest) -> Option<SubscribingGuard<'_>> {
        if self.subscribing.get() {
            warn!(
                "Ignoring {} subscribe request: an attempt is already pending",
                request.identity.label()
            );
            return None;
        }
        self.subscribing.set(true);

        debug!("Starting {} push subscription", request.identity.label());
        self.update(|state| {
            state.phase = SubscriptionPhase::Idle;
            state.error_message.clear();
            state.success_message.clear();
            state.error = None;
        });
        Some(SubscribingGuard(&self.subscribing))
    }

    async fn acquire_and_submit(
        &self,
        registration: &dyn PushRegistration,
        request: &SubscriptionRequest,
    ) -> SubscriptionResult<()> {
        let options = PushSubscriptionOptions {
            user_visible_only: true,
            application_server_key: url_base64_to_bytes(&request.vapid_key)?,
        };

        let subscription = registration
            .subscribe(&options)
            .await
            .map_err(SubscriptionError::AcquisitionFailed)?;

        let submission = self.build_submission(&request.identity, subscription)?;
        let response = self.transport.post_json(submission).await?;
        request.identity.interpret_response(&response)
    }

    fn build_submission(
        &self,
        identity: &SubscriptionIdentity,
        subscription: Value,
    ) -> SubscriptionResult<SubmissionRequest> {
        let endpoints = &self.config.endpoints;
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];

        if identity.requires_csrf() {
            match self.transport.csrf_token()? {
                Some(token) => headers.push((endpoints.csrf_header.clone(), token)),
                None => warn!(
                    "No {} cookie found, submitting without {}",
                    endpoints.csrf_cookie_name, endpoints.csrf_header
                ),
            }
        }

        Ok(SubmissionRequest {
            path: identity.endpoint(endpoints).to_string(),
            headers,
            body: identity.body(subscription),
        })
    }

    fn settle(
        &self,
        identity: &SubscriptionIdentity,
        result: SubscriptionResult<()>,
    ) -> SubscriptionState {
        let messages = &self.config.messages;
        match result {
            Ok(()) => {
                info!("{} push subscription saved", identity.label());
                self.update(|state| {
                    state.phase = SubscriptionPhase::Succeeded;
                    state.success_message = identity.success_message(messages).to_string();
                    state.enabled = true;
                })
            }
            Err(error) => {
                warn!("{} push subscription failed: {}", identity.label(), error);
                self.update(|state| {
                    state.phase = SubscriptionPhase::Failed;
                    state.error_message = error.user_message(messages);
                    state.error = Some(error);
                })
            }
        }
    }

    fn set_phase(&self, phase: SubscriptionPhase) {
        self.update(|state| state.phase = phase);
    }

    fn update(&self, mutate: impl FnOnce(&mut SubscriptionState)) -> SubscriptionState {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            mutate(&mut state);
            state.clone()
        };
        if let Some(listener) = &self.listener {
            listener(&snapshot);
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::config::MessageCatalog;
    use crate::testing::{FakePushHost, FakeRegistration, RecordingTransport};
    use serde_json::json;

    const KEY: &str =
        "BEl62iUYgUivxIkv69yViEuiBIa-Ib9-SkvMeAtA3LFgDzkrxZJjSgSnfckjBJuBkr3qBUYIHBQFLXYp5Nksh8U";

    fn build(host: FakePushHost, transport: RecordingTransport) -> (PushSubscriptionManager, Rc<RecordingTransport>) {
        let transport = Rc::new(transport);
        let manager = PushSubscriptionManager::new(Rc::new(host), transport.clone(), PwaConfig::default());
        (manager, transport)
    }

    #[tokio::test]
    async fn test_identified_success_sends_csrf_and_user_id() {
        let (manager, transport) = build(
            FakePushHost::ready(FakeRegistration::granting()),
            RecordingTransport::responding(200, "").with_cookie("csrftoken=tok"),
        );

        let state = manager.subscribe(SubscriptionRequest::identified(KEY, 42)).await;
        assert_eq!(state.phase, SubscriptionPhase::Succeeded);
        assert_eq!(state.success_message, MessageCatalog::default().identified_success);
        assert!(state.error_message.is_empty());
        assert!(state.enabled);
        assert!(!manager.is_subscribing());

        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].path, "/webpush/save_information/");
        assert!(sent[0].headers.contains(&("X-CSRFToken".to_string(), "tok".to_string())));
        assert_eq!(sent[0].body["user_id"], json!(42));
        assert_eq!(sent[0].body["subscription"], FakeRegistration::subscription_json());
    }

    #[tokio::test]
    async fn test_key_is_decoded_for_platform() {
        let registration = FakeRegistration::granting();
        let seen = registration.seen_options();
        let (manager, _) = build(FakePushHost::ready(registration), RecordingTransport::responding(200, ""));

        manager.subscribe(SubscriptionRequest::identified(KEY, 1)).await;
        let options = seen.borrow().clone().unwrap();
        assert!(options.user_visible_only);
        assert_eq!(options.application_server_key, url_base64_to_bytes(KEY).unwrap());
    }

    #[tokio::test]
    async fn test_identified_without_cookie_omits_header() {
        let (manager, transport) = build(
            FakePushHost::ready(FakeRegistration::granting()),
            RecordingTransport::responding(200, ""),
        );
        let state = manager.subscribe(SubscriptionRequest::identified(KEY, 1)).await;
        assert_eq!(state.phase, SubscriptionPhase::Succeeded);
        assert!(transport.requests()[0]
            .headers
            .iter()
            .all(|(name, _)| name != "X-CSRFToken"));
    }

    #[tokio::test]
    async fn test_anonymous_omits_csrf_and_requires_flag() {
        let (manager, transport) = build(
            FakePushHost::ready(FakeRegistration::granting()),
            RecordingTransport::responding(200, "{\"success\": true}").with_cookie("csrftoken=tok"),
        );
        let state = manager.subscribe(SubscriptionRequest::anonymous(KEY, 9)).await;
        assert_eq!(state.phase, SubscriptionPhase::Succeeded);
        assert_eq!(state.success_message, MessageCatalog::default().anonymous_success);

        let sent = transport.requests();
        assert_eq!(sent[0].path, "/notifications/save-anon-subscription/");
        assert_eq!(sent[0].headers, vec![("Content-Type".to_string(), "application/json".to_string())]);
        assert_eq!(sent[0].body["school_id"], json!(9));
    }

    #[tokio::test]
    async fn test_anonymous_http_success_without_flag_fails() {
        let (manager, _) = build(
            FakePushHost::ready(FakeRegistration::granting()),
            RecordingTransport::responding(200, "{}"),
        );
        let state = manager.subscribe(SubscriptionRequest::anonymous(KEY, 9)).await;
        assert_eq!(state.phase, SubscriptionPhase::Failed);
        assert_eq!(state.error_message, MessageCatalog::default().anonymous_fallback_error);
        assert!(!state.enabled);
    }

    #[tokio::test]
    async fn test_permission_denied_settles_failed() {
        let (manager, transport) = build(
            FakePushHost::ready(FakeRegistration::denying("NotAllowedError: permission denied")),
            RecordingTransport::responding(200, ""),
        );
        let state = manager.subscribe(SubscriptionRequest::identified(KEY, 1)).await;
        assert_eq!(state.phase, SubscriptionPhase::Failed);
        assert!(matches!(state.error, Some(SubscriptionError::AcquisitionFailed(_))));
        assert!(state.error_message.contains("permission denied"));
        assert!(transport.requests().is_empty());
        assert!(!manager.is_subscribing());
    }

    #[tokio::test]
    async fn test_registration_never_ready_error_settles_failed() {
        let (manager, _) = build(FakePushHost::broken("no active worker"), RecordingTransport::responding(200, ""));
        let state = manager.subscribe(SubscriptionRequest::anonymous(KEY, 3)).await;
        assert_eq!(state.phase, SubscriptionPhase::Failed);
        assert!(state.error_message.ends_with("no active worker"));
    }

    #[tokio::test]
    async fn test_transport_failure_settles_failed() {
        let (manager, _) = build(
            FakePushHost::ready(FakeRegistration::granting()),
            RecordingTransport::failing("connection reset"),
        );
        let state = manager.subscribe(SubscriptionRequest::identified(KEY, 1)).await;
        assert_eq!(state.phase, SubscriptionPhase::Failed);
        assert!(matches!(state.error, Some(SubscriptionError::TransportFailed(_))));
        assert!(state.error_message.starts_with(&MessageCatalog::default().push_failed_prefix));
    }

    #[tokio::test]
    async fn test_invalid_key_never_reaches_platform() {
        let registration = FakeRegistration::granting();
        let seen = registration.seen_options();
        let (manager, _) = build(FakePushHost::ready(registration), RecordingTransport::responding(200, ""));
        let state = manager.subscribe(SubscriptionRequest::identified("not base64!", 1)).await;
        assert_eq!(state.phase, SubscriptionPhase::Failed);
        assert!(matches!(state.error, Some(SubscriptionError::InvalidKey(_))));
        assert!(seen.borrow().is_none());
    }

    #[tokio::test]
    async fn test_second_call_while_pending_is_ignored() {
        let (host, release) = FakePushHost::gated(FakeRegistration::granting());
        let (manager, transport) = build(host, RecordingTransport::responding(200, "{\"success\": true}"));

        let (first, second, _) = futures::join!(
            manager.subscribe(SubscriptionRequest::anonymous(KEY, 1)),
            async {
                let state = manager.subscribe(SubscriptionRequest::anonymous(KEY, 2)).await;
                assert!(manager.is_subscribing());
                state
            },
            async move {
                let _ = release.send(());
            }
        );

        assert_eq!(second.phase, SubscriptionPhase::Pending);
        assert_eq!(first.phase, SubscriptionPhase::Succeeded);
        assert_eq!(transport.requests().len(), 1);
        assert_eq!(transport.requests()[0].body["school_id"], json!(1));
        assert!(!manager.is_subscribing());
    }

    #[tokio::test]
    async fn test_new_attempt_resets_previous_outcome() {
        let (manager, _) = build(
            FakePushHost::ready(FakeRegistration::granting()),
            RecordingTransport::responding(200, "{\"success\": false, \"error\": \"quota exceeded\"}"),
        );
        let failed = manager.subscribe(SubscriptionRequest::anonymous(KEY, 1)).await;
        assert_eq!(failed.error_message, "quota exceeded");

        let phases = Rc::new(RefCell::new(Vec::new()));
        let recorded = phases.clone();
        let manager = manager.with_listener(move |s| recorded.borrow_mut().push(s.phase));
        let identified = manager.subscribe(SubscriptionRequest::identified(KEY, 1)).await;
        assert_eq!(identified.phase, SubscriptionPhase::Succeeded);
        assert!(identified.error_message.is_empty());
        assert_eq!(
            *phases.borrow(),
            vec![SubscriptionPhase::Idle, SubscriptionPhase::Pending, SubscriptionPhase::Succeeded]
        );
    }

    #[tokio::test]
    async fn test_unsupported_platform_fails_without_pending() {
        let phases = Rc::new(RefCell::new(Vec::new()));
        let recorded = phases.clone();
        let (manager, transport) = build(FakePushHost::unsupported(), RecordingTransport::responding(200, ""));
        let manager = manager.with_listener(move |s| recorded.borrow_mut().push(s.phase));

        let state = manager.subscribe(SubscriptionRequest::identified(KEY, 1)).await;
        assert_eq!(state.phase, SubscriptionPhase::Failed);
        assert_eq!(state.error, Some(SubscriptionError::CapabilityUnsupported));
        assert_eq!(state.error_message, MessageCatalog::default().push_not_supported);
        assert!(!phases.borrow().contains(&SubscriptionPhase::Pending));
        assert!(transport.requests().is_empty());
        assert!(!manager.is_subscribing());
        assert!(!state.can_retry());
    }

    #[tokio::test]
    async fn test_denied_permission_can_be_retried() {
        let (manager, _) = build(
            FakePushHost::ready(FakeRegistration::denying("NotAllowedError: denied")),
            RecordingTransport::responding(200, ""),
        );
        assert!(manager.state().can_retry());

        let state = manager.subscribe(SubscriptionRequest::anonymous(KEY, 2)).await;
        assert_eq!(state.phase, SubscriptionPhase::Failed);
        assert!(state.can_retry());
    }

    #[tokio::test]
    async fn test_explicit_registration_skips_readiness() {
        let (manager, transport) = build(FakePushHost::broken("unused"), RecordingTransport::responding(200, ""));
        let registration = FakeRegistration::granting();
        let state = manager
            .subscribe_with_registration(&registration, SubscriptionRequest::identified(KEY, 5))
            .await;
        assert_eq!(state.phase, SubscriptionPhase::Succeeded);
        assert_eq!(transport.requests().len(), 1);
    }
}
