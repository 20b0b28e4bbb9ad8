//! Test doubles for the host seams.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;
use serde_json::{json, Value};

use crate::install::{DeferredPrompt, EligibilityEvent, EligibilityListener, InstallHost, InstallOutcome};
use crate::platform::{EnvironmentSignals, EnvironmentSource};
use crate::push::{
    get_cookie, PushHost, PushRegistration, PushSubscriptionOptions, SubmissionRequest,
    SubmissionResponse, SubscriptionTransport,
};
use crate::services::errors::{CookieError, InstallError, TransportError};

/// Environment whose display mode can flip mid-test.
pub struct SwitchableEnvironment {
    signals: RefCell<EnvironmentSignals>,
}

impl SwitchableEnvironment {
    pub fn new(signals: EnvironmentSignals) -> Self {
        Self {
            signals: RefCell::new(signals),
        }
    }

    pub fn set_standalone(&self, standalone: bool) {
        self.signals.borrow_mut().standalone_display = standalone;
    }
}

impl EnvironmentSource for SwitchableEnvironment {
    fn read_signals(&self) -> EnvironmentSignals {
        self.signals.borrow().clone()
    }
}

/// What happened to one fired eligibility event.
#[derive(Clone, Default)]
pub struct EventProbe {
    prevented: Rc<Cell<bool>>,
    prompts: Rc<Cell<u32>>,
}

impl EventProbe {
    pub fn default_prevented(&self) -> bool {
        self.prevented.get()
    }

    pub fn prompt_count(&self) -> u32 {
        self.prompts.get()
    }
}

struct FakeEvent {
    probe: EventProbe,
    choice: oneshot::Receiver<InstallOutcome>,
}

impl EligibilityEvent for FakeEvent {
    fn prevent_default(&self) {
        self.probe.prevented.set(true);
    }

    fn into_prompt(self: Box<Self>) -> Box<dyn DeferredPrompt> {
        Box::new(FakePrompt {
            probe: self.probe,
            choice: RefCell::new(Some(self.choice)),
        })
    }
}

struct FakePrompt {
    probe: EventProbe,
    choice: RefCell<Option<oneshot::Receiver<InstallOutcome>>>,
}

#[async_trait(?Send)]
impl DeferredPrompt for FakePrompt {
    fn prompt(&self) -> Result<(), InstallError> {
        self.probe.prompts.set(self.probe.prompts.get() + 1);
        Ok(())
    }

    async fn user_choice(&self) -> Result<InstallOutcome, InstallError> {
        let receiver = self.choice.borrow_mut().take();
        match receiver {
            Some(receiver) => receiver
                .await
                .map_err(|_| InstallError::ChoiceUnavailable("choice dropped".to_string())),
            None => Err(InstallError::ChoiceUnavailable("choice already read".to_string())),
        }
    }
}

/// Install host that fires eligibility events on demand.
#[derive(Clone, Default)]
pub struct FakeInstallHost {
    listener: Rc<RefCell<Option<EligibilityListener>>>,
}

impl FakeInstallHost {
    /// Fire an event whose prompt resolves immediately with `outcome`.
    pub fn fire(&self, outcome: InstallOutcome) -> EventProbe {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(outcome);
        self.fire_with(rx)
    }

    /// Fire an event whose prompt resolves when the returned sender is used.
    pub fn fire_pending(&self) -> (EventProbe, oneshot::Sender<InstallOutcome>) {
        let (tx, rx) = oneshot::channel();
        (self.fire_with(rx), tx)
    }

    fn fire_with(&self, choice: oneshot::Receiver<InstallOutcome>) -> EventProbe {
        let probe = EventProbe::default();
        let event = FakeEvent {
            probe: probe.clone(),
            choice,
        };
        if let Some(listener) = self.listener.borrow_mut().as_mut() {
            listener(Box::new(event));
        }
        probe
    }
}

impl InstallHost for FakeInstallHost {
    fn on_install_eligible(&self, listener: EligibilityListener) {
        *self.listener.borrow_mut() = Some(listener);
    }
}

/// Registration that grants or denies every subscribe call.
#[derive(Clone)]
pub struct FakeRegistration {
    outcome: Result<Value, String>,
    seen: Rc<RefCell<Option<PushSubscriptionOptions>>>,
}

impl FakeRegistration {
    pub fn subscription_json() -> Value {
        json!({
            "endpoint": "https://push.example.net/send/abc123",
            "expirationTime": null,
            "keys": {"p256dh": "BNcRd", "auth": "tBHI"}
        })
    }

    pub fn granting() -> Self {
        Self {
            outcome: Ok(Self::subscription_json()),
            seen: Rc::default(),
        }
    }

    pub fn denying(reason: &str) -> Self {
        Self {
            outcome: Err(reason.to_string()),
            seen: Rc::default(),
        }
    }

    /// Options of the last subscribe call, shared with the registration.
    pub fn seen_options(&self) -> Rc<RefCell<Option<PushSubscriptionOptions>>> {
        self.seen.clone()
    }
}

#[async_trait(?Send)]
impl PushRegistration for FakeRegistration {
    async fn subscribe(&self, options: &PushSubscriptionOptions) -> Result<Value, String> {
        *self.seen.borrow_mut() = Some(options.clone());
        self.outcome.clone()
    }
}

pub struct FakePushHost {
    supported: bool,
    registration: Result<FakeRegistration, String>,
    gate: RefCell<Option<oneshot::Receiver<()>>>,
    worker_error: Option<String>,
    registered: RefCell<Vec<String>>,
}

impl FakePushHost {
    pub fn ready(registration: FakeRegistration) -> Self {
        Self {
            supported: true,
            registration: Ok(registration),
            gate: RefCell::new(None),
            worker_error: None,
            registered: RefCell::default(),
        }
    }

    pub fn broken(reason: &str) -> Self {
        Self {
            supported: true,
            registration: Err(reason.to_string()),
            gate: RefCell::new(None),
            worker_error: None,
            registered: RefCell::default(),
        }
    }

    pub fn unsupported() -> Self {
        Self {
            supported: false,
            registration: Err("unsupported".to_string()),
            gate: RefCell::new(None),
            worker_error: None,
            registered: RefCell::default(),
        }
    }

    /// Service worker registration rejects with `reason`.
    pub fn rejecting_worker(mut self, reason: &str) -> Self {
        self.worker_error = Some(reason.to_string());
        self
    }

    /// Scripts passed to `register_worker`, in call order.
    pub fn registered_scripts(&self) -> Vec<String> {
        self.registered.borrow().clone()
    }

    /// Registration readiness waits until the returned sender fires.
    pub fn gated(registration: FakeRegistration) -> (Self, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        let host = Self {
            supported: true,
            registration: Ok(registration),
            gate: RefCell::new(Some(rx)),
            worker_error: None,
            registered: RefCell::default(),
        };
        (host, tx)
    }
}

#[async_trait(?Send)]
impl PushHost for FakePushHost {
    fn supports_push(&self) -> bool {
        self.supported
    }

    async fn register_worker(&self, script_path: &str) -> Result<(), String> {
        self.registered.borrow_mut().push(script_path.to_string());
        match &self.worker_error {
            Some(reason) => Err(reason.clone()),
            None => Ok(()),
        }
    }

    async fn ready_registration(&self) -> Result<Box<dyn PushRegistration>, String> {
        let gate = self.gate.borrow_mut().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.registration
            .clone()
            .map(|registration| Box::new(registration) as Box<dyn PushRegistration>)
    }
}

/// Transport that records requests and answers with a canned response.
pub struct RecordingTransport {
    response: Result<SubmissionResponse, TransportError>,
    cookies: String,
    requests: RefCell<Vec<SubmissionRequest>>,
}

impl RecordingTransport {
    pub fn responding(status: u16, body: &str) -> Self {
        Self {
            response: Ok(SubmissionResponse {
                status,
                body: body.to_string(),
            }),
            cookies: String::new(),
            requests: RefCell::default(),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            response: Err(TransportError::Network(reason.to_string())),
            cookies: String::new(),
            requests: RefCell::default(),
        }
    }

    pub fn with_cookie(mut self, cookies: &str) -> Self {
        self.cookies = cookies.to_string();
        self
    }

    pub fn requests(&self) -> Vec<SubmissionRequest> {
        self.requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl SubscriptionTransport for RecordingTransport {
    fn csrf_token(&self) -> Result<Option<String>, CookieError> {
        get_cookie(&self.cookies, "csrftoken")
    }

    async fn post_json(&self, request: SubmissionRequest) -> Result<SubmissionResponse, TransportError> {
        self.requests.borrow_mut().push(request);
        self.response.clone()
    }
}
