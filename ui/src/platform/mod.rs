//! Platform Detection and Install Support Policy
//!
//! - **signals**: environment snapshot and the `EnvironmentSource` host seam
//! - **detector**: ordered rule tables mapping signals to OS and browser
//! - **policy**: decision table mapping OS and browser to an install verdict

pub mod detector;
pub mod policy;
pub mod signals;

pub use detector::{detect, Browser, Detection, OperatingSystem, PlatformIdentity};
pub use policy::{evaluate, SupportStatus, SupportVerdict};
pub use signals::{EnvironmentSignals, EnvironmentSource, StaticEnvironment};
