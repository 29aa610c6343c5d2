//! Browser UI test suite for the Bright Horizons website.
//!
//! The suite drives a real browser over the W3C WebDriver wire protocol
//! and runs its scenarios through Cucumber feature files. Dynamic pages
//! render on their own schedule, so everything is built around a
//! synchronization-and-fallback core:
//!
//! - bounded condition polling with a single scroll-into-view recovery
//!   ([`wait`], [`poller`]),
//! - page readiness detection over `document.readyState` and an optional
//!   jQuery in-flight counter ([`readiness`]),
//! - escalating action execution: native interaction, then DOM-script
//!   interaction, each tier independently bounded ([`actions`]),
//! - a per-scenario session context with lazy creation and guaranteed
//!   teardown ([`session`]).
//!
//! Waits and reads degrade to explicit absent/empty values instead of
//! raising; only assertions fail scenarios, and only configuration or
//! session startup problems abort a run.
//!
//! ## Running
//!
//! Point `suite.toml` at a running WebDriver server and execute the
//! `suite` binary:
//!
//! ```text
//! chromedriver --port=4444 &
//! cargo run --bin suite
//! ```
//!
//! A console summary plus JSON and HTML reports land in
//! `target/suite-reports/`. Tests run without any browser: the engine is
//! exercised against the scripted session in [`testkit`].

#![forbid(unsafe_code)]

pub mod actions;
pub mod browser;
pub mod config;
pub mod error;
pub mod locator;
pub mod pages;
pub mod poller;
pub mod readiness;
pub mod report;
pub mod session;
pub mod testkit;
pub mod wait;

pub use browser::{Browser, ElementHandle};
pub use config::{BrowserKind, Config};
pub use error::{SuiteError, SuiteResult};
pub use locator::By;

pub mod prelude {
    pub use crate::actions::{ActionOutcome, Actions, Performed};
    pub use crate::browser::{Browser, ElementHandle, SessionTimeouts};
    pub use crate::config::{BrowserKind, Config};
    pub use crate::error::{SuiteError, SuiteResult, WireErrorKind};
    pub use crate::locator::By;
    pub use crate::pages::{HomePage, SearchResultsPage};
    pub use crate::readiness::{page_ready, wait_for_ready};
    pub use crate::report::{RunReport, ScenarioRecord};
    pub use crate::session::{ImplicitWaitGuard, SessionContext};
    pub use crate::wait::{Located, Target, Wait};
}
