//! The browser capability layer.
//!
//! Everything above this module talks to the browser through the [`Browser`]
//! trait. The real implementation ([`wire::WireBrowser`]) speaks the W3C
//! WebDriver wire protocol over HTTP; tests substitute the scripted
//! implementation in [`crate::testkit`].

pub mod capabilities;
pub mod command;
pub mod http;
pub mod wire;

use std::fmt;
use std::time::Duration;

use serde_json::{json, Value};

use crate::error::SuiteResult;
use crate::locator::By;

/// Key under which the W3C protocol nests an element id, both in command
/// responses and in script arguments.
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// A live reference to a DOM node.
///
/// Valid only for the lifetime of the current document; it may go stale
/// after navigation or a re-render, which surfaces as a
/// `stale element reference` wire error on the next use. Nothing in the
/// suite holds one across a navigation boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementHandle(String);

impl ElementHandle {
    pub fn new(id: impl Into<String>) -> Self {
        ElementHandle(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }

    /// Serialize for use as a script argument.
    pub fn to_script_arg(&self) -> Value {
        json!({ ELEMENT_KEY: self.0 })
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element:{}", self.0)
    }
}

/// Timeouts applied to a session as a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTimeouts {
    pub implicit: Duration,
    pub page_load: Duration,
    pub script: Duration,
}

/// The capability set the suite needs from a browser session.
///
/// Mirrors what the wire protocol offers: element lookup, state queries,
/// interaction, script execution, screenshots, and session management. All
/// methods are blocking; a session is owned by the scenario that created it
/// and never shared across threads.
pub trait Browser: fmt::Debug + Send {
    fn find(&self, by: &By) -> SuiteResult<ElementHandle>;
    fn find_all(&self, by: &By) -> SuiteResult<Vec<ElementHandle>>;

    fn is_displayed(&self, element: &ElementHandle) -> SuiteResult<bool>;
    fn is_enabled(&self, element: &ElementHandle) -> SuiteResult<bool>;
    fn attribute(&self, element: &ElementHandle, name: &str) -> SuiteResult<Option<String>>;

    fn click(&self, element: &ElementHandle) -> SuiteResult<()>;
    fn clear(&self, element: &ElementHandle) -> SuiteResult<()>;
    fn send_keys(&self, element: &ElementHandle, text: &str) -> SuiteResult<()>;
    fn text(&self, element: &ElementHandle) -> SuiteResult<String>;

    /// Execute a script synchronously and return its value.
    fn execute(&self, script: &str, args: Vec<Value>) -> SuiteResult<Value>;

    /// Capture the viewport as PNG bytes.
    fn screenshot(&self) -> SuiteResult<Vec<u8>>;

    fn goto(&self, url: &str) -> SuiteResult<()>;
    fn back(&self) -> SuiteResult<()>;
    fn forward(&self) -> SuiteResult<()>;
    fn refresh(&self) -> SuiteResult<()>;
    fn current_url(&self) -> SuiteResult<String>;

    fn maximize_window(&self) -> SuiteResult<()>;
    fn delete_all_cookies(&self) -> SuiteResult<()>;
    fn set_timeouts(&self, timeouts: SessionTimeouts) -> SuiteResult<()>;
    fn set_implicit_wait(&self, wait: Duration) -> SuiteResult<()>;

    /// End the session. Further calls on this handle are invalid.
    fn quit(&self) -> SuiteResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_handle_serializes_with_the_w3c_key() {
        let handle = ElementHandle::new("abc-123");
        assert_eq!(
            handle.to_script_arg(),
            json!({ "element-6066-11e4-a52e-4f735466cecf": "abc-123" })
        );
    }
}
