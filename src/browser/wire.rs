//! The real browser session: W3C WebDriver over HTTP.

use std::fmt;
use std::time::Duration;

use serde_json::Value;

use super::command::Command;
use super::http::{HttpClientCreateParams, ReqwestClient, WebDriverHttpClient};
use super::{Browser, ElementHandle, SessionTimeouts, ELEMENT_KEY};
use crate::error::{SuiteError, SuiteResult};
use crate::locator::By;

/// A live WebDriver session.
///
/// Created against a running WebDriver server (chromedriver, geckodriver,
/// msedgedriver or a Selenium standalone). The session is *not* closed on
/// drop; [`crate::session::SessionContext`] owns teardown so that close
/// failures can be swallowed deliberately rather than panicking in a
/// destructor.
pub struct WireBrowser {
    conn: Box<dyn WebDriverHttpClient>,
    session_id: String,
}

impl WireBrowser {
    /// Start a new session with the given capabilities.
    pub fn create(
        server_url: &str,
        capabilities: Value,
        timeout: Option<Duration>,
    ) -> SuiteResult<Self> {
        let conn = ReqwestClient::create(HttpClientCreateParams {
            server_url: server_url.to_string(),
            timeout,
        })?;

        let response = conn.execute(Command::NewSession(&capabilities).format_request(""))?;
        let session_id = response["value"]["sessionId"]
            .as_str()
            .ok_or_else(|| {
                SuiteError::Session(format!("no session id in response: {}", response))
            })?
            .to_string();

        log::info!("started webdriver session {}", session_id);

        Ok(WireBrowser {
            conn: Box::new(conn),
            session_id,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn cmd(&self, command: Command<'_>) -> SuiteResult<Value> {
        self.conn.execute(command.format_request(&self.session_id))
    }

    fn string_value(value: &Value) -> SuiteResult<String> {
        value["value"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| SuiteError::Session(format!("expected string value, got {}", value)))
    }

    fn bool_value(value: &Value) -> SuiteResult<bool> {
        value["value"]
            .as_bool()
            .ok_or_else(|| SuiteError::Session(format!("expected bool value, got {}", value)))
    }

    fn element_from(value: &Value) -> SuiteResult<ElementHandle> {
        value[ELEMENT_KEY]
            .as_str()
            .map(ElementHandle::new)
            .ok_or_else(|| SuiteError::Session(format!("no element reference in {}", value)))
    }
}

impl fmt::Debug for WireBrowser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WireBrowser")
            .field("session_id", &self.session_id)
            .finish()
    }
}

impl Browser for WireBrowser {
    fn find(&self, by: &By) -> SuiteResult<ElementHandle> {
        let v = self.cmd(Command::FindElement(by))?;
        Self::element_from(&v["value"])
    }

    fn find_all(&self, by: &By) -> SuiteResult<Vec<ElementHandle>> {
        let v = self.cmd(Command::FindElements(by))?;
        let values = v["value"]
            .as_array()
            .ok_or_else(|| SuiteError::Session(format!("expected element array, got {}", v)))?;
        values.iter().map(Self::element_from).collect()
    }

    fn is_displayed(&self, element: &ElementHandle) -> SuiteResult<bool> {
        let v = self.cmd(Command::IsElementDisplayed(element))?;
        Self::bool_value(&v)
    }

    fn is_enabled(&self, element: &ElementHandle) -> SuiteResult<bool> {
        let v = self.cmd(Command::IsElementEnabled(element))?;
        Self::bool_value(&v)
    }

    fn attribute(&self, element: &ElementHandle, name: &str) -> SuiteResult<Option<String>> {
        let v = self.cmd(Command::GetElementAttribute(element, name))?;
        Ok(v["value"].as_str().map(str::to_string))
    }

    fn click(&self, element: &ElementHandle) -> SuiteResult<()> {
        self.cmd(Command::ElementClick(element))?;
        Ok(())
    }

    fn clear(&self, element: &ElementHandle) -> SuiteResult<()> {
        self.cmd(Command::ElementClear(element))?;
        Ok(())
    }

    fn send_keys(&self, element: &ElementHandle, text: &str) -> SuiteResult<()> {
        self.cmd(Command::ElementSendKeys(element, text))?;
        Ok(())
    }

    fn text(&self, element: &ElementHandle) -> SuiteResult<String> {
        let v = self.cmd(Command::GetElementText(element))?;
        Self::string_value(&v)
    }

    fn execute(&self, script: &str, args: Vec<Value>) -> SuiteResult<Value> {
        let v = self.cmd(Command::ExecuteScript(script, &args))?;
        Ok(v["value"].clone())
    }

    fn screenshot(&self) -> SuiteResult<Vec<u8>> {
        let v = self.cmd(Command::TakeScreenshot)?;
        let encoded = Self::string_value(&v)?;
        Ok(base64::decode(encoded)?)
    }

    fn goto(&self, url: &str) -> SuiteResult<()> {
        self.cmd(Command::NavigateTo(url))?;
        Ok(())
    }

    fn back(&self) -> SuiteResult<()> {
        self.cmd(Command::Back)?;
        Ok(())
    }

    fn forward(&self) -> SuiteResult<()> {
        self.cmd(Command::Forward)?;
        Ok(())
    }

    fn refresh(&self) -> SuiteResult<()> {
        self.cmd(Command::Refresh)?;
        Ok(())
    }

    fn current_url(&self) -> SuiteResult<String> {
        let v = self.cmd(Command::GetCurrentUrl)?;
        Self::string_value(&v)
    }

    fn maximize_window(&self) -> SuiteResult<()> {
        self.cmd(Command::MaximizeWindow)?;
        Ok(())
    }

    fn delete_all_cookies(&self) -> SuiteResult<()> {
        self.cmd(Command::DeleteAllCookies)?;
        Ok(())
    }

    fn set_timeouts(&self, timeouts: SessionTimeouts) -> SuiteResult<()> {
        self.cmd(Command::SetTimeouts(timeouts))?;
        Ok(())
    }

    fn set_implicit_wait(&self, wait: Duration) -> SuiteResult<()> {
        self.cmd(Command::SetImplicitWait(wait))?;
        Ok(())
    }

    fn quit(&self) -> SuiteResult<()> {
        self.cmd(Command::DeleteSession)?;
        Ok(())
    }
}
