//! W3C WebDriver command formatting.
//!
//! Each [`Command`] maps to one endpoint of the wire protocol; `format_request`
//! produces the method, path and JSON body the HTTP layer sends verbatim.

use serde_json::{json, Value};

use super::{ElementHandle, SessionTimeouts};
use crate::locator::By;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
    Delete,
}

#[derive(Debug, Clone)]
pub struct RequestData {
    pub method: RequestMethod,
    pub url: String,
    pub body: Option<Value>,
}

impl RequestData {
    pub fn new(method: RequestMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

#[derive(Debug)]
pub enum Command<'a> {
    NewSession(&'a Value),
    DeleteSession,
    NavigateTo(&'a str),
    GetCurrentUrl,
    Back,
    Forward,
    Refresh,
    FindElement(&'a By),
    FindElements(&'a By),
    ElementClick(&'a ElementHandle),
    ElementClear(&'a ElementHandle),
    ElementSendKeys(&'a ElementHandle, &'a str),
    GetElementText(&'a ElementHandle),
    GetElementAttribute(&'a ElementHandle, &'a str),
    IsElementEnabled(&'a ElementHandle),
    IsElementDisplayed(&'a ElementHandle),
    ExecuteScript(&'a str, &'a [Value]),
    TakeScreenshot,
    DeleteAllCookies,
    MaximizeWindow,
    SetTimeouts(SessionTimeouts),
    SetImplicitWait(Duration),
}

impl Command<'_> {
    pub fn format_request(&self, session_id: &str) -> RequestData {
        match self {
            Command::NewSession(capabilities) => RequestData::new(RequestMethod::Post, "/session")
                .with_body(json!({
                    "capabilities": { "alwaysMatch": capabilities }
                })),
            Command::DeleteSession => {
                RequestData::new(RequestMethod::Delete, format!("/session/{}", session_id))
            }
            Command::NavigateTo(url) => {
                RequestData::new(RequestMethod::Post, format!("/session/{}/url", session_id))
                    .with_body(json!({ "url": url }))
            }
            Command::GetCurrentUrl => {
                RequestData::new(RequestMethod::Get, format!("/session/{}/url", session_id))
            }
            Command::Back => {
                RequestData::new(RequestMethod::Post, format!("/session/{}/back", session_id))
                    .with_body(json!({}))
            }
            Command::Forward => {
                RequestData::new(RequestMethod::Post, format!("/session/{}/forward", session_id))
                    .with_body(json!({}))
            }
            Command::Refresh => {
                RequestData::new(RequestMethod::Post, format!("/session/{}/refresh", session_id))
                    .with_body(json!({}))
            }
            Command::FindElement(by) => {
                let (using, value) = by.w3c_selector();
                RequestData::new(RequestMethod::Post, format!("/session/{}/element", session_id))
                    .with_body(json!({ "using": using, "value": value }))
            }
            Command::FindElements(by) => {
                let (using, value) = by.w3c_selector();
                RequestData::new(RequestMethod::Post, format!("/session/{}/elements", session_id))
                    .with_body(json!({ "using": using, "value": value }))
            }
            Command::ElementClick(element) => RequestData::new(
                RequestMethod::Post,
                format!("/session/{}/element/{}/click", session_id, element.id()),
            )
            .with_body(json!({})),
            Command::ElementClear(element) => RequestData::new(
                RequestMethod::Post,
                format!("/session/{}/element/{}/clear", session_id, element.id()),
            )
            .with_body(json!({})),
            Command::ElementSendKeys(element, text) => RequestData::new(
                RequestMethod::Post,
                format!("/session/{}/element/{}/value", session_id, element.id()),
            )
            .with_body(json!({
                "text": text,
                "value": text.chars().map(String::from).collect::<Vec<_>>(),
            })),
            Command::GetElementText(element) => RequestData::new(
                RequestMethod::Get,
                format!("/session/{}/element/{}/text", session_id, element.id()),
            ),
            Command::GetElementAttribute(element, name) => RequestData::new(
                RequestMethod::Get,
                format!(
                    "/session/{}/element/{}/attribute/{}",
                    session_id,
                    element.id(),
                    name
                ),
            ),
            Command::IsElementEnabled(element) => RequestData::new(
                RequestMethod::Get,
                format!("/session/{}/element/{}/enabled", session_id, element.id()),
            ),
            Command::IsElementDisplayed(element) => RequestData::new(
                RequestMethod::Get,
                format!("/session/{}/element/{}/displayed", session_id, element.id()),
            ),
            Command::ExecuteScript(script, args) => RequestData::new(
                RequestMethod::Post,
                format!("/session/{}/execute/sync", session_id),
            )
            .with_body(json!({ "script": script, "args": args })),
            Command::TakeScreenshot => RequestData::new(
                RequestMethod::Get,
                format!("/session/{}/screenshot", session_id),
            ),
            Command::DeleteAllCookies => RequestData::new(
                RequestMethod::Delete,
                format!("/session/{}/cookie", session_id),
            ),
            Command::MaximizeWindow => RequestData::new(
                RequestMethod::Post,
                format!("/session/{}/window/maximize", session_id),
            )
            .with_body(json!({})),
            Command::SetTimeouts(timeouts) => RequestData::new(
                RequestMethod::Post,
                format!("/session/{}/timeouts", session_id),
            )
            .with_body(json!({
                "implicit": timeouts.implicit.as_millis() as u64,
                "pageLoad": timeouts.page_load.as_millis() as u64,
                "script": timeouts.script.as_millis() as u64,
            })),
            Command::SetImplicitWait(wait) => RequestData::new(
                RequestMethod::Post,
                format!("/session/{}/timeouts", session_id),
            )
            .with_body(json!({ "implicit": wait.as_millis() as u64 })),
        }
    }
}
