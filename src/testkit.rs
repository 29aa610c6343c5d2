//! Scripted in-memory browser for tests.
//!
//! `FakeBrowser` implements the full [`Browser`](crate::browser::Browser)
//! capability set against an in-memory element table, with injectable
//! failures for the paths the escalation ladders branch on. It answers the
//! handful of scripts the suite actually executes (ready state, jQuery
//! probe, scrolling, script click, value assignment, textContent) and
//! records every interaction so tests can assert which ladder tier ran.
//!
//! Clones share state, so a test can keep a handle for assertions after
//! boxing one up as a `dyn Browser`.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde_json::{json, Value};

use crate::browser::{Browser, ElementHandle, SessionTimeouts, ELEMENT_KEY};
use crate::error::{SuiteError, SuiteResult, WireErrorKind};
use crate::locator::By;

/// How the fake answers the jQuery in-flight-request probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JQueryProbe {
    /// jQuery present, no requests in flight.
    Idle,
    /// jQuery present, requests in flight.
    Active,
    /// No jQuery on the page; the probe script throws.
    #[default]
    Missing,
}

/// One scripted element.
#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    displayed: bool,
    disabled: bool,
    text: String,
    value: String,
    displayed_after_scroll: bool,
}

impl FakeElement {
    pub fn visible() -> Self {
        FakeElement {
            displayed: true,
            ..Default::default()
        }
    }

    pub fn hidden() -> Self {
        FakeElement::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Becomes displayed once anything scrolls the page.
    pub fn displayed_after_scroll(mut self) -> Self {
        self.displayed_after_scroll = true;
        self
    }
}

#[derive(Debug, Default)]
struct State {
    slots: Vec<(By, FakeElement)>,
    ready_state: String,
    jquery: JQueryProbe,
    scrolled: bool,
    scroll_count: usize,
    events: Vec<String>,
    implicit_waits: Vec<Duration>,
    send_keys_count: usize,
    quit_count: usize,
    click_failure: Option<WireErrorKind>,
    send_keys_failure: bool,
    native_text_failure: bool,
    quit_failure: bool,
    current_url: String,
}

#[derive(Debug, Clone)]
pub struct FakeBrowser {
    state: Arc<Mutex<State>>,
}

impl Default for FakeBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeBrowser {
    pub fn new() -> Self {
        let state = State {
            ready_state: "complete".to_string(),
            ..Default::default()
        };
        FakeBrowser {
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("fake browser state poisoned")
    }

    /// Register an element under the given locator. Repeated inserts under
    /// the same locator stack up and are all returned by `find_all`.
    pub fn insert(&self, by: By, element: FakeElement) {
        self.lock().slots.push((by, element));
    }

    pub fn set_ready_state(&self, state: &str) {
        self.lock().ready_state = state.to_string();
    }

    pub fn set_jquery(&self, probe: JQueryProbe) {
        self.lock().jquery = probe;
    }

    /// Make every native click fail with the given wire error.
    pub fn fail_clicks(&self, kind: WireErrorKind) {
        self.lock().click_failure = Some(kind);
    }

    pub fn fail_send_keys(&self) {
        self.lock().send_keys_failure = true;
    }

    pub fn fail_native_text(&self) {
        self.lock().native_text_failure = true;
    }

    pub fn fail_quit(&self) {
        self.lock().quit_failure = true;
    }

    pub fn events(&self) -> Vec<String> {
        self.lock().events.clone()
    }

    pub fn scroll_count(&self) -> usize {
        self.lock().scroll_count
    }

    pub fn send_keys_count(&self) -> usize {
        self.lock().send_keys_count
    }

    pub fn quit_count(&self) -> usize {
        self.lock().quit_count
    }

    pub fn implicit_waits(&self) -> Vec<Duration> {
        self.lock().implicit_waits.clone()
    }

    /// Current field value of the first element matching the locator.
    pub fn value_of(&self, by: &By) -> String {
        let state = self.lock();
        state
            .slots
            .iter()
            .find(|(slot_by, _)| slot_by == by)
            .map(|(_, el)| el.value.clone())
            .unwrap_or_default()
    }

    fn slot_index(state: &State, handle: &ElementHandle) -> SuiteResult<usize> {
        let index: usize = handle
            .id()
            .strip_prefix("fake-")
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| SuiteError::Session(format!("unknown element {}", handle)))?;
        if index < state.slots.len() {
            Ok(index)
        } else {
            Err(SuiteError::wire("stale element reference", handle.id().to_string()))
        }
    }

    fn handle_from_arg(args: &[Value]) -> SuiteResult<ElementHandle> {
        args.first()
            .and_then(|arg| arg[ELEMENT_KEY].as_str())
            .map(ElementHandle::new)
            .ok_or_else(|| SuiteError::Session("script expected an element argument".to_string()))
    }

    fn label(by: &By) -> String {
        match by {
            By::Css(s) | By::XPath(s) | By::Id(s) | By::Name(s) | By::Tag(s) | By::LinkText(s) => {
                s.clone()
            }
        }
    }
}

impl Browser for FakeBrowser {
    fn find(&self, by: &By) -> SuiteResult<ElementHandle> {
        let state = self.lock();
        state
            .slots
            .iter()
            .position(|(slot_by, _)| slot_by == by)
            .map(|i| ElementHandle::new(format!("fake-{}", i)))
            .ok_or_else(|| SuiteError::wire("no such element", format!("no match for {}", by)))
    }

    fn find_all(&self, by: &By) -> SuiteResult<Vec<ElementHandle>> {
        let state = self.lock();
        Ok(state
            .slots
            .iter()
            .enumerate()
            .filter(|(_, (slot_by, _))| slot_by == by)
            .map(|(i, _)| ElementHandle::new(format!("fake-{}", i)))
            .collect())
    }

    fn is_displayed(&self, element: &ElementHandle) -> SuiteResult<bool> {
        let state = self.lock();
        let index = Self::slot_index(&state, element)?;
        let el = &state.slots[index].1;
        Ok(el.displayed || (el.displayed_after_scroll && state.scrolled))
    }

    fn is_enabled(&self, element: &ElementHandle) -> SuiteResult<bool> {
        let state = self.lock();
        let index = Self::slot_index(&state, element)?;
        Ok(!state.slots[index].1.disabled)
    }

    fn attribute(&self, element: &ElementHandle, name: &str) -> SuiteResult<Option<String>> {
        let state = self.lock();
        let index = Self::slot_index(&state, element)?;
        match name {
            "value" => Ok(Some(state.slots[index].1.value.clone())),
            _ => Ok(None),
        }
    }

    fn click(&self, element: &ElementHandle) -> SuiteResult<()> {
        let mut state = self.lock();
        let index = Self::slot_index(&state, element)?;
        if let Some(kind) = state.click_failure {
            return Err(SuiteError::wire(kind.as_str(), "injected click failure"));
        }
        let label = Self::label(&state.slots[index].0);
        state.events.push(format!("click {}", label));
        Ok(())
    }

    fn clear(&self, element: &ElementHandle) -> SuiteResult<()> {
        let mut state = self.lock();
        let index = Self::slot_index(&state, element)?;
        state.slots[index].1.value.clear();
        let label = Self::label(&state.slots[index].0);
        state.events.push(format!("clear {}", label));
        Ok(())
    }

    fn send_keys(&self, element: &ElementHandle, text: &str) -> SuiteResult<()> {
        let mut state = self.lock();
        let index = Self::slot_index(&state, element)?;
        if state.send_keys_failure {
            return Err(SuiteError::wire(
                "element not interactable",
                "injected send-keys failure",
            ));
        }
        state.slots[index].1.value.push_str(text);
        state.send_keys_count += 1;
        let label = Self::label(&state.slots[index].0);
        state.events.push(format!("keys {} {}", label, text));
        Ok(())
    }

    fn text(&self, element: &ElementHandle) -> SuiteResult<String> {
        let state = self.lock();
        let index = Self::slot_index(&state, element)?;
        if state.native_text_failure {
            return Err(SuiteError::wire(
                "stale element reference",
                "injected text failure",
            ));
        }
        Ok(state.slots[index].1.text.clone())
    }

    fn execute(&self, script: &str, args: Vec<Value>) -> SuiteResult<Value> {
        let mut state = self.lock();

        if script.contains("readyState") {
            return Ok(Value::String(state.ready_state.clone()));
        }
        if script.contains("jQuery.active") {
            return match state.jquery {
                JQueryProbe::Idle => Ok(json!(true)),
                JQueryProbe::Active => Ok(json!(false)),
                JQueryProbe::Missing => {
                    Err(SuiteError::wire("javascript error", "jQuery is not defined"))
                }
            };
        }
        if script.contains("scrollIntoView") {
            state.scrolled = true;
            state.scroll_count += 1;
            return Ok(Value::Null);
        }
        if script.contains("scrollTo") {
            state.scrolled = true;
            return Ok(Value::Null);
        }
        if script.contains(".click()") {
            let handle = Self::handle_from_arg(&args)?;
            let index = Self::slot_index(&state, &handle)?;
            let label = Self::label(&state.slots[index].0);
            state.events.push(format!("script-click {}", label));
            return Ok(Value::Null);
        }
        if script.contains("value = arguments[1]") {
            let handle = Self::handle_from_arg(&args)?;
            let index = Self::slot_index(&state, &handle)?;
            let text = args
                .get(1)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let label = Self::label(&state.slots[index].0);
            state.events.push(format!("script-assign {}", label));
            state.slots[index].1.value = text;
            return Ok(Value::Null);
        }
        if script.contains("textContent") {
            let handle = Self::handle_from_arg(&args)?;
            let index = Self::slot_index(&state, &handle)?;
            return Ok(Value::String(state.slots[index].1.text.clone()));
        }

        Ok(Value::Null)
    }

    fn screenshot(&self) -> SuiteResult<Vec<u8>> {
        Ok(b"fake-screenshot".to_vec())
    }

    fn goto(&self, url: &str) -> SuiteResult<()> {
        let mut state = self.lock();
        state.current_url = url.to_string();
        state.events.push(format!("goto {}", url));
        Ok(())
    }

    fn back(&self) -> SuiteResult<()> {
        self.lock().events.push("back".to_string());
        Ok(())
    }

    fn forward(&self) -> SuiteResult<()> {
        self.lock().events.push("forward".to_string());
        Ok(())
    }

    fn refresh(&self) -> SuiteResult<()> {
        self.lock().events.push("refresh".to_string());
        Ok(())
    }

    fn current_url(&self) -> SuiteResult<String> {
        Ok(self.lock().current_url.clone())
    }

    fn maximize_window(&self) -> SuiteResult<()> {
        self.lock().events.push("maximize".to_string());
        Ok(())
    }

    fn delete_all_cookies(&self) -> SuiteResult<()> {
        self.lock().events.push("clear-cookies".to_string());
        Ok(())
    }

    fn set_timeouts(&self, timeouts: SessionTimeouts) -> SuiteResult<()> {
        let mut state = self.lock();
        state.implicit_waits.push(timeouts.implicit);
        state.events.push("set-timeouts".to_string());
        Ok(())
    }

    fn set_implicit_wait(&self, wait: Duration) -> SuiteResult<()> {
        self.lock().implicit_waits.push(wait);
        Ok(())
    }

    fn quit(&self) -> SuiteResult<()> {
        let mut state = self.lock();
        state.quit_count += 1;
        if state.quit_failure {
            return Err(SuiteError::Session("injected quit failure".to_string()));
        }
        state.events.push("quit".to_string());
        Ok(())
    }
}
