//! Escalating action execution.
//!
//! Browser UIs are non-deterministic in render timing and overlay
//! behaviour, so every logical user action owns an ordered ladder of
//! strategies rather than one global retry wrapper: native interaction
//! first, then DOM-script interaction, each tier with its own bounded
//! sub-timeout. The first success short-circuits; total failure is a
//! logged no-op (or an empty string for reads) and never escapes this
//! boundary. The narration along the way is diagnostic only.

use serde_json::Value;
use std::time::Duration;

use crate::browser::Browser;
use crate::error::SuiteResult;
use crate::readiness::wait_for_ready;
use crate::session::ImplicitWaitGuard;
use crate::wait::{require_found, Target, Wait, DEFAULT_WAIT, FIELD_WAIT, SHORT_WAIT};
use crate::locator::By;

const CLICK_SCRIPT: &str = "arguments[0].click();";
const VALUE_ASSIGN_SCRIPT: &str = "arguments[0].value = arguments[1];";
const TEXT_CONTENT_SCRIPT: &str = "return arguments[0].textContent;";
const SCROLL_BOTTOM_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// Which rung of the ladder carried the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Performed {
    Native,
    AlternateLocator,
    Scripted,
}

/// Outcome of an escalated action. `Skipped` means every tier failed and
/// the action was deliberately a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Done(Performed),
    Skipped,
}

impl ActionOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, ActionOutcome::Done(_))
    }
}

/// Executes single user actions against the browser with fallback tiers.
///
/// Page objects hold one of these by composition; it carries the default
/// implicit wait so typing can suppress and restore it. Every tier has its
/// own bounded sub-timeout, so the worst case per action is the sum of the
/// tier timeouts, never an unbounded retry.
pub struct Actions<'a> {
    browser: &'a dyn Browser,
    implicit_wait: Duration,
    action_timeout: Duration,
    field_timeout: Duration,
    retry_timeout: Duration,
}

impl<'a> Actions<'a> {
    pub fn new(browser: &'a dyn Browser, implicit_wait: Duration) -> Self {
        Self {
            browser,
            implicit_wait,
            action_timeout: DEFAULT_WAIT,
            field_timeout: FIELD_WAIT,
            retry_timeout: SHORT_WAIT,
        }
    }

    /// Override the per-tier wait budgets.
    pub fn timeouts(mut self, action: Duration, field: Duration, retry: Duration) -> Self {
        self.action_timeout = action;
        self.field_timeout = field;
        self.retry_timeout = retry;
        self
    }

    pub fn browser(&self) -> &'a dyn Browser {
        self.browser
    }

    /// Click the target: wait-until-clickable then native click; on an
    /// intercepted click fall straight to a script click; on any other
    /// failure, one short re-wait then a script click.
    pub fn click(&self, target: &Target) -> ActionOutcome {
        match self.native_click(target) {
            Ok(()) => return ActionOutcome::Done(Performed::Native),
            Err(e) if e.is_click_intercepted() => {
                log::warn!("click on {} intercepted; trying script click", target);
            }
            Err(e) => {
                log::warn!("click on {} failed ({}); retrying after a short wait", target, e);
                let _ = Wait::with_timeout(self.browser, self.retry_timeout).until_clickable(target);
            }
        }

        match self.script_click(target) {
            Ok(()) => ActionOutcome::Done(Performed::Scripted),
            Err(e) => {
                log::error!("failed to click {}: {}", target, e);
                ActionOutcome::Skipped
            }
        }
    }

    /// Enter text: wait-until-visible, clear and type; then the alternate
    /// locator if one is given; then direct script assignment.
    pub fn enter_text(&self, target: &Target, alternate: Option<&By>, text: &str) -> ActionOutcome {
        match self.type_into(target, text) {
            Ok(()) => return ActionOutcome::Done(Performed::Native),
            Err(e) => log::warn!("typing into {} failed: {}", target, e),
        }

        if let Some(by) = alternate {
            match self.retype(by, text) {
                Ok(()) => return ActionOutcome::Done(Performed::AlternateLocator),
                Err(e) => log::warn!("typing into alternate {} failed: {}", by, e),
            }
        }

        let script_target = alternate
            .map(|by| Target::Locator(by.clone()))
            .unwrap_or_else(|| target.clone());
        match self.force_value(&script_target, text) {
            Ok(()) => ActionOutcome::Done(Performed::Scripted),
            Err(e) => {
                log::error!("failed to enter text into {}: {}", target, e);
                ActionOutcome::Skipped
            }
        }
    }

    /// Read displayed text, falling back to the DOM `textContent`. Never
    /// absent: total failure yields an empty string.
    pub fn read_text(&self, target: &Target) -> String {
        match self.native_text(target) {
            Ok(text) => return text,
            Err(e) => log::warn!("reading text from {} failed ({}); trying script", target, e),
        }

        match self.script_text(target) {
            Ok(text) => text,
            Err(e) => {
                log::error!("failed to read text from {}: {}", target, e);
                String::new()
            }
        }
    }

    /// Assign a field value via script, bypassing the keyboard.
    pub fn force_value(&self, target: &Target, text: &str) -> SuiteResult<()> {
        let handle = target.resolve(self.browser)?;
        self.browser.execute(
            VALUE_ASSIGN_SCRIPT,
            vec![handle.to_script_arg(), Value::String(text.to_string())],
        )?;
        Ok(())
    }

    /// Scroll to the bottom of the page and give it a moment to settle.
    pub fn scroll_to_bottom(&self) {
        if let Err(e) = self.browser.execute(SCROLL_BOTTOM_SCRIPT, Vec::new()) {
            log::warn!("failed to scroll to page bottom: {}", e);
            return;
        }
        wait_for_ready(self.browser, Duration::from_secs(2));
    }

    fn native_click(&self, target: &Target) -> SuiteResult<()> {
        let handle = require_found(
            Wait::with_timeout(self.browser, self.action_timeout).until_clickable(target),
            target,
        )?;
        self.browser.click(&handle)
    }

    fn script_click(&self, target: &Target) -> SuiteResult<()> {
        let handle = target.resolve(self.browser)?;
        self.browser
            .execute(CLICK_SCRIPT, vec![handle.to_script_arg()])?;
        Ok(())
    }

    fn type_into(&self, target: &Target, text: &str) -> SuiteResult<()> {
        let handle = require_found(
            Wait::with_timeout(self.browser, self.field_timeout).until_visible(target),
            target,
        )?;
        self.browser.clear(&handle)?;

        // Keystroke pacing: the implicit wait is suppressed for the whole
        // character loop and restored by the guard, even on failure.
        let _pacing = ImplicitWaitGuard::suppress(self.browser, self.implicit_wait);
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            self.browser.send_keys(&handle, ch.encode_utf8(&mut buf))?;
        }
        Ok(())
    }

    fn retype(&self, by: &By, text: &str) -> SuiteResult<()> {
        let target = Target::Locator(by.clone());
        let handle = require_found(
            Wait::with_timeout(self.browser, self.field_timeout).until_visible(&target),
            &target,
        )?;
        self.browser.clear(&handle)?;
        self.browser.send_keys(&handle, text)
    }

    fn native_text(&self, target: &Target) -> SuiteResult<String> {
        let handle = require_found(
            Wait::with_timeout(self.browser, self.action_timeout).until_visible(target),
            target,
        )?;
        self.browser.text(&handle)
    }

    fn script_text(&self, target: &Target) -> SuiteResult<String> {
        let handle = target.resolve(self.browser)?;
        let value = self
            .browser
            .execute(TEXT_CONTENT_SCRIPT, vec![handle.to_script_arg()])?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WireErrorKind;
    use crate::testkit::{FakeBrowser, FakeElement};

    fn button() -> By {
        By::css("#go")
    }

    fn input() -> By {
        By::css("#search-field")
    }

    fn short_actions(fake: &FakeBrowser) -> Actions<'_> {
        Actions::new(fake, Duration::from_secs(5)).timeouts(
            Duration::from_millis(50),
            Duration::from_millis(50),
            Duration::from_millis(20),
        )
    }

    #[test]
    fn click_prefers_the_native_path() {
        let fake = FakeBrowser::new();
        fake.insert(button(), FakeElement::visible());
        let outcome = short_actions(&fake).click(&button().into());
        assert_eq!(outcome, ActionOutcome::Done(Performed::Native));
        assert!(fake.events().contains(&"click #go".to_string()));
    }

    #[test]
    fn intercepted_click_escalates_to_script() {
        let fake = FakeBrowser::new();
        fake.insert(button(), FakeElement::visible());
        fake.fail_clicks(WireErrorKind::ElementClickIntercepted);

        let outcome = short_actions(&fake).click(&button().into());
        assert_eq!(outcome, ActionOutcome::Done(Performed::Scripted));
        assert!(fake.events().contains(&"script-click #go".to_string()));
    }

    #[test]
    fn stale_click_rewaits_then_scripts() {
        let fake = FakeBrowser::new();
        fake.insert(button(), FakeElement::visible());
        fake.fail_clicks(WireErrorKind::StaleElementReference);

        let outcome = short_actions(&fake).click(&button().into());
        assert_eq!(outcome, ActionOutcome::Done(Performed::Scripted));
    }

    #[test]
    fn click_on_nothing_is_a_silent_noop() {
        let fake = FakeBrowser::new();
        // No element registered at all: every tier fails.
        let outcome = short_actions(&fake).click(&Target::Locator(By::css("#missing")));
        assert_eq!(outcome, ActionOutcome::Skipped);
    }

    #[test]
    fn typing_lands_character_by_character() {
        let fake = FakeBrowser::new();
        fake.insert(input(), FakeElement::visible());
        let outcome = short_actions(&fake).enter_text(&input().into(), None, "benefits");
        assert_eq!(outcome, ActionOutcome::Done(Performed::Native));
        assert_eq!(fake.value_of(&input()), "benefits");
        // One send-keys call per character.
        assert_eq!(fake.send_keys_count(), "benefits".chars().count());
    }

    #[test]
    fn typing_restores_the_implicit_wait_on_success_and_failure() {
        let fake = FakeBrowser::new();
        fake.insert(input(), FakeElement::visible());
        let actions = short_actions(&fake);

        actions.enter_text(&input().into(), None, "ok");
        assert_eq!(fake.implicit_waits().last(), Some(&Duration::from_secs(5)));

        fake.fail_send_keys();
        actions.enter_text(&input().into(), None, "broken");
        assert_eq!(fake.implicit_waits().last(), Some(&Duration::from_secs(5)));
    }

    #[test]
    fn alternate_locator_is_the_second_tier() {
        let fake = FakeBrowser::new();
        let alt = By::css("input[type='search']");
        fake.insert(alt.clone(), FakeElement::visible());

        // Primary locator matches nothing, so tier two takes over.
        let outcome = short_actions(&fake).enter_text(&input().into(), Some(&alt), "benefits");
        assert_eq!(outcome, ActionOutcome::Done(Performed::AlternateLocator));
        assert_eq!(fake.value_of(&alt), "benefits");
    }

    #[test]
    fn script_assignment_is_the_last_typing_tier() {
        let fake = FakeBrowser::new();
        fake.insert(input(), FakeElement::visible());
        fake.fail_send_keys();

        let outcome = short_actions(&fake).enter_text(&input().into(), None, "benefits");
        assert_eq!(outcome, ActionOutcome::Done(Performed::Scripted));
        assert_eq!(fake.value_of(&input()), "benefits");
    }

    #[test]
    fn read_text_falls_back_to_text_content() {
        let fake = FakeBrowser::new();
        fake.insert(button(), FakeElement::visible().with_text("Employee Education"));
        fake.fail_native_text();

        let text = short_actions(&fake).read_text(&button().into());
        assert_eq!(text, "Employee Education");
    }

    #[test]
    fn read_text_is_empty_on_total_failure() {
        let fake = FakeBrowser::new();
        let text = short_actions(&fake).read_text(&Target::Locator(By::css("#gone")));
        assert_eq!(text, "");
    }
}
