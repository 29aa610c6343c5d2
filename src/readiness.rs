//! Page readiness detection.
//!
//! A page counts as actionable when the document has finished loading and,
//! where the page exposes a jQuery request counter, no requests are in
//! flight. Pages without jQuery are simply treated as idle; so is any page
//! where the probe itself blows up. Readiness waits are best-effort by
//! contract: expiry is logged and swallowed because a partially rendered
//! page is often still usable.

use std::time::Duration;

use crate::browser::Browser;
use crate::wait::Wait;

const READY_STATE_SCRIPT: &str = "return document.readyState;";
const JQUERY_IDLE_SCRIPT: &str = "return jQuery.active == 0;";

/// Is the page actionable right now?
pub fn page_ready(browser: &dyn Browser) -> bool {
    let complete = browser
        .execute(READY_STATE_SCRIPT, Vec::new())
        .ok()
        .and_then(|v| v.as_str().map(|state| state == "complete"))
        .unwrap_or(false);
    if !complete {
        return false;
    }

    match browser.execute(JQUERY_IDLE_SCRIPT, Vec::new()) {
        Ok(idle) => idle.as_bool().unwrap_or(true),
        // jQuery not present, or the probe failed: degrade to ready-state alone.
        Err(_) => true,
    }
}

/// Block until the page is ready or the timeout elapses. Timeout is
/// non-fatal; the caller proceeds either way.
pub fn wait_for_ready(browser: &dyn Browser, timeout: Duration) {
    let settled = Wait::with_timeout(browser, timeout).until_true(page_ready);
    if !settled {
        log::debug!("page not fully loaded after {:?}; continuing anyway", timeout);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{FakeBrowser, JQueryProbe};

    #[test]
    fn complete_and_idle_is_ready() {
        let fake = FakeBrowser::new();
        fake.set_ready_state("complete");
        fake.set_jquery(JQueryProbe::Idle);
        assert!(page_ready(&fake));
    }

    #[test]
    fn loading_document_is_not_ready() {
        let fake = FakeBrowser::new();
        fake.set_ready_state("loading");
        assert!(!page_ready(&fake));
    }

    #[test]
    fn inflight_requests_hold_readiness_back() {
        let fake = FakeBrowser::new();
        fake.set_ready_state("complete");
        fake.set_jquery(JQueryProbe::Active);
        assert!(!page_ready(&fake));
    }

    #[test]
    fn missing_jquery_degrades_to_ready_state_alone() {
        let fake = FakeBrowser::new();
        fake.set_ready_state("complete");
        fake.set_jquery(JQueryProbe::Missing);
        assert!(page_ready(&fake));
    }

    #[test]
    fn wait_for_ready_swallows_the_timeout() {
        let fake = FakeBrowser::new();
        fake.set_ready_state("loading");
        // Must return, not panic or error.
        wait_for_ready(&fake, Duration::from_millis(30));
    }
}
