//! Explicit element waits with a single scroll-into-view recovery.
//!
//! A wait polls live browser state on the cadence from [`crate::poller`]
//! until the condition holds or the timeout elapses. Timeouts are not
//! errors here: the outcome is an explicit [`Located::Absent`] (or an empty
//! set, or `false`) and the caller decides what that means. Errors raised
//! while evaluating a condition count as "not yet" and never abort the
//! poll.
//!
//! When a full first poll comes up empty, the wait makes one recovery
//! attempt: scroll the target into view, then poll once more with the same
//! timeout. The recovery never repeats, so the worst case per call is two
//! timeout windows.

use std::fmt;
use std::time::Duration;

use crate::browser::{Browser, ElementHandle};
use crate::error::{SuiteError, SuiteResult};
use crate::locator::By;
use crate::poller::{PollCadence, PollTicker};

pub const DEFAULT_WAIT: Duration = Duration::from_secs(20);
pub const SHORT_WAIT: Duration = Duration::from_secs(1);
/// Wait used for input fields in the typing ladder.
pub const FIELD_WAIT: Duration = Duration::from_secs(10);

const SCROLL_INTO_VIEW_SCRIPT: &str = "arguments[0].scrollIntoView(true);";
const SCROLL_MID_PAGE_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight / 2);";

/// The basis a wait polls against: locate fresh each round, or track an
/// element that is already in hand.
#[derive(Debug, Clone)]
pub enum Target {
    Locator(By),
    Handle(ElementHandle),
}

impl Target {
    pub(crate) fn resolve(&self, browser: &dyn Browser) -> SuiteResult<ElementHandle> {
        match self {
            Target::Locator(by) => browser.find(by),
            Target::Handle(handle) => Ok(handle.clone()),
        }
    }
}

impl From<By> for Target {
    fn from(by: By) -> Self {
        Target::Locator(by)
    }
}

impl From<ElementHandle> for Target {
    fn from(handle: ElementHandle) -> Self {
        Target::Handle(handle)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Locator(by) => write!(f, "{}", by),
            Target::Handle(handle) => write!(f, "{}", handle),
        }
    }
}

/// Outcome of an element wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Located {
    Found(ElementHandle),
    Absent,
}

impl Located {
    pub fn found(self) -> Option<ElementHandle> {
        match self {
            Located::Found(handle) => Some(handle),
            Located::Absent => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Located::Found(_))
    }
}

pub struct Wait<'a> {
    browser: &'a dyn Browser,
    timeout: Duration,
}

impl<'a> Wait<'a> {
    pub fn new(browser: &'a dyn Browser) -> Self {
        Self {
            browser,
            timeout: DEFAULT_WAIT,
        }
    }

    pub fn with_timeout(browser: &'a dyn Browser, timeout: Duration) -> Self {
        Self { browser, timeout }
    }

    /// Wait for the target to be displayed.
    pub fn until_visible(&self, target: &Target) -> Located {
        self.poll_element(target, |browser, el| browser.is_displayed(el))
    }

    /// Wait for the target to be displayed and enabled. Whether something
    /// else obscures it is left to the driver's native click semantics.
    pub fn until_clickable(&self, target: &Target) -> Located {
        self.poll_element(target, |browser, el| {
            Ok(browser.is_displayed(el)? && browser.is_enabled(el)?)
        })
    }

    /// Wait for every element matching the locator to be displayed.
    ///
    /// Recovery scrolls to mid-page rather than to a single element, since
    /// the set may span the viewport. If even the recovery poll times out,
    /// whatever currently matches is returned without the visibility check.
    pub fn until_all_visible(&self, by: &By) -> Vec<ElementHandle> {
        if let Some(handles) = self.poll_all(by) {
            return handles;
        }

        log::debug!("elements {} not all visible; scrolling and re-polling", by);
        if self
            .browser
            .execute(SCROLL_MID_PAGE_SCRIPT, Vec::new())
            .is_err()
        {
            return Vec::new();
        }
        if let Some(handles) = self.poll_all(by) {
            return handles;
        }

        // Last resort: take what matches right now, visible or not.
        self.browser.find_all(by).unwrap_or_default()
    }

    /// Poll an arbitrary condition over browser state. Returns false on
    /// timeout; no scroll recovery, since there is nothing to scroll to.
    pub fn until_true<F>(&self, condition: F) -> bool
    where
        F: Fn(&dyn Browser) -> bool,
    {
        let mut ticker = PollTicker::new(PollCadence::timeout(self.timeout));
        loop {
            if condition(self.browser) {
                return true;
            }
            if !ticker.tick() {
                return false;
            }
        }
    }

    fn poll_element<P>(&self, target: &Target, predicate: P) -> Located
    where
        P: Fn(&dyn Browser, &ElementHandle) -> SuiteResult<bool>,
    {
        if let Some(handle) = self.poll_once(target, &predicate) {
            return Located::Found(handle);
        }

        // One recovery: bring the target into view, then a second full poll.
        log::debug!("{} not ready in {:?}; scrolling into view and re-polling", target, self.timeout);
        if self.scroll_to(target).is_err() {
            return Located::Absent;
        }
        match self.poll_once(target, &predicate) {
            Some(handle) => Located::Found(handle),
            None => Located::Absent,
        }
    }

    fn poll_once<P>(&self, target: &Target, predicate: &P) -> Option<ElementHandle>
    where
        P: Fn(&dyn Browser, &ElementHandle) -> SuiteResult<bool>,
    {
        let mut ticker = PollTicker::new(PollCadence::timeout(self.timeout));
        loop {
            if let Ok(handle) = target.resolve(self.browser) {
                if predicate(self.browser, &handle).unwrap_or(false) {
                    return Some(handle);
                }
            }
            if !ticker.tick() {
                return None;
            }
        }
    }

    fn poll_all(&self, by: &By) -> Option<Vec<ElementHandle>> {
        let mut ticker = PollTicker::new(PollCadence::timeout(self.timeout));
        loop {
            if let Ok(handles) = self.browser.find_all(by) {
                if !handles.is_empty() && self.all_displayed(&handles) {
                    return Some(handles);
                }
            }
            if !ticker.tick() {
                return None;
            }
        }
    }

    fn all_displayed(&self, handles: &[ElementHandle]) -> bool {
        handles
            .iter()
            .all(|h| self.browser.is_displayed(h).unwrap_or(false))
    }

    fn scroll_to(&self, target: &Target) -> SuiteResult<()> {
        let handle = target.resolve(self.browser)?;
        self.browser
            .execute(SCROLL_INTO_VIEW_SCRIPT, vec![handle.to_script_arg()])?;
        Ok(())
    }
}

/// Convenience for ladders that need "the element, or a timeout error".
pub(crate) fn require_found(located: Located, target: &Target) -> SuiteResult<ElementHandle> {
    located
        .found()
        .ok_or_else(|| SuiteError::timeout(format!("{} did not become ready", target)))
}
