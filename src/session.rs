//! Per-scenario browser session lifecycle.
//!
//! One `SessionContext` exists per scenario; the cucumber world owns it and
//! lends the browser to page objects. The session itself is created lazily
//! on first access and torn down exactly once; the slot is always cleared on
//! teardown even when the underlying close call fails, so a later creation
//! on the same context starts clean.

use std::time::Duration;

use crate::browser::{capabilities, wire::WireBrowser, Browser, SessionTimeouts};
use crate::config::Config;
use crate::error::SuiteResult;
use crate::locator::By;
use crate::readiness::wait_for_ready;
use crate::wait::DEFAULT_WAIT;

/// Suppresses the implicit wait for its lifetime and restores the default
/// on drop, including on panic or early return.
pub struct ImplicitWaitGuard<'a> {
    browser: &'a dyn Browser,
    restore: Duration,
}

impl<'a> ImplicitWaitGuard<'a> {
    pub fn suppress(browser: &'a dyn Browser, restore: Duration) -> Self {
        if let Err(e) = browser.set_implicit_wait(Duration::ZERO) {
            log::debug!("failed to suppress implicit wait: {}", e);
        }
        Self { browser, restore }
    }
}

impl Drop for ImplicitWaitGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.browser.set_implicit_wait(self.restore) {
            log::warn!("failed to restore implicit wait: {}", e);
        }
    }
}

/// Holds the (at most one) live browser session of a scenario.
#[derive(Debug)]
pub struct SessionContext {
    config: Config,
    browser: Option<Box<dyn Browser>>,
}

impl SessionContext {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            browser: None,
        }
    }

    /// Build a context around an existing browser. Used by tests to drive
    /// the lifecycle against a scripted session.
    pub fn with_browser(config: Config, browser: Box<dyn Browser>) -> Self {
        Self {
            config,
            browser: Some(browser),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.browser.is_some()
    }

    /// The live browser, created on first access.
    ///
    /// Creation failures are fatal to the scenario: without a session no
    /// useful work is possible.
    pub fn browser(&mut self) -> SuiteResult<&dyn Browser> {
        if self.browser.is_none() {
            self.browser = Some(Self::start_browser(&self.config)?);
        }
        Ok(self.browser.as_deref().expect("session just created"))
    }

    fn start_browser(config: &Config) -> SuiteResult<Box<dyn Browser>> {
        log::info!("starting {} session against {}", config.browser, config.webdriver_url);
        let caps = capabilities::for_kind(config.browser, config);
        let browser = WireBrowser::create(&config.webdriver_url, caps, None)?;

        browser.maximize_window()?;
        browser.set_timeouts(SessionTimeouts {
            implicit: config.implicit_wait(),
            page_load: config.page_load_timeout(),
            script: config.script_timeout(),
        })?;
        browser.delete_all_cookies()?;

        Ok(Box::new(browser))
    }

    /// Navigate to the configured base URL, wait for readiness and dismiss
    /// the cookie-consent overlay if it shows up.
    pub fn open_base(&mut self) -> SuiteResult<()> {
        let url = self.config.base_url.clone();
        let cookie_xpath = self.config.cookie_accept_xpath.clone();

        let browser = self.browser()?;
        browser.goto(&url)?;
        wait_for_ready(browser, DEFAULT_WAIT);

        if !cookie_xpath.is_empty() {
            dismiss_cookie_banner(browser, &By::XPath(cookie_xpath));
        }
        Ok(())
    }

    pub fn open(&mut self, url: &str) -> SuiteResult<()> {
        let browser = self.browser()?;
        browser.goto(url)?;
        wait_for_ready(browser, DEFAULT_WAIT);
        Ok(())
    }

    pub fn back(&mut self) -> SuiteResult<()> {
        let browser = self.browser()?;
        browser.back()?;
        wait_for_ready(browser, DEFAULT_WAIT);
        Ok(())
    }

    pub fn forward(&mut self) -> SuiteResult<()> {
        let browser = self.browser()?;
        browser.forward()?;
        wait_for_ready(browser, DEFAULT_WAIT);
        Ok(())
    }

    pub fn refresh(&mut self) -> SuiteResult<()> {
        let browser = self.browser()?;
        browser.refresh()?;
        wait_for_ready(browser, DEFAULT_WAIT);
        Ok(())
    }

    /// Close the session. Close failures are swallowed; the slot is cleared
    /// regardless so the context can start a fresh session afterwards.
    pub fn teardown(&mut self) {
        if let Some(browser) = self.browser.take() {
            if let Err(e) = browser.quit() {
                log::warn!("failed to close browser session cleanly: {}", e);
            }
        }
    }
}

/// Best-effort: the banner is optional and a failed dismissal never fails
/// the scenario.
fn dismiss_cookie_banner(browser: &dyn Browser, by: &By) {
    let accept = match browser.find(by) {
        Ok(el) => el,
        Err(_) => return,
    };
    if browser.is_displayed(&accept).unwrap_or(false) {
        if let Err(e) = browser.click(&accept) {
            log::debug!("cookie banner click failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{FakeBrowser, FakeElement};

    fn context_with_fake() -> (FakeBrowser, SessionContext) {
        let fake = FakeBrowser::new();
        let ctx = SessionContext::with_browser(Config::default(), Box::new(fake.clone()));
        (fake, ctx)
    }

    #[test]
    fn teardown_clears_the_slot() {
        let (fake, mut ctx) = context_with_fake();
        assert!(ctx.is_active());
        ctx.teardown();
        assert!(!ctx.is_active());
        assert_eq!(fake.quit_count(), 1);
    }

    #[test]
    fn teardown_clears_the_slot_even_when_quit_fails() {
        let (fake, mut ctx) = context_with_fake();
        fake.fail_quit();
        ctx.teardown();
        assert!(!ctx.is_active());
        // A second teardown is a no-op, not a double close.
        ctx.teardown();
        assert_eq!(fake.quit_count(), 1);
    }

    #[test]
    fn navigation_waits_for_readiness() {
        let (fake, mut ctx) = context_with_fake();
        ctx.open("https://www.brighthorizons.com/careers").unwrap();
        ctx.back().unwrap();
        ctx.forward().unwrap();
        ctx.refresh().unwrap();
        let events = fake.events();
        assert!(events.contains(&"goto https://www.brighthorizons.com/careers".to_string()));
        assert!(events.contains(&"back".to_string()));
        assert!(events.contains(&"forward".to_string()));
        assert!(events.contains(&"refresh".to_string()));
    }

    #[test]
    fn open_base_dismisses_a_visible_cookie_banner() {
        let fake = FakeBrowser::new();
        let config = Config::default();
        fake.insert(
            By::XPath(config.cookie_accept_xpath.clone()),
            FakeElement::visible(),
        );
        let mut ctx = SessionContext::with_browser(config, Box::new(fake.clone()));

        ctx.open_base().unwrap();
        assert!(fake
            .events()
            .iter()
            .any(|e| e.starts_with("goto https://www.brighthorizons.com")));
        assert!(fake.events().iter().any(|e| e.starts_with("click ")));
    }

    #[test]
    fn implicit_wait_guard_restores_on_panic() {
        let fake = FakeBrowser::new();
        let default = Duration::from_secs(5);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = ImplicitWaitGuard::suppress(&fake, default);
            panic!("keystroke blew up");
        }));
        assert!(result.is_err());
        assert_eq!(fake.implicit_waits().last(), Some(&default));
    }
}
