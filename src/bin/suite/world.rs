//! Shared scenario state for the Cucumber runner.

use cucumber::World;

use horizons_e2e::prelude::*;
use horizons_e2e::report::RunReport;

/// One world per scenario: the session context plus the scenario's report
/// record. Teardown happens on drop, after the record (and any failure
/// screenshot attached at assertion time) has been captured.
#[derive(Debug, Default, World)]
pub struct SuiteWorld {
    pub ctx: Option<SessionContext>,
    pub record: ScenarioRecord,
}

impl SuiteWorld {
    /// Create the session context on first use. Configuration problems are
    /// fatal: no useful work is possible without one.
    pub fn ensure_session(&mut self) {
        if self.ctx.is_none() {
            let config = match Config::load() {
                Ok(config) => config,
                Err(e) => panic!("cannot load configuration: {}", e),
            };
            self.ctx = Some(SessionContext::new(config));
        }
    }

    /// Borrow the live browser and the scenario record together.
    ///
    /// Session startup failures are fatal to the scenario by design.
    pub fn browser_and_record(&mut self) -> (&dyn Browser, &mut ScenarioRecord) {
        let ctx = self.ctx.as_mut().expect("ensure_session not called");
        let browser = match ctx.browser() {
            Ok(browser) => browser,
            Err(e) => panic!("cannot start browser session: {}", e),
        };
        (browser, &mut self.record)
    }

    pub fn implicit_wait(&self) -> std::time::Duration {
        self.ctx
            .as_ref()
            .map(|ctx| ctx.config().implicit_wait())
            .unwrap_or_else(|| Config::default().implicit_wait())
    }
}

impl Drop for SuiteWorld {
    fn drop(&mut self) {
        let record = std::mem::take(&mut self.record);
        if !record.name.is_empty() || !record.logs.is_empty() {
            RunReport::record(record);
        }
        if let Some(ctx) = self.ctx.as_mut() {
            // Teardown talks to the WebDriver server; when dropped inside
            // the runtime, hop off the async worker first.
            if tokio::runtime::Handle::try_current().is_ok() {
                tokio::task::block_in_place(|| ctx.teardown());
            } else {
                ctx.teardown();
            }
        }
    }
}

/// Screenshot into the scenario report; failures to capture are logged and
/// otherwise ignored.
pub fn attach_screenshot(browser: &dyn Browser, record: &mut ScenarioRecord, name: &str) {
    match browser.screenshot() {
        Ok(bytes) => record.attach(name, "image/png", bytes),
        Err(e) => log::debug!("could not capture screenshot: {}", e),
    }
}

/// Assert a scenario expectation. On failure the screenshot is attached
/// and the record marked failed before the step panics, so the evidence is
/// in the report ahead of teardown.
pub fn verify(browser: &dyn Browser, record: &mut ScenarioRecord, ok: bool, message: &str) {
    if ok {
        return;
    }
    record.fail();
    attach_screenshot(browser, record, "Screenshot of failure");
    panic!("{}", message);
}
