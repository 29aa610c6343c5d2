//! Full-scenario runs against the scripted browser session.
//!
//! These mirror the feature files step for step: open the homepage, open
//! the search box, type the query character by character, submit, compare
//! the first result. One variant is the happy path; the other drives a
//! session where every locator lookup fails, which must end in an empty
//! result string and a false assertion, never a panic out of the engine.

use std::time::Duration;

use horizons_e2e::pages::{result_matches, HomePage, SearchResultsPage};
use horizons_e2e::prelude::*;
use horizons_e2e::testkit::{FakeBrowser, FakeElement};

const EXPECTED_TITLE: &str = "Employee Education in 2018: Strategies to Watch";
const EXPECTED_PREFIX: &str = "Employee Education in 2018";

fn short_actions(fake: &FakeBrowser) -> Actions<'_> {
    Actions::new(fake, Duration::from_secs(5)).timeouts(
        Duration::from_millis(50),
        Duration::from_millis(50),
        Duration::from_millis(20),
    )
}

/// A session where every page element the scenario touches exists.
fn populated_browser() -> FakeBrowser {
    let fake = FakeBrowser::new();
    fake.insert(
        By::XPath(Config::default().cookie_accept_xpath.clone()),
        FakeElement::visible(),
    );
    fake.insert(HomePage::search_icon(), FakeElement::visible());
    fake.insert(HomePage::search_input(), FakeElement::visible());
    fake.insert(HomePage::search_input_fallback(), FakeElement::visible());
    fake.insert(HomePage::submit_button(), FakeElement::visible());
    fake.insert(
        SearchResultsPage::first_result(),
        FakeElement::visible().with_text(EXPECTED_TITLE),
    );
    for title in ["Careers", "Benefits", "Support"] {
        fake.insert(
            HomePage::footer_titles(),
            FakeElement::visible().with_text(title),
        );
    }
    fake
}

#[test]
fn search_scenario_happy_path() {
    let fake = populated_browser();
    let mut ctx = SessionContext::with_browser(Config::default(), Box::new(fake.clone()));

    ctx.open_base().unwrap();

    let implicit_wait = ctx.config().implicit_wait();
    {
        let browser = ctx.browser().unwrap();
        let home = HomePage::new(browser, implicit_wait);

        home.click_search_icon();
        home.search_for("benefits");

        // The query landed in the field, one keystroke per character.
        assert_eq!(fake.value_of(&HomePage::search_input()), "benefits");
        assert_eq!(fake.send_keys_count(), "benefits".chars().count());

        // Keystroke pacing left the implicit wait at its default.
        assert_eq!(fake.implicit_waits().last(), Some(&implicit_wait));

        let results = SearchResultsPage::new(browser, implicit_wait);
        let text = results.first_result_text();
        assert_eq!(text, EXPECTED_TITLE);
        assert!(result_matches(&text, EXPECTED_PREFIX));
    }

    ctx.teardown();
    assert!(!ctx.is_active());
    assert_eq!(fake.quit_count(), 1);
}

#[test]
fn search_scenario_with_a_throwing_driver_fails_the_assertion_only() {
    // Nothing registered: every find, on every tier, errors out.
    let fake = FakeBrowser::new();
    let mut ctx = SessionContext::with_browser(Config::default(), Box::new(fake.clone()));

    ctx.open_base().unwrap();

    {
        let browser = ctx.browser().unwrap();
        let home = HomePage::with_actions(browser, short_actions(&fake));
        home.click_search_icon();
        home.search_for("benefits");

        let results = SearchResultsPage::with_actions(browser, short_actions(&fake));
        let text = results.first_result_text();
        assert_eq!(text, "");
        // The assertion outcome is an ordinary false, not a panic.
        assert!(!result_matches(&text, EXPECTED_PREFIX));
    }

    ctx.teardown();
    assert!(!ctx.is_active());
}

#[test]
fn footer_scenario_validates_the_title_ratio() {
    let fake = populated_browser();
    let mut ctx = SessionContext::with_browser(Config::default(), Box::new(fake.clone()));

    ctx.open_base().unwrap();
    let implicit_wait = ctx.config().implicit_wait();
    let browser = ctx.browser().unwrap();
    let home = HomePage::new(browser, implicit_wait);

    home.scroll_to_footer();
    assert_eq!(
        home.footer_section_titles(),
        vec!["Careers", "Benefits", "Support"]
    );
    assert!(home.footer_titles_valid(3));

    let details = home.footer_title_details();
    assert_eq!(details.len(), 3);
    assert_eq!(
        details[0],
        "section-1 title is \"Careers\" - it has 7 characters"
    );
}

#[test]
fn footer_scenario_fails_when_half_the_titles_are_too_short() {
    let fake = FakeBrowser::new();
    for title in ["Careers", "HR"] {
        fake.insert(
            HomePage::footer_titles(),
            FakeElement::visible().with_text(title),
        );
    }

    let home = HomePage::new(&fake, Duration::from_secs(5));
    // 1 of 2 titles meets the minimum: below the 80% bar.
    assert!(!home.footer_titles_valid(3));
}

#[test]
fn a_fresh_session_can_start_after_a_failed_teardown() {
    let fake = FakeBrowser::new();
    fake.fail_quit();
    let mut ctx = SessionContext::with_browser(Config::default(), Box::new(fake.clone()));

    ctx.teardown();
    assert!(!ctx.is_active());

    // The slot is clear; handing the context a new session works.
    let replacement = FakeBrowser::new();
    let mut ctx = SessionContext::with_browser(Config::default(), Box::new(replacement.clone()));
    ctx.open("https://www.brighthorizons.com").unwrap();
    assert_eq!(
        replacement.events(),
        vec!["goto https://www.brighthorizons.com".to_string()]
    );
}
