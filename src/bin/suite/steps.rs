//! Step definitions for the search and footer scenarios.
//!
//! The engine underneath is blocking by design, so every step body runs
//! inside `task::block_in_place`, which is safe on the multi-threaded
//! runtime the runner starts.

use std::time::Duration;

use cucumber::{given, then, when};
use tokio::task;

use horizons_e2e::prelude::*;

use crate::world::{attach_screenshot, verify, SuiteWorld};

const SEARCH_SCENARIO: &str = "Search from the homepage";
const FOOTER_SCENARIO: &str = "Footer section titles";

#[given("I am on the Bright Horizons homepage")]
async fn on_the_homepage(world: &mut SuiteWorld) {
    task::block_in_place(|| {
        world.ensure_session();
        if world.record.name.is_empty() {
            world.record.name = SEARCH_SCENARIO.to_string();
        }
        let ctx = world.ctx.as_mut().expect("session context exists");
        if let Err(e) = ctx.open_base() {
            panic!("cannot open base url: {}", e);
        }
        world.record.log("Navigated to Bright Horizons homepage");
    });
}

#[when("I scroll to the footer section")]
async fn scroll_to_the_footer(world: &mut SuiteWorld) {
    task::block_in_place(|| {
        world.record.name = FOOTER_SCENARIO.to_string();
        let implicit_wait = world.implicit_wait();
        let (browser, record) = world.browser_and_record();
        let home = HomePage::new(browser, implicit_wait);

        home.scroll_to_footer();
        record.log("Scrolled to footer section");
        attach_screenshot(browser, record, "Footer section");
    });
}

#[then(expr = "each footer section should contain a title with at least {int} characters")]
async fn footer_titles_have_min_length(world: &mut SuiteWorld, min_len: usize) {
    task::block_in_place(|| {
        let implicit_wait = world.implicit_wait();
        let (browser, record) = world.browser_and_record();
        let home = HomePage::new(browser, implicit_wait);

        for detail in home.footer_title_details() {
            record.log(detail);
        }

        let all_valid = home.footer_titles_valid(min_len);
        verify(
            browser,
            record,
            all_valid,
            &format!("Not all footer titles have at least {} characters", min_len),
        );

        record.log(format!(
            "Verified footer section titles have at least {} characters",
            min_len
        ));
        attach_screenshot(browser, record, "Footer section");
    });
}

#[when("I click on the search icon")]
async fn click_the_search_icon(world: &mut SuiteWorld) {
    task::block_in_place(|| {
        let implicit_wait = world.implicit_wait();
        let (browser, record) = world.browser_and_record();
        let home = HomePage::new(browser, implicit_wait);

        home.click_search_icon();
        record.log("Clicked on search icon");
        attach_screenshot(browser, record, "After clicking search icon");

        // Best-effort confirmation that the search box actually opened.
        let input = Wait::with_timeout(browser, Duration::from_secs(10))
            .until_visible(&Target::Locator(HomePage::search_input()));
        if input.is_found() {
            record.log("Search box is visible after clicking search icon");
        } else {
            record.log("Warning: search box may not be visible after clicking search icon");
        }
    });
}

#[when(expr = "I search for {string}")]
async fn search_for(world: &mut SuiteWorld, text: String) {
    task::block_in_place(|| {
        let implicit_wait = world.implicit_wait();
        let (browser, record) = world.browser_and_record();
        let home = HomePage::new(browser, implicit_wait);

        home.search_for(&text);
        record.log(format!("Entered and submitted search: {}", text));
        attach_screenshot(browser, record, "After search");

        wait_for_ready(browser, Duration::from_secs(2));
    });
}

#[then(expr = "the first search result should exactly match {string}")]
async fn first_result_matches(world: &mut SuiteWorld, expected: String) {
    task::block_in_place(|| {
        let implicit_wait = world.implicit_wait();
        let (browser, record) = world.browser_and_record();
        let results = SearchResultsPage::new(browser, implicit_wait);

        attach_screenshot(browser, record, "Search results");
        record.log(results.comparison_report(&expected));

        let matched = results.first_result_matches(&expected);
        verify(
            browser,
            record,
            matched,
            &format!("Search result assertion failed! Expected: '{}'", expected),
        );

        record.log(format!("Verified first search result matches: {}", expected));
        results.scroll_to_footer();
    });
}
