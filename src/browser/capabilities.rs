//! Capability payloads for new-session requests.

use serde_json::{json, Value};

use crate::config::{BrowserKind, Config};

/// Build the `alwaysMatch` capabilities for the configured browser kind,
/// including its launch flags. All kinds request the normal page-load
/// strategy so that navigation blocks until the load event.
pub fn for_kind(kind: BrowserKind, config: &Config) -> Value {
    let args = config.launch_options(kind);
    match kind {
        BrowserKind::Chrome => json!({
            "browserName": "chrome",
            "pageLoadStrategy": "normal",
            "goog:chromeOptions": { "args": args },
        }),
        BrowserKind::Firefox => json!({
            "browserName": "firefox",
            "pageLoadStrategy": "normal",
            "moz:firefoxOptions": { "args": args },
        }),
        BrowserKind::Edge => json!({
            "browserName": "MicrosoftEdge",
            "pageLoadStrategy": "normal",
            "ms:edgeOptions": { "args": args },
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chrome_flags_come_from_the_comma_separated_option() {
        let config = Config {
            chrome_options: "--headless=new, --disable-gpu".to_string(),
            ..Config::default()
        };
        let caps = for_kind(BrowserKind::Chrome, &config);
        assert_eq!(caps["browserName"], "chrome");
        assert_eq!(caps["pageLoadStrategy"], "normal");
        assert_eq!(
            caps["goog:chromeOptions"]["args"],
            json!(["--headless=new", "--disable-gpu"])
        );
    }

    #[test]
    fn edge_uses_the_vendor_prefixed_options_key() {
        let config = Config::default();
        let caps = for_kind(BrowserKind::Edge, &config);
        assert_eq!(caps["browserName"], "MicrosoftEdge");
        assert!(caps.get("ms:edgeOptions").is_some());
    }
}
