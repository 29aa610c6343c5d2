//! Scenario reporting.
//!
//! Each scenario accumulates a [`ScenarioRecord`] (log lines, binary
//! attachments, outcome); on teardown the record is merged into the
//! process-wide [`RunReport`], which the runner serializes to JSON and a
//! small self-contained HTML page under [`REPORT_DIR`].

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use once_cell::sync::Lazy;
use serde::{Serialize, Serializer};

use crate::error::SuiteResult;

/// Fixed output location for generated reports.
pub const REPORT_DIR: &str = "target/suite-reports";

static GLOBAL: Lazy<Mutex<RunReport>> = Lazy::new(|| Mutex::new(RunReport::default()));

fn as_base64<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&base64::encode(bytes))
}

#[derive(Debug, Clone, Serialize)]
pub struct Attachment {
    pub name: String,
    pub mime: String,
    #[serde(serialize_with = "as_base64")]
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScenarioRecord {
    pub name: String,
    pub logs: Vec<String>,
    pub attachments: Vec<Attachment>,
    pub failed: bool,
}

impl ScenarioRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a narration line. Mirrored to the logger so live output and the
    /// report stay in sync.
    pub fn log(&mut self, line: impl Into<String>) {
        let line = line.into();
        log::info!("{}", line);
        self.logs.push(line);
    }

    pub fn attach(&mut self, name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) {
        self.attachments.push(Attachment {
            name: name.into(),
            mime: mime.into(),
            bytes,
        });
    }

    pub fn fail(&mut self) {
        self.failed = true;
    }

    pub fn passed(&self) -> bool {
        !self.failed
    }
}

#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    pub scenarios: Vec<ScenarioRecord>,
}

impl RunReport {
    /// Merge a finished scenario into the process-wide report.
    pub fn record(record: ScenarioRecord) {
        GLOBAL
            .lock()
            .expect("run report lock poisoned")
            .scenarios
            .push(record);
    }

    pub fn run_count(&self) -> usize {
        self.scenarios.len()
    }

    pub fn failure_count(&self) -> usize {
        self.scenarios.iter().filter(|s| s.failed).count()
    }

    pub fn to_json(&self) -> SuiteResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_html(&self) -> String {
        let mut rows = String::new();
        for scenario in &self.scenarios {
            let status = if scenario.failed { "FAILED" } else { "PASSED" };
            let mut body = String::new();
            for line in &scenario.logs {
                body.push_str(&format!("<li>{}</li>", escape(line)));
            }
            let mut images = String::new();
            for attachment in &scenario.attachments {
                if attachment.mime == "image/png" {
                    images.push_str(&format!(
                        r#"<figure><img src="data:image/png;base64,{}" alt="{}"/><figcaption>{}</figcaption></figure>"#,
                        base64::encode(&attachment.bytes),
                        escape(&attachment.name),
                        escape(&attachment.name),
                    ));
                }
            }
            rows.push_str(&format!(
                r#"<section class="{}"><h2>{} [{}]</h2><ul>{}</ul>{}</section>"#,
                status.to_lowercase(),
                escape(&scenario.name),
                status,
                body,
                images,
            ));
        }

        format!(
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\"/>\
             <title>Suite report</title>\
             <style>body{{font-family:sans-serif;margin:2em}}\
             section.failed h2{{color:#b00020}}section.passed h2{{color:#1b7f3b}}\
             img{{max-width:640px;border:1px solid #ccc}}</style></head>\
             <body><h1>Suite report: {} scenarios, {} failed</h1>{}</body></html>",
            self.run_count(),
            self.failure_count(),
            rows
        )
    }

    pub fn write_to(&self, dir: &Path) -> SuiteResult<(PathBuf, PathBuf)> {
        fs::create_dir_all(dir)?;
        let json_path = dir.join("report.json");
        let html_path = dir.join("report.html");
        fs::write(&json_path, self.to_json()?)?;
        fs::write(&html_path, self.to_html())?;
        Ok((json_path, html_path))
    }
}

/// Write the global report to [`REPORT_DIR`] and return (runs, failures).
pub fn write_reports() -> SuiteResult<(usize, usize)> {
    let report = GLOBAL.lock().expect("run report lock poisoned");
    report.write_to(Path::new(REPORT_DIR))?;
    Ok((report.run_count(), report.failure_count()))
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_carries_logs_and_base64_attachments() {
        let mut record = ScenarioRecord::new("search");
        record.log("Navigated to homepage");
        record.attach("Search results", "image/png", vec![1, 2, 3]);
        record.fail();

        let mut report = RunReport::default();
        report.scenarios.push(record);

        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["scenarios"][0]["name"], "search");
        assert_eq!(value["scenarios"][0]["failed"], true);
        assert_eq!(
            value["scenarios"][0]["attachments"][0]["bytes"],
            base64::encode([1u8, 2, 3])
        );
    }

    #[test]
    fn html_counts_failures_and_escapes_content() {
        let mut record = ScenarioRecord::new("footer <titles>");
        record.log("checked & done");

        let mut report = RunReport::default();
        report.scenarios.push(record);

        let html = report.to_html();
        assert!(html.contains("1 scenarios, 0 failed"));
        assert!(html.contains("footer &lt;titles&gt;"));
        assert!(html.contains("checked &amp; done"));
    }

    #[test]
    fn outcome_query_reflects_failure() {
        let mut record = ScenarioRecord::new("s");
        assert!(record.passed());
        record.fail();
        assert!(!record.passed());
    }
}
