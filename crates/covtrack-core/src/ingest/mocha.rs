//! Mocha (mochawesome) summary report reader.
//!
//! Each element of `results` is one spec file and becomes one
//! [`TestResultEntry`]. A first-suite title of the form
//! `area|feature|suite` maps the file onto an area and feature.

use super::TestResultEntry;
use crate::errors::CoverageError;
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct MochaReport {
    stats: MochaStats,
    #[serde(default)]
    results: Vec<MochaResult>,
}

#[derive(Debug, Deserialize)]
struct MochaStats {
    end: String,
}

#[derive(Debug, Deserialize)]
struct MochaResult {
    #[serde(default)]
    file: String,
    uuid: String,
    #[serde(default)]
    suites: Vec<MochaSuite>,
}

#[derive(Debug, Deserialize)]
struct MochaSuite {
    #[serde(default)]
    title: String,
    #[serde(default)]
    tests: Vec<MochaTest>,
    #[serde(default)]
    suites: Vec<MochaSuite>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MochaTest {
    pass: bool,
    fail: bool,
    pending: bool,
    skipped: bool,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Counts {
    total: i64,
    passes: i64,
    pending: i64,
    failures: i64,
    skipped: i64,
}

impl Counts {
    fn add(&mut self, test: &MochaTest) {
        self.total += 1;
        if test.pass {
            self.passes += 1;
        } else if test.fail {
            self.failures += 1;
        } else if test.skipped {
            self.skipped += 1;
        } else if test.pending {
            self.pending += 1;
        }
    }
}

/// Parse a mocha summary report into one entry per result file.
///
/// Invalid JSON or an unparsable `stats.end` rejects the whole report.
pub fn parse_mocha_report(raw: &str) -> Result<Vec<TestResultEntry>, CoverageError> {
    let report: MochaReport = serde_json::from_str(raw)
        .map_err(|e| CoverageError::validation(format!("invalid mocha report: {e}")))?;
    let end = DateTime::parse_from_rfc3339(&report.stats.end)
        .map_err(|e| {
            CoverageError::validation(format!(
                "invalid stats.end '{}': {e}",
                report.stats.end
            ))
        })?
        .with_timezone(&Utc);

    let entries: Vec<TestResultEntry> = report
        .results
        .into_iter()
        .map(|result| entry_from_result(result, end))
        .collect();
    tracing::debug!(entries = entries.len(), end = %end, "Parsed mocha report");
    Ok(entries)
}

fn entry_from_result(result: MochaResult, end: DateTime<Utc>) -> TestResultEntry {
    let (area, feature, suite) = split_title(result.suites.first().map(|s| s.title.as_str()));

    let mut counts = Counts::default();
    for suite in &result.suites {
        let nested = suite.suites.iter().flat_map(|s| s.tests.iter());
        for test in suite.tests.iter().chain(nested) {
            counts.add(test);
        }
    }

    TestResultEntry {
        area,
        feature,
        suite,
        file_name: result.file,
        uuid: result.uuid,
        total: counts.total,
        passes: counts.passes,
        pending: counts.pending,
        failures: counts.failures,
        skipped: counts.skipped,
        test_run: end,
    }
}

/// `area|feature|suite[|...]` or a plain suite title.
fn split_title(title: Option<&str>) -> (String, String, String) {
    let Some(title) = title else {
        return (String::new(), String::new(), String::new());
    };
    let parts: Vec<&str> = title.split('|').collect();
    if parts.len() >= 3 {
        (
            parts[0].trim().to_string(),
            parts[1].trim().to_string(),
            parts[2].trim().to_string(),
        )
    } else {
        (String::new(), String::new(), title.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const REPORT: &str = r#"{
        "stats": { "tests": 5, "passes": 3, "end": "2024-05-02T10:15:30.250Z" },
        "results": [
            {
                "file": "cypress/e2e/login.cy.js",
                "uuid": "3f0c",
                "suites": [
                    {
                        "title": "Checkout|Pay|login",
                        "tests": [ { "pass": true }, { "fail": true } ],
                        "suites": [
                            {
                                "title": "nested",
                                "tests": [ { "pass": true }, { "pending": true } ],
                                "suites": [
                                    { "title": "too deep", "tests": [ { "pass": true } ] }
                                ]
                            }
                        ]
                    },
                    { "title": "second", "tests": [ { "skipped": true, "pending": true } ] }
                ]
            },
            {
                "file": "cypress/e2e/search.cy.js",
                "uuid": "9a1b",
                "suites": [ { "title": "search", "tests": [ { "pass": true } ] } ]
            }
        ]
    }"#;

    #[test]
    fn parses_entries_per_result() {
        let entries = parse_mocha_report(REPORT).unwrap();
        assert_eq!(entries.len(), 2);

        let login = &entries[0];
        assert_eq!(login.area, "Checkout");
        assert_eq!(login.feature, "Pay");
        assert_eq!(login.suite, "login");
        assert_eq!(login.file_name, "cypress/e2e/login.cy.js");
        assert_eq!(login.uuid, "3f0c");
        assert_eq!(
            login.test_run,
            Utc.with_ymd_and_hms(2024, 5, 2, 10, 15, 30).unwrap()
                + chrono::Duration::milliseconds(250)
        );
        // Two levels only: the "too deep" test is not counted.
        assert_eq!(login.total, 5);
        assert_eq!(login.passes, 2);
        assert_eq!(login.failures, 1);
        assert_eq!(login.pending, 1);
        assert_eq!(login.skipped, 1);

        let search = &entries[1];
        assert_eq!(search.area, "");
        assert_eq!(search.feature, "");
        assert_eq!(search.suite, "search");
        assert_eq!(search.total, 1);
    }

    #[test]
    fn title_with_two_parts_is_plain_suite() {
        assert_eq!(
            split_title(Some("a|b")),
            (String::new(), String::new(), "a|b".to_string())
        );
        assert_eq!(
            split_title(Some("a | b | c | d")),
            ("a".to_string(), "b".to_string(), "c".to_string())
        );
        assert_eq!(split_title(None), Default::default());
    }

    #[test]
    fn rejects_bad_report() {
        assert!(matches!(
            parse_mocha_report("not json"),
            Err(CoverageError::Validation { .. })
        ));
        let bad_end = r#"{ "stats": { "end": "yesterday" }, "results": [] }"#;
        assert!(matches!(
            parse_mocha_report(bad_end),
            Err(CoverageError::Validation { .. })
        ));
    }

    #[test]
    fn empty_results_is_empty_list() {
        let raw = r#"{ "stats": { "end": "2024-05-02T10:15:30.000Z" }, "results": [] }"#;
        assert!(parse_mocha_report(raw).unwrap().is_empty());
    }
}
