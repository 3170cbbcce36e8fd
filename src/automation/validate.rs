//! Semantic validation of an automation configuration.
//!
//! Shape and type problems (wrong JSON types, unknown `matchType` literals)
//! are serde's job at deserialization time. This pass runs on the typed value
//! and collects every remaining violation in one sweep, so an editor can show
//! all problems at once.

use std::collections::HashSet;

use regex::Regex;

use crate::automation::model::{AutomationConfig, MatchType};
use crate::error::{ValidationError, Violation};

/// Validate a configuration against the engine's invariants.
///
/// Pure and deterministic. Returns `Ok(())` or every violation found.
pub fn validate(config: &AutomationConfig) -> Result<(), ValidationError> {
    let mut violations = Vec::new();

    if config.fallback_message.is_empty() {
        violations.push(Violation {
            path: "fallbackMessage".into(),
            message: "fallback message must not be empty".into(),
        });
    }

    let mut seen_flow_ids = HashSet::new();
    for (i, flow) in config.flows.iter().enumerate() {
        let path = |field: &str| format!("flows[{i}].{field}");

        if flow.id.is_empty() {
            violations.push(Violation {
                path: path("id"),
                message: "flow id must not be empty".into(),
            });
        } else if !seen_flow_ids.insert(flow.id.as_str()) {
            violations.push(Violation {
                path: path("id"),
                message: format!("duplicate flow id \"{}\"", flow.id),
            });
        }

        match flow.match_type {
            MatchType::Exact | MatchType::Contains | MatchType::StartsWith => {
                if flow.match_value.is_empty() {
                    violations.push(Violation {
                        path: path("matchValue"),
                        message: "match value must not be empty".into(),
                    });
                }
            }
            MatchType::Regex => {
                if let Err(e) = Regex::new(&flow.match_value) {
                    violations.push(Violation {
                        path: path("matchValue"),
                        message: format!(
                            "invalid regex in flow \"{}\": {e}",
                            flow.id
                        ),
                    });
                }
            }
        }

        let mut seen_response_ids = HashSet::new();
        for (j, response) in flow.responses.iter().enumerate() {
            let path = |field: &str| format!("flows[{i}].responses[{j}].{field}");

            if response.id.is_empty() {
                violations.push(Violation {
                    path: path("id"),
                    message: "response id must not be empty".into(),
                });
            } else if !seen_response_ids.insert(response.id.as_str()) {
                violations.push(Violation {
                    path: path("id"),
                    message: format!("duplicate response id \"{}\"", response.id),
                });
            }

            if response.message.is_empty() && response.media_urls.is_empty() {
                violations.push(Violation {
                    path: path("message"),
                    message: "response needs a message body or at least one media URL".into(),
                });
            }

            for (k, url) in response.media_urls.iter().enumerate() {
                if !is_absolute_url(url) {
                    violations.push(Violation {
                        path: format!("flows[{i}].responses[{j}].mediaUrls[{k}]"),
                        message: format!("\"{url}\" is not an absolute http(s) URL"),
                    });
                }
            }
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { violations })
    }
}

fn is_absolute_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
