//! Configuration model for the automation engine.
//!
//! These types mirror the JSON documents produced by the flow builder UI.
//! The engine treats a loaded config as immutable: one snapshot per
//! match+render cycle, never mutated.

use serde::{Deserialize, Serialize};

/// Root automation configuration: an ordered rule set plus the fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationConfig {
    /// Ordered flows. Order is significant: earlier flows win ties.
    pub flows: Vec<Flow>,
    /// Reply used when no flow matches. Always present, never empty.
    pub fallback_message: String,
    /// Operator notes, carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One automation rule: a trigger plus the responses it emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flow {
    /// Stable unique identifier, never reused after deletion.
    pub id: String,
    /// Display name. No effect on matching.
    pub name: String,
    /// Display description. No effect on matching.
    #[serde(default)]
    pub description: String,
    /// How `match_value` is interpreted.
    pub match_type: MatchType,
    /// Trigger pattern; semantics depend on `match_type`.
    pub match_value: String,
    /// Descriptive labels. No effect on matching.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Inactive flows are never candidates.
    pub active: bool,
    /// Ordered outbound messages emitted when this flow matches.
    #[serde(default)]
    pub responses: Vec<Response>,
}

/// Trigger interpretation. Any other wire literal fails deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Inbound message equals the pattern exactly (case-sensitive).
    Exact,
    /// Inbound message contains the pattern as a substring.
    Contains,
    /// Inbound message begins with the pattern.
    StartsWith,
    /// Pattern is a regular expression, searched unanchored.
    Regex,
}

/// One outbound message unit belonging to a flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// Unique within the owning flow.
    pub id: String,
    /// Optional display tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Body text. May be empty only when `media_urls` is non-empty.
    pub message: String,
    /// Absolute URLs attached as media, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media_urls: Vec<String>,
    /// When set, this response also requests escalation to a human agent
    /// at that destination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handoff_number: Option<String>,
}

impl AutomationConfig {
    /// Built-in sample configuration, used when no config file is supplied.
    pub fn sample() -> Self {
        Self {
            flows: vec![
                Flow {
                    id: "flow-welcome".into(),
                    name: "Welcome".into(),
                    description: "Greets first contact".into(),
                    match_type: MatchType::Contains,
                    match_value: "hi".into(),
                    tags: vec!["greeting".into()],
                    active: true,
                    responses: vec![Response {
                        id: "resp-welcome-1".into(),
                        label: Some("Greeting".into()),
                        message: "Hey there! Thanks for reaching out. \
                                  Reply with \"support\" if you need a human."
                            .into(),
                        media_urls: vec![],
                        handoff_number: None,
                    }],
                },
                Flow {
                    id: "flow-support".into(),
                    name: "Support escalation".into(),
                    description: "Routes support requests to the on-call agent".into(),
                    match_type: MatchType::Regex,
                    match_value: "support|help".into(),
                    tags: vec!["support".into()],
                    active: true,
                    responses: vec![Response {
                        id: "resp-support-1".into(),
                        label: Some("Escalation".into()),
                        message: "Got it, connecting you with a teammate now.".into(),
                        media_urls: vec![],
                        handoff_number: Some("+15550100000".into()),
                    }],
                },
            ],
            fallback_message: "Sorry, I didn't catch that. \
                               Reply \"hi\" to see what I can do."
                .into(),
            notes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_type_uses_snake_case_literals() {
        assert_eq!(
            serde_json::to_value(MatchType::StartsWith).unwrap(),
            serde_json::json!("starts_with")
        );
        let parsed: MatchType = serde_json::from_value(serde_json::json!("regex")).unwrap();
        assert_eq!(parsed, MatchType::Regex);
    }

    #[test]
    fn unknown_match_type_is_rejected_not_coerced() {
        let result = serde_json::from_value::<MatchType>(serde_json::json!("fuzzy"));
        assert!(result.is_err());
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = AutomationConfig::sample();
        let json = serde_json::to_string(&config).unwrap();
        let reparsed: AutomationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, reparsed);
    }

    #[test]
    fn wire_form_uses_camel_case_keys() {
        let config = AutomationConfig::sample();
        let value = serde_json::to_value(&config).unwrap();
        assert!(value.get("fallbackMessage").is_some());
        let flow = &value["flows"][0];
        assert!(flow.get("matchType").is_some());
        assert!(flow.get("matchValue").is_some());
    }
}
