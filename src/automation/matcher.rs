//! First-match flow selection.
//!
//! Linear scan over the configured flows in authoring order: the first active
//! flow whose trigger fires wins. Authoring order encodes priority; there is
//! no ranking and no normalization of the inbound text.

use regex::Regex;
use tracing::warn;

use crate::automation::model::{Flow, MatchType};

/// Find the first active flow whose trigger matches the inbound message.
///
/// Returns `None` when nothing matches; the caller treats that as the
/// fallback case, never as an error.
pub fn find_matching_flow<'a>(message: &str, flows: &'a [Flow]) -> Option<&'a Flow> {
    flows
        .iter()
        .filter(|flow| flow.active)
        .find(|flow| trigger_matches(message, flow))
}

/// Evaluate one flow's trigger against the raw inbound text.
///
/// All comparisons are case-sensitive and untrimmed. A regex that fails to
/// compile here (validation should have caught it) is logged and treated as
/// non-matching so evaluation continues with later flows.
fn trigger_matches(message: &str, flow: &Flow) -> bool {
    match flow.match_type {
        MatchType::Exact => message == flow.match_value,
        MatchType::Contains => message.contains(&flow.match_value),
        MatchType::StartsWith => message.starts_with(&flow.match_value),
        MatchType::Regex => match Regex::new(&flow.match_value) {
            Ok(pattern) => pattern.is_match(message),
            Err(e) => {
                warn!(
                    flow_id = %flow.id,
                    error = %e,
                    "Flow pattern failed to compile during matching; skipping flow"
                );
                false
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automation::model::Response;

    fn flow(id: &str, match_type: MatchType, match_value: &str) -> Flow {
        Flow {
            id: id.into(),
            name: id.into(),
            description: String::new(),
            match_type,
            match_value: match_value.into(),
            tags: vec![],
            active: true,
            responses: vec![Response {
                id: format!("{id}-r1"),
                label: None,
                message: "reply".into(),
                media_urls: vec![],
                handoff_number: None,
            }],
        }
    }

    #[test]
    fn empty_flow_list_never_matches() {
        assert!(find_matching_flow("anything", &[]).is_none());
    }

    #[test]
    fn inactive_flows_are_never_candidates() {
        let mut f = flow("f1", MatchType::Contains, "hello");
        f.active = false;
        assert!(find_matching_flow("hello there", &[f]).is_none());
    }

    #[test]
    fn first_matching_flow_wins() {
        let flows = vec![
            flow("first", MatchType::Contains, "help"),
            flow("second", MatchType::Contains, "help"),
        ];
        let matched = find_matching_flow("I need help", &flows).unwrap();
        assert_eq!(matched.id, "first");
    }

    #[test]
    fn exact_requires_full_equality() {
        let flows = vec![flow("f", MatchType::Exact, "hi")];
        assert!(find_matching_flow("hi", &flows).is_some());
        assert!(find_matching_flow(" hi", &flows).is_none());
        assert!(find_matching_flow("hi!", &flows).is_none());
        assert!(find_matching_flow("Hi", &flows).is_none());
    }

    #[test]
    fn no_implicit_trimming() {
        // " hi" fails exact and starts_with but still contains "hi"
        assert!(find_matching_flow(" hi", &[flow("f", MatchType::Exact, "hi")]).is_none());
        assert!(find_matching_flow(" hi", &[flow("f", MatchType::StartsWith, "hi")]).is_none());
        assert!(find_matching_flow(" hi", &[flow("f", MatchType::Contains, "hi")]).is_some());
    }

    #[test]
    fn starts_with_is_anchored_to_the_front() {
        let flows = vec![flow("f", MatchType::StartsWith, "order")];
        assert!(find_matching_flow("order #42", &flows).is_some());
        assert!(find_matching_flow("my order #42", &flows).is_none());
    }

    #[test]
    fn regex_is_case_sensitive_by_default() {
        let flows = vec![flow("f", MatchType::Regex, "support|help")];
        assert!(find_matching_flow("need help now", &flows).is_some());
        assert!(find_matching_flow("I need HELP now", &flows).is_none());
    }

    #[test]
    fn regex_is_unanchored() {
        let flows = vec![flow("f", MatchType::Regex, r"order \d+")];
        assert!(find_matching_flow("about order 42 please", &flows).is_some());
    }

    #[test]
    fn uncompilable_regex_is_skipped_and_later_flows_still_match() {
        let flows = vec![
            flow("broken", MatchType::Regex, "(unclosed"),
            flow("ok", MatchType::Contains, "hello"),
        ];
        let matched = find_matching_flow("hello", &flows).unwrap();
        assert_eq!(matched.id, "ok");
    }
}
