//! Human-handoff decision.
//!
//! A matched flow's responses may request escalation to a human agent. The
//! decision here is pure; the webhook route owns the actual notification
//! dispatch, which never gates the reply document.

use crate::automation::model::Response;

/// Return the destination of the first response that declares a handoff
/// number, scanning in order. At most one escalation per inbound message.
pub fn find_handoff_target(responses: &[Response]) -> Option<&str> {
    responses
        .iter()
        .find_map(|response| response.handoff_number.as_deref())
}

/// Notification body sent to the human agent.
pub fn handoff_summary(originating: &str, message: &str) -> String {
    format!("Heads up! {originating} needs help.\nMessage: {message}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(id: &str, handoff_number: Option<&str>) -> Response {
        Response {
            id: id.into(),
            label: None,
            message: "body".into(),
            media_urls: vec![],
            handoff_number: handoff_number.map(String::from),
        }
    }

    #[test]
    fn no_handoff_when_nothing_declares_one() {
        let responses = vec![response("r1", None), response("r2", None)];
        assert!(find_handoff_target(&responses).is_none());
        assert!(find_handoff_target(&[]).is_none());
    }

    #[test]
    fn first_declaring_response_wins() {
        let responses = vec![
            response("r1", None),
            response("r2", Some("+15551230001")),
            response("r3", Some("+15551230002")),
        ];
        assert_eq!(find_handoff_target(&responses), Some("+15551230001"));
    }

    #[test]
    fn summary_carries_sender_and_original_text() {
        let summary = handoff_summary("whatsapp:+15550001111", "my order is late");
        assert_eq!(
            summary,
            "Heads up! whatsapp:+15550001111 needs help.\nMessage: my order is late"
        );
    }
}
