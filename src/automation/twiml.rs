//! TwiML rendering for the webhook reply.
//!
//! Pure string assembly: a `<Response>` envelope with one `<Message>` per
//! response, or a single fallback message when nothing matched. All text
//! content is entity-escaped so arbitrary message bodies stay well-formed.

use crate::automation::model::Response;

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

/// Render the reply document for a matched flow's responses.
///
/// An empty `responses` slice renders the fallback message alone. Total for
/// any input: escaping handles reserved characters, and a response with an
/// empty body simply omits the `<Body>` element.
pub fn build_twiml(responses: &[Response], fallback_message: &str) -> String {
    let mut doc = String::with_capacity(128);
    doc.push_str(XML_DECLARATION);
    doc.push_str("<Response>");

    if responses.is_empty() {
        push_message(&mut doc, fallback_message, &[]);
    } else {
        for response in responses {
            push_message(&mut doc, &response.message, &response.media_urls);
        }
    }

    doc.push_str("</Response>");
    doc
}

fn push_message(doc: &mut String, body: &str, media_urls: &[String]) {
    doc.push_str("<Message>");
    if !body.is_empty() {
        doc.push_str("<Body>");
        doc.push_str(&escape_xml(body));
        doc.push_str("</Body>");
    }
    for url in media_urls {
        doc.push_str("<Media>");
        doc.push_str(&escape_xml(url));
        doc.push_str("</Media>");
    }
    doc.push_str("</Message>");
}

/// Escape the five XML-reserved characters in text content.
fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(message: &str, media_urls: &[&str]) -> Response {
        Response {
            id: "r1".into(),
            label: None,
            message: message.into(),
            media_urls: media_urls.iter().map(|s| s.to_string()).collect(),
            handoff_number: None,
        }
    }

    #[test]
    fn empty_responses_render_the_fallback_alone() {
        let doc = build_twiml(&[], "No flow matched.");
        assert_eq!(
            doc,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response>\
             <Message><Body>No flow matched.</Body></Message></Response>"
        );
        assert!(!doc.contains("<Media>"));
    }

    #[test]
    fn responses_render_in_order_with_media() {
        let doc = build_twiml(
            &[
                response("Hi", &["https://x/a.png"]),
                response("Bye", &[]),
            ],
            "unused fallback",
        );
        let first = doc.find("<Body>Hi</Body>").unwrap();
        let second = doc.find("<Body>Bye</Body>").unwrap();
        assert!(first < second);
        assert_eq!(doc.matches("<Message>").count(), 2);
        assert_eq!(doc.matches("<Media>").count(), 1);
        assert!(doc.contains("<Media>https://x/a.png</Media>"));
        assert!(!doc.contains("unused fallback"));
    }

    #[test]
    fn reserved_characters_are_escaped() {
        let doc = build_twiml(&[response("a < b & c > \"d\"", &[])], "f");
        assert!(doc.contains("<Body>a &lt; b &amp; c &gt; &quot;d&quot;</Body>"));
    }

    #[test]
    fn fallback_text_is_escaped_too() {
        let doc = build_twiml(&[], "ping <admin> & co");
        assert!(doc.contains("<Body>ping &lt;admin&gt; &amp; co</Body>"));
    }

    #[test]
    fn media_only_response_omits_body_element() {
        let doc = build_twiml(&[response("", &["https://x/a.png"])], "f");
        assert!(!doc.contains("<Body>"));
        assert!(doc.contains("<Media>https://x/a.png</Media>"));
    }

    #[test]
    fn media_urls_preserve_order() {
        let doc = build_twiml(
            &[response("pics", &["https://x/1.png", "https://x/2.png"])],
            "f",
        );
        let first = doc.find("1.png").unwrap();
        let second = doc.find("2.png").unwrap();
        assert!(first < second);
    }
}
