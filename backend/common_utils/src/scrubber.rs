//!
//! Redaction of sensitive values from captured wire transcripts.
//!
//! A transcript is the plain-text record of one or more HTTP exchanges. Lines sent to the
//! gateway start with `<- ` and lines received start with `-> `. Headers are written one per
//! line as `<- Name: value` and bodies are written verbatim, so field rules work on JSON, XML
//! and url-encoded payloads alike.
//!

use error_stack::ResultExt;
use regex::Regex;

use crate::{
    consts::FILTERED,
    errors::{CustomResult, ParsingError},
};

/// A single redaction rule. Field names are matched literally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrubRule {
    /// `"name": "value"` or `"name": 123`
    JsonField(&'static str),
    /// `name=value` inside a url-encoded body or query string
    FormField(&'static str),
    /// `<name ...>value</name>`
    XmlElement(&'static str),
    /// `name="value"` inside an XML start tag
    XmlAttribute(&'static str),
    /// An outgoing header line, e.g. `Authorization`
    Header(&'static str),
    /// Free-form pattern and replacement in `regex` replacement syntax
    Pattern(&'static str, &'static str),
}

impl ScrubRule {
    fn compile(self) -> Result<(Regex, String), regex::Error> {
        let keep_prefix = format!("${{1}}{FILTERED}");
        let keep_both = format!("${{1}}{FILTERED}${{2}}");
        let (pattern, replacement) = match self {
            Self::JsonField(name) => (
                format!(r#"("{}"\s*:\s*)(?:"(?:[^"\\]|\\.)*"|-?\d+(?:\.\d+)?)"#, regex::escape(name)),
                format!("${{1}}\"{FILTERED}\""),
            ),
            Self::FormField(name) => (
                format!(r"(?m)((?:^|[&?\s]){}=)[^&\s]*", regex::escape(name)),
                keep_prefix,
            ),
            Self::XmlElement(name) => {
                let name = regex::escape(name);
                (format!(r"(<{name}(?:\s[^>]*)?>)[^<]*(</{name}>)"), keep_both)
            }
            Self::XmlAttribute(name) => (
                format!(r#"(\s{}\s*=\s*")[^"]*(")"#, regex::escape(name)),
                keep_both,
            ),
            Self::Header(name) => (
                format!(r"(?mi)^(<- {}:[ \t]*)[^\r\n]*", regex::escape(name)),
                keep_prefix,
            ),
            Self::Pattern(pattern, replacement) => (pattern.to_string(), replacement.to_string()),
        };
        Ok((Regex::new(&pattern)?, replacement))
    }
}

/// An ordered set of compiled redaction rules.
#[derive(Debug, Clone)]
pub struct Scrubber {
    rules: Vec<(Regex, String)>,
}

impl Scrubber {
    pub fn new(rules: &[ScrubRule]) -> CustomResult<Self, ParsingError> {
        let rules = rules
            .iter()
            .map(|rule| {
                rule.compile()
                    .change_context_lazy(|| ParsingError::InvalidPattern(format!("{rule:?}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Applies every rule in order. Running it again on its own output changes nothing.
    pub fn scrub(&self, transcript: &str) -> String {
        self.rules
            .iter()
            .fold(transcript.to_string(), |text, (pattern, replacement)| {
                pattern.replace_all(&text, replacement.as_str()).into_owned()
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn scrub(rules: &[ScrubRule], transcript: &str) -> String {
        Scrubber::new(rules).unwrap().scrub(transcript)
    }

    #[test]
    fn masks_json_strings_and_numbers() {
        let transcript = r#"<- {"card":{"number":"4111111111111111","cvc":737,"holderName":"John"}}"#;
        assert_eq!(
            scrub(
                &[ScrubRule::JsonField("number"), ScrubRule::JsonField("cvc")],
                transcript
            ),
            r#"<- {"card":{"number":"[FILTERED]","cvc":"[FILTERED]","holderName":"John"}}"#
        );
    }

    #[test]
    fn masks_escaped_json_strings() {
        let transcript = r#"<- {"password" : "p\"ss", "user":"x"}"#;
        assert_eq!(
            scrub(&[ScrubRule::JsonField("password")], transcript),
            r#"<- {"password" : "[FILTERED]", "user":"x"}"#
        );
    }

    #[test]
    fn masks_form_fields_without_touching_lookalikes() {
        let transcript = "<- type=sale&ccnumber=4111111111111111&cvv=999&security_key=abc\n-> response=1&cvvresponse=M";
        assert_eq!(
            scrub(
                &[
                    ScrubRule::FormField("ccnumber"),
                    ScrubRule::FormField("cvv"),
                    ScrubRule::FormField("security_key"),
                ],
                transcript
            ),
            "<- type=sale&ccnumber=[FILTERED]&cvv=[FILTERED]&security_key=[FILTERED]\n-> response=1&cvvresponse=M"
        );
    }

    #[test]
    fn masks_xml_elements_and_attributes() {
        let transcript = r#"<- <CARD-SSL><cardNumber>4444333322221111</cardNumber><cvc>123</cvc></CARD-SSL><order orderCode="abc" installationId="99">"#;
        assert_eq!(
            scrub(
                &[
                    ScrubRule::XmlElement("cardNumber"),
                    ScrubRule::XmlElement("cvc"),
                    ScrubRule::XmlAttribute("installationId"),
                ],
                transcript
            ),
            r#"<- <CARD-SSL><cardNumber>[FILTERED]</cardNumber><cvc>[FILTERED]</cvc></CARD-SSL><order orderCode="abc" installationId="[FILTERED]">"#
        );
    }

    #[test]
    fn masks_outgoing_headers_case_insensitively() {
        let transcript = "<- POST https://example.test/v1\n<- authorization: Basic dXNlcjpwYXNz\n<- Content-Type: text/xml\n";
        assert_eq!(
            scrub(&[ScrubRule::Header("Authorization")], transcript),
            "<- POST https://example.test/v1\n<- authorization: [FILTERED]\n<- Content-Type: text/xml\n"
        );
    }

    #[test]
    fn scrubbing_is_idempotent() {
        let rules = [ScrubRule::JsonField("number"), ScrubRule::FormField("cvv")];
        let transcript = r#"<- {"number":"4111111111111111"} cvv=123"#;
        let once = scrub(&rules, transcript);
        assert_eq!(scrub(&rules, &once), once);
    }

    #[test]
    fn invalid_free_form_pattern_is_an_error() {
        assert!(Scrubber::new(&[ScrubRule::Pattern("(unclosed", "")]).is_err());
    }
}
