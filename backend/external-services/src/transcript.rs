//!
//! Plain-text capture of the HTTP exchanges made for one gateway operation.
//!
//! Every line sent is prefixed with `<- ` and every line received with `-> `. Credentials
//! and card data are written as they went over the wire; the connector's scrub rules are
//! what make a transcript safe to log.
//!

use common_utils::request::Request;
use domain_types::router_response_types::Response;
use hyperswitch_masking::{Maskable, PeekInterface};

const SENT: &str = "<- ";
const RECEIVED: &str = "-> ";

#[derive(Debug, Default, Clone)]
pub struct Transcript {
    text: String,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes the request line, headers sorted by name, and the encoded body.
    pub fn record_request(&mut self, request: &Request, body: Option<&str>) {
        self.push_line(SENT, &format!("{} {}", request.method, request.url));

        let mut headers = request
            .headers
            .iter()
            .map(|(name, value)| {
                let value = match value {
                    Maskable::Masked(secret) => secret.peek().clone(),
                    Maskable::Normal(value) => value.clone(),
                };
                (name.as_str(), value)
            })
            .collect::<Vec<_>>();
        headers.sort();
        for (name, value) in headers {
            self.push_line(SENT, &format!("{name}: {value}"));
        }

        if let Some(body) = body.filter(|body| !body.is_empty()) {
            self.push_block(SENT, body);
        }
    }

    pub fn record_response(&mut self, response: &Response) {
        self.push_line(RECEIVED, &response.status_code.to_string());
        let body = response.body_text();
        if !body.is_empty() {
            self.push_block(RECEIVED, &body);
        }
    }

    /// Notes a request that never got an answer.
    pub fn record_failure(&mut self, reason: &str) {
        self.push_line(RECEIVED, &format!("(no response: {reason})"));
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_inner(self) -> String {
        self.text
    }

    fn push_block(&mut self, prefix: &str, block: &str) {
        for line in block.lines() {
            self.push_line(prefix, line);
        }
    }

    fn push_line(&mut self, prefix: &str, line: &str) {
        self.text.push_str(prefix);
        self.text.push_str(line);
        self.text.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use common_utils::request::{Method, RequestBuilder};
    use hyperswitch_masking::Secret;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn records_both_directions_with_prefixes() {
        let request = RequestBuilder::new()
            .method(Method::Post)
            .url("https://gateway.test/charge")
            .headers(vec![
                ("Content-Type".to_string(), "application/json".to_string().into()),
                (
                    "Authorization".to_string(),
                    Maskable::Masked(Secret::new("Bearer sk_test".to_string())),
                ),
            ])
            .build();
        let mut transcript = Transcript::new();
        transcript.record_request(&request, Some("{\"total\":1.00}"));
        transcript.record_response(&Response {
            headers: None,
            response: bytes::Bytes::from_static(b"{\"id\":\"ch_1\"}\n{\"more\":true}"),
            status_code: 200,
        });

        assert_eq!(
            transcript.as_str(),
            "<- POST https://gateway.test/charge\n\
             <- Authorization: Bearer sk_test\n\
             <- Content-Type: application/json\n\
             <- {\"total\":1.00}\n\
             -> 200\n\
             -> {\"id\":\"ch_1\"}\n\
             -> {\"more\":true}\n"
        );
    }

    #[test]
    fn failures_are_noted_as_received_lines() {
        let mut transcript = Transcript::new();
        transcript.record_failure("timeout");
        assert_eq!(transcript.into_inner(), "-> (no response: timeout)\n");
    }
}
