#[derive(Clone, Debug)]
pub struct Response {
    pub headers: Option<reqwest::header::HeaderMap>,
    pub response: bytes::Bytes,
    pub status_code: u16,
}

impl Response {
    /// Body as text with any UTF-8 byte order mark removed.
    pub fn body_text(&self) -> String {
        let text = String::from_utf8_lossy(&self.response);
        text.trim_start_matches('\u{FEFF}').to_string()
    }
}
