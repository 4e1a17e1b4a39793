use std::sync::Arc;

/// Raw HTML of a fetched page.
///
/// Documents are stored verbatim and parsed on demand, so a cached page
/// round-trips through the disk byte-for-byte. Cloning is cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    html: Arc<str>,
}
impl Document {
    pub fn new(html: impl Into<String>) -> Self {
        let html: String = html.into();
        Self { html: Arc::from(html) }
    }

    /// Invalid UTF-8 sequences are replaced with U+FFFD.
    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Self {
        Self::new(String::from_utf8_lossy(bytes.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn len(&self) -> usize {
        self.html.len()
    }

    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }
}
impl AsRef<str> for Document {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
impl From<String> for Document {
    fn from(html: String) -> Self {
        Self::new(html)
    }
}
impl From<&str> for Document {
    fn from(html: &str) -> Self {
        Self::new(html)
    }
}
