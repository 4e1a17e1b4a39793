/// Mirror label to download URL, kept in document order.
///
/// Inserting an existing label replaces its URL but keeps its position, so
/// the first entry is always the first label seen in the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorMap {
    entries: Vec<(String, String)>,
}
impl MirrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>, url: impl Into<String>) {
        let label = label.into();
        let url = url.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == label) {
            Some((_, existing)) => *existing = url,
            None => self.entries.push((label, url)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries.iter().find(|(existing, _)| existing == label).map(|(_, url)| url.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels and URLs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(label, url)| (label.as_str(), url.as_str()))
    }

    pub fn first(&self) -> Option<(&str, &str)> {
        self.iter().next()
    }

    /// Picks the first favorite (in priority order) that the map offers,
    /// falling back to the first mirror in document order.
    ///
    /// Returns `(label, url)`, or `None` for an empty map.
    pub fn select<S: AsRef<str>>(&self, favorites: &[S]) -> Option<(&str, &str)> {
        favorites
            .iter()
            .find_map(|favorite| {
                self.entries
                    .iter()
                    .find(|(label, _)| label == favorite.as_ref())
                    .map(|(label, url)| (label.as_str(), url.as_str()))
            })
            .or_else(|| self.first())
    }
}
impl<L: Into<String>, U: Into<String>> FromIterator<(L, U)> for MirrorMap {
    fn from_iter<T: IntoIterator<Item = (L, U)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (label, url) in iter {
            map.insert(label, url);
        }
        map
    }
}
