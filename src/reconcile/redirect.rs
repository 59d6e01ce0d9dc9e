use memchr::memmem::Finder;

/// Banner lines written at the top of generated redirect scripts.
pub const DEFAULT_REDIRECT_MARKERS: [&str; 2] = [
    "* This is a system-generated PHP script that performs header management for",
    "* a 301 redirection.",
];

/// Heuristic detector for generated redirect stubs.
///
/// A file is a stub when every marker appears somewhere in its contents.
#[derive(Debug, Clone)]
pub struct RedirectDetector {
    markers: Vec<Finder<'static>>,
}

impl RedirectDetector {
    pub fn with_markers<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            markers: markers
                .into_iter()
                .map(|m| Finder::new(m.as_ref().as_bytes()).into_owned())
                .collect(),
        }
    }

    pub fn is_redirect_stub(&self, contents: &[u8]) -> bool {
        !self.markers.is_empty()
            && self
                .markers
                .iter()
                .all(|marker| marker.find(contents).is_some())
    }
}

impl Default for RedirectDetector {
    fn default() -> Self {
        Self::with_markers(DEFAULT_REDIRECT_MARKERS)
    }
}

