use std::collections::HashSet;

/// The set of URL paths that are currently published.
///
/// Entries are stored exactly as the enumerator produced them. Slash
/// tolerance lives entirely on the query side: [`LiveUrlSet::contains`]
/// checks every leading/trailing slash combination of the candidate.
#[derive(Debug, Default, Clone)]
pub struct LiveUrlSet {
    urls: HashSet<String>,
}

impl LiveUrlSet {
    /// Build the set from the enumerator's output, verbatim.
    pub fn build<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            urls: urls.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `path`, `path/`, `/path` or `/path/` is live.
    ///
    /// A query that already carries a leading or trailing slash is also
    /// checked with those slashes removed, so `about/` finds a stored `about`.
    pub fn contains(&self, path: &str) -> bool {
        let core = path.strip_prefix('/').unwrap_or(path);
        let core = core.strip_suffix('/').unwrap_or(core);

        self.contains_variant(path) || (core != path && self.contains_variant(core))
    }

    fn contains_variant(&self, path: &str) -> bool {
        self.urls.contains(path)
            || self.urls.contains(&format!("{path}/"))
            || self.urls.contains(&format!("/{path}"))
            || self.urls.contains(&format!("/{path}/"))
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
