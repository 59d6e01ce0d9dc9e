use regex::Regex;

use crate::error::{PurgeError, Result};

/// Compiled exclusion rules.
///
/// Rules are matched with search semantics against the URL path as derived
/// from the cache file name: no leading slash, `""` for the homepage. Any
/// matching rule excludes the path.
#[derive(Debug, Default, Clone)]
pub struct ExclusionMatcher {
    rules: Vec<Regex>,
}

impl ExclusionMatcher {
    /// Compile every rule up front, failing on the first malformed one.
    pub fn compile<S: AsRef<str>>(rules: &[S]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|rule| compile_rule(rule.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rules })
    }

    pub fn is_excluded(&self, url_path: &str) -> bool {
        self.rules.iter().any(|re| re.is_match(url_path))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// One-shot form of [`ExclusionMatcher::is_excluded`].
pub fn is_excluded<S: AsRef<str>>(url_path: &str, rules: &[S]) -> Result<bool> {
    Ok(ExclusionMatcher::compile(rules)?.is_excluded(url_path))
}

fn compile_rule(rule: &str) -> Result<Regex> {
    let pattern = translate_rule(rule)?;
    Regex::new(&pattern).map_err(|e| PurgeError::InvalidExcludeRule {
        rule: rule.to_string(),
        source: Box::new(e),
    })
}

/// Characters accepted as rule delimiters, as in `/^blog\/tag\//` or
/// `#^blog/tag/#i`.
const RULE_DELIMITERS: [char; 8] = ['/', '#', '~', '!', '@', '%', ';', ','];

/// Turn a delimited `/pattern/flags` rule into a plain pattern with inline
/// flags.
///
/// Anything that is not wrapped in one of [`RULE_DELIMITERS`] is used as-is.
pub(crate) fn translate_rule(rule: &str) -> Result<String> {
    let Some((body, flags)) = split_delimited(rule) else {
        return Ok(rule.to_string());
    };

    let mut inline = String::new();
    for flag in flags.chars() {
        match flag {
            'i' | 'm' | 's' | 'x' | 'U' => {
                if !inline.contains(flag) {
                    inline.push(flag);
                }
            }
            // Unicode mode is always on.
            'u' => {}
            other => {
                return Err(PurgeError::InvalidExcludeRule {
                    rule: rule.to_string(),
                    source: format!("unsupported flag '{other}'").into(),
                });
            }
        }
    }

    if inline.is_empty() {
        Ok(body.to_string())
    } else {
        Ok(format!("(?{inline}){body}"))
    }
}

fn split_delimited(rule: &str) -> Option<(&str, &str)> {
    let delimiter = rule.chars().next().filter(|c| RULE_DELIMITERS.contains(c))?;
    let rest = &rule[delimiter.len_utf8()..];
    let end = rest.rfind(delimiter)?;
    let (body, flags) = (&rest[..end], &rest[end + delimiter.len_utf8()..]);

    if flags.chars().all(|c| c.is_ascii_alphabetic()) {
        Some((body, flags))
    } else {
        None
    }
}
