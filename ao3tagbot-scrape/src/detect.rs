use std::collections::HashSet;

use ao3tagbot_common::models::StoryId;
use regex::Regex;

/// Hosts that serve the archive besides the configured one.
pub const ARCHIVE_HOSTS: &[&str] = &[
    "archiveofourown.org",
    "archiveofourown.com",
    "archiveofourown.net",
    "ao3.org",
];

/// Finds work links in free text.
#[derive(Clone, Debug)]
pub struct Detector {
    pattern: Regex,
}

impl Detector {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let hosts = hosts
            .into_iter()
            .map(|host| regex::escape(host.as_ref().trim().trim_start_matches("www.")))
            .filter(|host| !host.is_empty())
            .collect::<Vec<_>>()
            .join("|");

        // `works` has to be a whole path segment, anything may sit between
        // the host and it (collections, users), and the id ends at the first
        // non-word character.
        let pattern = Regex::new(&format!(
            r"(?i)\b(?:www\.)?(?:{})(?::\d+)?(?:/[^\s/?#]+)*?/works/(\d+)\b",
            hosts
        ))
        .expect("escaped hosts always form a valid pattern");

        Self { pattern }
    }

    /// The archive's own hosts plus the one in `archive`, a base URL like
    /// `https://archiveofourown.org`.
    pub fn for_archive(archive: &str) -> Self {
        let configured = archive
            .split("://")
            .last()
            .unwrap_or(archive)
            .split(|c: char| c == '/' || c == ':')
            .next()
            .unwrap_or_default()
            .to_string();

        let mut hosts = ARCHIVE_HOSTS
            .iter()
            .map(|host| host.to_string())
            .collect::<Vec<_>>();
        if !hosts.contains(&configured) {
            hosts.push(configured);
        }

        Self::new(hosts)
    }

    /// Work ids in order of first appearance, without repeats.
    pub fn detect(&self, text: &str) -> Vec<StoryId> {
        let mut seen = HashSet::new();

        self.pattern
            .captures_iter(text)
            .filter_map(|captures| captures.get(1)?.as_str().parse::<StoryId>().ok())
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

impl Default for Detector {
    fn default() -> Self {
        Self::new(ARCHIVE_HOSTS)
    }
}
