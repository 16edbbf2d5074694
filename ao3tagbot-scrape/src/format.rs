//! Renders records as Telegram `MarkdownV2` messages.
//!
//! Every piece of text that came from the archive is untrusted and goes
//! through [`escape`] before it reaches the message.

use ao3tagbot_common::models::{StoryId, StoryRecord};

use crate::{Error, FetchError, ParseError};

/// Telegram rejects messages longer than this many characters.
pub const MAX_MESSAGE_LEN: usize = 4096;

const SPECIAL: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!', '\\',
];

/// Backslash-escapes every character `MarkdownV2` would otherwise interpret.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        if SPECIAL.contains(&c) {
            escaped.push('\\');
        }

        escaped.push(c);
    }

    escaped
}

pub fn format(record: &StoryRecord) -> String {
    let mut lines = Vec::with_capacity(8);

    lines.push(format!(
        "*{}* by {}",
        escape(&record.title),
        escape(&record.authors.join(", "))
    ));

    let rating = record
        .rating
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| String::from("Unknown"));
    if record.warnings.is_empty() {
        lines.push(escape(&format!("Rating: {}", rating)));
    } else {
        let warnings = record
            .warnings
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        lines.push(escape(&format!("Rating: {} | Warnings: {}", rating, warnings)));
    }

    let sections = [
        ("Fandom", &record.fandoms),
        ("Category", &record.categories),
        ("Relationships", &record.relationships),
        ("Characters", &record.characters),
        ("Tags", &record.freeforms),
    ];
    for (label, tags) in sections {
        if !tags.is_empty() {
            lines.push(escape(&format!("{}: {}", label, tags.join(", "))));
        }
    }

    let mut stats = Vec::with_capacity(3);
    if let Some(words) = record.words {
        stats.push(format!("Words: {}", group_thousands(words)));
    }
    if let Some(chapters) = &record.chapters {
        stats.push(format!("Chapters: {}", chapters));
    }
    match record.complete {
        Some(true) => stats.push(String::from("Complete")),
        Some(false) => stats.push(String::from("Incomplete")),
        None => {}
    }
    if !stats.is_empty() {
        lines.push(escape(&stats.join(" | ")));
    }

    truncate(lines.join("\n"))
}

/// The reply sent when a work couldn't be summarized.
///
/// Transport details stay in the logs, the chat only learns which kind of
/// failure happened.
pub fn format_error(id: StoryId, error: &Error) -> String {
    let text = match error {
        Error::Fetch(err) if err.is_not_found() => format!(
            "Couldn't retrieve work {}, it may have been deleted.",
            id
        ),
        Error::Fetch(FetchError::Timeout) => format!(
            "Couldn't retrieve work {}, the archive took too long to answer.",
            id
        ),
        Error::Fetch(_) => format!("Couldn't retrieve work {}.", id),
        Error::Parse(err) => {
            let reason = match err {
                ParseError::NotFound => "it has been deleted or doesn't exist",
                ParseError::Restricted => "it is only visible to logged-in users",
                ParseError::AdultContent => "it is behind the adult content warning",
                ParseError::MissingField(_) | ParseError::Unrecognized => {
                    "the page format has changed"
                }
            };

            format!("Couldn't read the tags of work {}: {}.", id, reason)
        }
    };

    escape(&text)
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }

        grouped.push(c);
    }

    grouped
}

fn truncate(mut message: String) -> String {
    if message.chars().count() <= MAX_MESSAGE_LEN {
        return message;
    }

    let cut = message
        .char_indices()
        .nth(MAX_MESSAGE_LEN - 1)
        .map(|(index, _)| index)
        .unwrap_or(message.len());
    message.truncate(cut);

    // An odd run of trailing backslashes means an escape lost its character.
    let trailing = message.chars().rev().take_while(|c| *c == '\\').count();
    if trailing % 2 == 1 {
        message.pop();
    }

    message.push('…');
    message
}
