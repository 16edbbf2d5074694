use ao3tagbot_common::models::{ChapterProgress, Rating, StoryRecord, Warning};

use crate::{
    query::{Document, Element},
    ParseError,
};

static WORK_META: &str = "#main dl.work.meta";
static WORK_STATS: &str = "#main dl.stats";
static STORY_TITLE: &str = "#workskin .preface h2.title";
static STORY_BYLINE: &str = "#workskin .preface h3.byline";
static STORY_AUTHOR: &str = "a[rel=author]";
static TAG: &str = "a.tag";

static ADULT_CAUTION: &str = "#main p.caution";
static NOT_FOUND_MAIN: &str = "#main.errors-404";
static MAIN_HEADING: &str = "#main h2.heading";
static LOGIN_MAIN: &str = "#main.sessions-new";
static FLASH: &str = "#main .flash";

/// Reads a work page into a [`StoryRecord`].
///
/// Only the title and byline are required, every other section of the page
/// is optional.
#[tracing::instrument(skip_all, err)]
pub fn extract(html: &str) -> Result<StoryRecord, ParseError> {
    let doc = Document::parse(html);

    let meta = doc.select_first(WORK_META);

    let title = match doc.select_first(STORY_TITLE) {
        Some(element) => element.clean_text(),
        // A work page whose title moved is a layout change, anything else is
        // some other page the archive answered with.
        None if meta.is_some() || doc.exists(STORY_BYLINE) => {
            return Err(ParseError::MissingField("title"))
        }
        None => return Err(interstitial(&doc)),
    };
    if title.is_empty() {
        return Err(ParseError::MissingField("title"));
    }

    let authors = get_authors(&doc).ok_or(ParseError::MissingField("author"))?;

    let mut record = StoryRecord {
        title,
        authors,
        ..Default::default()
    };

    let definitions = meta.map(|meta| meta.children()).unwrap_or_default();

    for definition in definitions
        .into_iter()
        .filter(|element| element.name().as_deref() == Some("dd"))
    {
        if definition.has_class("rating") {
            record.rating = get_tags(&definition).first().map(|label| {
                let rating = Rating::from_label(label);
                if let Rating::Other(label) = &rating {
                    tracing::warn!(rating = %label, "unrecognized rating");
                }

                rating
            });
        } else if definition.has_class("warning") {
            for label in get_tags(&definition) {
                let warning = Warning::from_label(&label);
                if let Warning::Other(label) = &warning {
                    tracing::warn!(warning = %label, "unrecognized archive warning");
                }

                if !record.warnings.contains(&warning) {
                    record.warnings.push(warning);
                }
            }
        } else if definition.has_class("category") {
            for category in get_tags(&definition) {
                if !record.categories.contains(&category) {
                    record.categories.push(category);
                }
            }
        } else if definition.has_class("fandom") {
            record.fandoms = get_tags(&definition);
        } else if definition.has_class("relationship") {
            record.relationships = get_tags(&definition);
        } else if definition.has_class("character") {
            record.characters = get_tags(&definition);
        } else if definition.has_class("freeform") {
            record.freeforms = get_tags(&definition);
        }
    }

    let mut status = None;

    if let Some(stats) = doc.select_first(WORK_STATS) {
        for element in stats.children() {
            if element.has_class("words") && element.name().as_deref() == Some("dd") {
                record.words = parse_count(&element.text());
            } else if element.has_class("chapters") && element.name().as_deref() == Some("dd") {
                record.chapters = parse_chapters(&element.text());
            } else if element.has_class("status") && element.name().as_deref() == Some("dt") {
                status = match element.clean_text().to_lowercase().as_str() {
                    "completed:" => Some(true),
                    "updated:" => Some(false),
                    _ => None,
                };
            }
        }
    }

    record.complete = status.or_else(|| record.chapters.map(|chapters| chapters.is_complete()));

    Ok(record)
}

fn get_authors(doc: &Document) -> Option<Vec<String>> {
    let byline = doc.select_first(STORY_BYLINE)?;

    let authors = byline
        .select(STORY_AUTHOR)
        .iter()
        .map(Element::clean_text)
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>();

    if !authors.is_empty() {
        return Some(authors);
    }

    // Anonymous and orphaned works have a plain text byline.
    let text = byline.clean_text();
    if text.is_empty() {
        None
    } else {
        Some(vec![text])
    }
}

fn get_tags(definition: &Element) -> Vec<String> {
    definition
        .select(TAG)
        .iter()
        .map(Element::clean_text)
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Works out which non-work page the archive sent back instead.
fn interstitial(doc: &Document) -> ParseError {
    let flash = doc
        .select(FLASH)
        .iter()
        .map(|element| element.clean_text().to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");

    let adult = doc
        .select(ADULT_CAUTION)
        .iter()
        .any(|element| element.clean_text().to_lowercase().contains("adult content"));

    let not_found = doc.exists(NOT_FOUND_MAIN)
        || doc
            .select(MAIN_HEADING)
            .iter()
            .any(|element| element.clean_text().starts_with("Error 404"))
        || flash.contains("find");

    let restricted =
        doc.exists(LOGIN_MAIN) || flash.contains("permission") || flash.contains("log in");

    if adult {
        ParseError::AdultContent
    } else if not_found {
        ParseError::NotFound
    } else if restricted {
        ParseError::Restricted
    } else {
        ParseError::Unrecognized
    }
}

/// Leading digits of `text`, ignoring thousands separators.
pub(crate) fn parse_count(text: &str) -> Option<u64> {
    text.trim()
        .chars()
        .take_while(|c| {
            c.is_ascii_digit() || matches!(*c, ',' | '.' | ' ' | '\u{a0}' | '\u{202f}')
        })
        .filter(char::is_ascii_digit)
        .collect::<String>()
        .parse()
        .ok()
}

/// `3/10` or `3/?`.
pub(crate) fn parse_chapters(text: &str) -> Option<ChapterProgress> {
    let (published, total) = match text.split_once('/') {
        Some((published, total)) => (published, Some(total.trim())),
        None => (text, None),
    };

    let published = u32::try_from(parse_count(published)?).ok()?;
    let total = total
        .filter(|total| *total != "?")
        .and_then(parse_count)
        .and_then(|total| u32::try_from(total).ok());

    Some(ChapterProgress { published, total })
}
