use ao3tagbot_common::models::{ChapterProgress, Rating, Warning};
use ao3tagbot_scrape::{extract, ParseError};

static WORK: &str = include_str!("pages/work.html");
static WORK_NO_TAGS: &str = include_str!("pages/work_no_tags.html");
static WORK_NO_META: &str = include_str!("pages/work_no_meta.html");
static NOT_FOUND: &str = include_str!("pages/not_found.html");
static ADULT: &str = include_str!("pages/adult.html");
static RESTRICTED: &str = include_str!("pages/restricted.html");

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn full_work_page() {
    let record = extract(WORK).unwrap();

    assert_eq!(record.title, "The Long Way Round");
    assert_eq!(record.authors, strings(&["river_writes"]));
    assert_eq!(record.rating, Some(Rating::Teen));
    assert_eq!(
        record.warnings,
        vec![Warning::GraphicViolence, Warning::MajorCharacterDeath]
    );
    assert_eq!(record.categories, strings(&["F/M", "Gen"]));
    assert_eq!(
        record.fandoms,
        strings(&["Original Work", "Folklore & Mythology"])
    );
    assert_eq!(record.relationships, strings(&["Mara/Tomas"]));
    assert_eq!(
        record.characters,
        strings(&["Mara", "Tomas", "The Ferryman"])
    );
    assert_eq!(
        record.freeforms,
        strings(&["Road Trips", "Slow Burn", "Found Family"])
    );
    assert_eq!(record.words, Some(12345));
    assert_eq!(
        record.chapters,
        Some(ChapterProgress {
            published: 3,
            total: Some(10)
        })
    );
    assert_eq!(record.complete, Some(false));
}

#[test]
fn work_page_without_tags() {
    let record = extract(WORK_NO_TAGS).unwrap();

    assert_eq!(record.title, "untitled drabble");
    assert_eq!(record.authors, strings(&["Anonymous"]));
    assert_eq!(record.rating, None);
    assert!(record.warnings.is_empty());
    assert!(record.categories.is_empty());
    assert!(record.fandoms.is_empty());
    assert!(record.relationships.is_empty());
    assert!(record.characters.is_empty());
    assert!(record.freeforms.is_empty());
    assert_eq!(record.words, None);
    assert_eq!(
        record.chapters,
        Some(ChapterProgress {
            published: 1,
            total: Some(1)
        })
    );
    assert_eq!(record.complete, Some(true));
}

#[test]
fn work_page_without_meta_block() {
    let record = extract(WORK_NO_META).unwrap();

    assert_eq!(record.title, "Only Title");
    assert_eq!(record.authors, strings(&["someone"]));
    assert_eq!(record.rating, None);
    assert!(record.warnings.is_empty());
    assert!(record.fandoms.is_empty());
    assert!(record.freeforms.is_empty());
    assert_eq!(record.words, None);
    assert_eq!(record.chapters, None);
    assert_eq!(record.complete, None);
}

#[test]
fn not_found_page() {
    let err = extract(NOT_FOUND).unwrap_err();

    assert!(matches!(err, ParseError::NotFound));
    assert!(err.is_gone());
}

#[test]
fn adult_content_interstitial() {
    assert!(matches!(extract(ADULT), Err(ParseError::AdultContent)));
}

#[test]
fn restricted_work() {
    assert!(matches!(extract(RESTRICTED), Err(ParseError::Restricted)));
}

#[test]
fn layout_change_is_not_gone() {
    let html = WORK.replace("title heading", "work-title");

    let err = extract(&html).unwrap_err();

    assert!(matches!(err, ParseError::MissingField("title")));
    assert!(!err.is_gone());
}
