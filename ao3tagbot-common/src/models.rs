use std::{fmt, num::ParseIntError, str::FromStr};

/// The numeric id of a work, taken from its `/works/<id>` URL.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct StoryId(u64);

impl StoryId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for StoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StoryId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Everything read off a work page.
///
/// Only `title` and `authors` are guaranteed, every other field reflects
/// whatever the page happened to carry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoryRecord {
    pub title: String,
    pub authors: Vec<String>,
    pub fandoms: Vec<String>,
    pub rating: Option<Rating>,
    pub warnings: Vec<Warning>,
    pub categories: Vec<String>,
    pub relationships: Vec<String>,
    pub characters: Vec<String>,
    pub freeforms: Vec<String>,
    pub words: Option<u64>,
    pub chapters: Option<ChapterProgress>,
    pub complete: Option<bool>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChapterProgress {
    pub published: u32,
    /// `None` when the author has not decided on a chapter count (`3/?`).
    pub total: Option<u32>,
}

impl ChapterProgress {
    pub fn is_complete(&self) -> bool {
        self.total == Some(self.published)
    }
}

impl fmt::Display for ChapterProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.total {
            Some(total) => write!(f, "{}/{}", self.published, total),
            None => write!(f, "{}/?", self.published),
        }
    }
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rating {
    General,
    Teen,
    Mature,
    Explicit,
    NotRated,
    /// A label the archive uses that we don't know about (yet).
    Other(String),
}

impl Rating {
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();

        match label.to_lowercase().as_str() {
            "general audiences" | "general" => Rating::General,
            "teen and up audiences" | "teen" => Rating::Teen,
            "mature" => Rating::Mature,
            "explicit" => Rating::Explicit,
            "not rated" => Rating::NotRated,
            _ => Rating::Other(label.to_string()),
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Rating::General => "General Audiences",
            Rating::Teen => "Teen And Up Audiences",
            Rating::Mature => "Mature",
            Rating::Explicit => "Explicit",
            Rating::NotRated => "Not Rated",
            Rating::Other(label) => label,
        })
    }
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Warning {
    ChoseNotToUse,
    NoneApply,
    GraphicViolence,
    MajorCharacterDeath,
    NonCon,
    Underage,
    Other(String),
}

impl Warning {
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();

        match label.to_lowercase().as_str() {
            "creator chose not to use archive warnings"
            | "choose not to use archive warnings"
            | "choose not to use" => Warning::ChoseNotToUse,
            "no archive warnings apply" => Warning::NoneApply,
            "graphic depictions of violence" => Warning::GraphicViolence,
            "major character death" => Warning::MajorCharacterDeath,
            "rape/non-con" => Warning::NonCon,
            "underage" | "underage sex" => Warning::Underage,
            _ => Warning::Other(label.to_string()),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Warning::ChoseNotToUse => "Creator Chose Not To Use Archive Warnings",
            Warning::NoneApply => "No Archive Warnings Apply",
            Warning::GraphicViolence => "Graphic Depictions Of Violence",
            Warning::MajorCharacterDeath => "Major Character Death",
            Warning::NonCon => "Rape/Non-Con",
            Warning::Underage => "Underage Sex",
            Warning::Other(label) => label,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_labels_ignore_case_and_padding() {
        assert_eq!(Rating::from_label("Teen And Up Audiences"), Rating::Teen);
        assert_eq!(Rating::from_label("  explicit\n"), Rating::Explicit);
        assert_eq!(Rating::from_label("NOT RATED"), Rating::NotRated);
    }

    #[test]
    fn unknown_labels_are_kept() {
        assert_eq!(
            Rating::from_label(" Adults Only "),
            Rating::Other(String::from("Adults Only"))
        );
        assert_eq!(
            Warning::from_label("Spoilers"),
            Warning::Other(String::from("Spoilers"))
        );
        assert_eq!(Warning::from_label("Spoilers").to_string(), "Spoilers");
    }

    #[test]
    fn warning_labels() {
        assert_eq!(
            Warning::from_label("Creator Chose Not To Use Archive Warnings"),
            Warning::ChoseNotToUse
        );
        assert_eq!(
            Warning::from_label("Choose Not To Use Archive Warnings"),
            Warning::ChoseNotToUse
        );
        assert_eq!(Warning::from_label("rape/non-con"), Warning::NonCon);
    }

    #[test]
    fn chapter_progress() {
        let done = ChapterProgress {
            published: 10,
            total: Some(10),
        };
        let open = ChapterProgress {
            published: 3,
            total: None,
        };

        assert!(done.is_complete());
        assert!(!open.is_complete());
        assert_eq!(done.to_string(), "10/10");
        assert_eq!(open.to_string(), "3/?");
    }

    #[test]
    fn story_id_from_str() {
        assert_eq!("123".parse::<StoryId>(), Ok(StoryId::new(123)));
        assert!("12a".parse::<StoryId>().is_err());
    }
}
