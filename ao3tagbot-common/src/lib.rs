pub mod models;
pub mod utils;

pub use color_eyre::{
    eyre::{bail, eyre as err, Context, Report},
    install,
};
pub use http::{StatusCode, Uri};

fn default_archive() -> String {
    String::from("https://archiveofourown.org")
}

fn default_timeout() -> u64 {
    10
}

fn default_concurrency() -> usize {
    4
}

fn default_view_adult() -> bool {
    true
}

#[twelf::config]
pub struct Conf {
    /// Telegram Bot API token
    pub token: String,

    /// Base URL of the archive that works are fetched from
    #[serde(default = "default_archive")]
    pub archive: String,

    /// Seconds to wait for a work page before giving up
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Number of works fetched at once for a single message
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Always request the unrestricted view of mature and explicit works
    #[serde(default = "default_view_adult")]
    pub view_adult: bool,
}
