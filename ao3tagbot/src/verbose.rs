//! `-v`/`-q` flags counted up and down from a default of INFO.

use tracing::level_filters::LevelFilter;

#[derive(clap::Args, Debug, Clone, Copy)]
pub struct Verbosity {
    /// More output per occurrence
    #[clap(long, short = 'v', parse(from_occurrences), global = true)]
    verbose: i8,

    /// Less output per occurrence
    #[clap(
        long,
        short = 'q',
        parse(from_occurrences),
        global = true,
        conflicts_with = "verbose"
    )]
    quiet: i8,
}

impl Verbosity {
    pub fn log_level_filter(&self) -> LevelFilter {
        // 0 = off, 1 = error, ... 5 = trace
        match 3i8.saturating_add(self.verbose).saturating_sub(self.quiet) {
            i8::MIN..=0 => LevelFilter::OFF,
            1 => LevelFilter::ERROR,
            2 => LevelFilter::WARN,
            3 => LevelFilter::INFO,
            4 => LevelFilter::DEBUG,
            5..=i8::MAX => LevelFilter::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(verbose: i8, quiet: i8) -> LevelFilter {
        Verbosity { verbose, quiet }.log_level_filter()
    }

    #[test]
    fn defaults_to_info() {
        assert_eq!(filter(0, 0), LevelFilter::INFO);
    }

    #[test]
    fn counts_occurrences() {
        assert_eq!(filter(1, 0), LevelFilter::DEBUG);
        assert_eq!(filter(5, 0), LevelFilter::TRACE);
        assert_eq!(filter(0, 1), LevelFilter::WARN);
        assert_eq!(filter(0, 3), LevelFilter::OFF);
        assert_eq!(filter(0, 9), LevelFilter::OFF);
    }
}
