use ao3tagbot_common::StatusCode;

/// Everything that can go wrong while turning a work id into a summary.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid archive url `{0}`")]
    Url(String),

    #[error("unable to build http client")]
    Client(#[source] isahc::Error),

    #[error("unable to build request")]
    InvalidRequest(#[from] isahc::http::Error),

    #[error("request timed out")]
    Timeout,

    #[error("unable to connect to the archive")]
    Connect(#[source] isahc::Error),

    #[error("archive responded with status {0}")]
    Status(StatusCode),

    #[error("request failed")]
    Request(#[source] isahc::Error),

    #[error("unable to read response body")]
    Body(#[source] std::io::Error),
}

impl FetchError {
    pub(crate) fn from_isahc(err: isahc::Error) -> Self {
        use isahc::error::ErrorKind;

        match err.kind() {
            ErrorKind::Timeout => FetchError::Timeout,
            ErrorKind::ConnectionFailed | ErrorKind::NameResolution => FetchError::Connect(err),
            _ => FetchError::Request(err),
        }
    }

    pub(crate) fn from_body(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::TimedOut {
            FetchError::Timeout
        } else {
            FetchError::Body(err)
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::Status(status) if *status == StatusCode::NOT_FOUND)
    }
}

/// The page was fetched but isn't a readable work.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("work has been deleted or doesn't exist")]
    NotFound,

    #[error("work is only visible to logged-in users")]
    Restricted,

    #[error("work is behind the adult content confirmation")]
    AdultContent,

    #[error("work page has no {0}")]
    MissingField(&'static str),

    #[error("page doesn't look like a work")]
    Unrecognized,
}

impl ParseError {
    /// Whether the archive deliberately withheld the work, as opposed to the
    /// page layout no longer matching what the extractor expects.
    pub fn is_gone(&self) -> bool {
        matches!(
            self,
            ParseError::NotFound | ParseError::Restricted | ParseError::AdultContent
        )
    }
}
