use thiserror::Error;

/// Input rejected before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("empty city")]
    EmptyCity,
    #[error("no location")]
    NoLocation,
}

/// Failure of a single weather lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// DNS, TLS, refused connection, timeout, or a broken body stream.
    #[error("network error: {0}")]
    Network(String),

    #[error("weather service responded with status {status}: {body}")]
    Status { status: u16, body: String },

    /// Body isn't JSON or has no numeric `main.temp`.
    #[error("unexpected response: {0}")]
    Parse(String),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Network,
    Parse,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl SearchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Fetch(FetchError::Network(_)) => ErrorKind::Network,
            Self::Fetch(FetchError::Status { .. } | FetchError::Parse(_)) => ErrorKind::Parse,
            Self::Fetch(FetchError::Internal(_)) => ErrorKind::Internal,
        }
    }

    /// Message suitable for showing to the user as-is.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Validation(ValidationError::EmptyCity) => "Please enter a city to search for!",
            Self::Validation(ValidationError::NoLocation) => {
                "Error occurred getting location. Please try again."
            }
            Self::Fetch(FetchError::Network(_)) => {
                "Could not reach the weather service. Please try again."
            }
            Self::Fetch(FetchError::Status { .. } | FetchError::Parse(_)) => {
                "Could not get data for your city."
            }
            Self::Fetch(FetchError::Internal(_)) => "There was an internal error.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_keep_their_short_messages() {
        assert_eq!(ValidationError::EmptyCity.to_string(), "empty city");
        assert_eq!(ValidationError::NoLocation.to_string(), "no location");
    }

    #[test]
    fn http_status_is_reported_like_a_parse_failure() {
        let err = SearchError::from(FetchError::Status { status: 404, body: "city not found".into() });

        assert_eq!(err.kind(), ErrorKind::Parse);
        assert_eq!(err.user_message(), "Could not get data for your city.");
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn every_kind_has_a_user_message() {
        let errors = [
            SearchError::from(ValidationError::EmptyCity),
            SearchError::from(FetchError::Network("refused".into())),
            SearchError::from(FetchError::Parse("missing main.temp".into())),
            SearchError::from(FetchError::Internal("task died".into())),
        ];
        let kinds: Vec<_> = errors.iter().map(SearchError::kind).collect();

        assert_eq!(
            kinds,
            [ErrorKind::Validation, ErrorKind::Network, ErrorKind::Parse, ErrorKind::Internal]
        );
        assert!(errors.iter().all(|e| !e.user_message().is_empty()));
    }
}
