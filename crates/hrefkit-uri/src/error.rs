//! URL error types

use thiserror::Error;

/// Broad class of a [`UriError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A component contains characters it may not contain
    Format,
    /// The operation is undefined for this kind of URL
    Structural,
    /// The caller passed an unusable argument
    Argument,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UriError {
    #[error("Scheme '{0}' contains characters other than [A-Z0-9.+-]")]
    InvalidScheme(String),

    #[error("Port '{0}' contains characters other than [0-9]")]
    InvalidPort(String),

    #[error("Hostname '{0}' contains characters other than [A-Z0-9.-]")]
    InvalidHostname(String),

    #[error("TLD '{0}' contains characters other than [A-Z0-9]")]
    InvalidTld(String),

    #[error("URNs do not have any generally defined hierarchical components ({0})")]
    Urn(&'static str),

    #[error("Cannot calculate common path from non-absolute paths")]
    RelativePath,

    #[error("Hostname is not a domain name")]
    NonDomainHost,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cannot convert to url::Url: {0}")]
    Conversion(#[from] url::ParseError),
}

impl UriError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UriError::InvalidScheme(_)
            | UriError::InvalidPort(_)
            | UriError::InvalidHostname(_)
            | UriError::InvalidTld(_)
            | UriError::Conversion(_) => ErrorKind::Format,
            UriError::Urn(_) | UriError::RelativePath | UriError::NonDomainHost => {
                ErrorKind::Structural
            }
            UriError::InvalidInput(_) => ErrorKind::Argument,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(UriError::InvalidPort("x".into()).kind(), ErrorKind::Format);
        assert_eq!(UriError::Urn("directory").kind(), ErrorKind::Structural);
        assert_eq!(UriError::RelativePath.kind(), ErrorKind::Structural);
        assert_eq!(
            UriError::InvalidInput("empty".into()).kind(),
            ErrorKind::Argument
        );
    }

    #[test]
    fn test_messages() {
        let err = UriError::InvalidHostname("exa mple.org".into());
        assert_eq!(
            err.to_string(),
            "Hostname 'exa mple.org' contains characters other than [A-Z0-9.-]"
        );
    }
}
