//! Helper module with the background probe's error kinds.
//!
//! Formatting never surfaces these: malformed markup degrades to literal
//! output. Only the probe has true failure paths, and all of them collapse
//! to [`ColorScheme::Unknown`](crate::ColorScheme::Unknown) at the public
//! boundary. The kinds exist so the internals can say precisely what went
//! wrong while parsing a terminal reply.

/// The enumeration of probe error kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ErrorKind {
    /// The terminal never answered the color query.
    NoReply,
    /// The reply does not contain an `rgb:` color specification.
    BadReply,
    /// Fewer than three color components.
    TooFewComponents,
    /// More than three color components.
    TooManyComponents,
    /// An empty color component.
    EmptyComponent,
    /// A component with more than four hexadecimal digits.
    OversizedComponent,
    /// A component that does not start with a hexadecimal digit.
    MalformedComponent,
}

impl ErrorKind {
    /// Turn the error kind into an error message.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoReply => "terminal did not answer the background query",
            Self::BadReply => "terminal reply has no rgb: specification",
            Self::TooFewComponents => "too few color components",
            Self::TooManyComponents => "too many color components",
            Self::EmptyComponent => "empty color component",
            Self::OversizedComponent => "oversized color component",
            Self::MalformedComponent => "malformed color component",
        }
    }
}

impl From<ErrorKind> for std::io::Error {
    fn from(value: ErrorKind) -> Self {
        match value {
            ErrorKind::NoReply => std::io::ErrorKind::TimedOut.into(),
            _ => Self::new(std::io::ErrorKind::InvalidData, value.as_str()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::ErrorKind;

    #[test]
    fn test_conversion() {
        let error = std::io::Error::from(ErrorKind::NoReply);
        assert_eq!(error.kind(), std::io::ErrorKind::TimedOut);

        let error = std::io::Error::from(ErrorKind::EmptyComponent);
        assert_eq!(error.kind(), std::io::ErrorKind::InvalidData);
        assert_eq!(error.to_string(), "empty color component");
    }
}
