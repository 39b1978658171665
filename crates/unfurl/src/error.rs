//! Top-level error type for the unfurl library.

use thiserror::Error;

use unfurl_parser::ParseError;

/// Errors surfaced by the unfurl library boundary.
#[derive(Debug, Error)]
pub enum UnfurlError {
    /// An IO failure while reading diagram or module data.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The diagram text failed to parse. Carries the source text so
    /// callers can render labeled diagnostics against it.
    #[error("{err}")]
    Parse {
        err: ParseError,
        /// The text that failed to parse.
        src: String,
    },

    /// Module repository data was not valid JSON.
    #[error("invalid module data: {0}")]
    Repository(#[from] serde_json::Error),

    /// The render boundary rejected produced diagram text.
    #[error("render failed: {0}")]
    Render(String),
}

impl UnfurlError {
    /// Wraps a parse error together with the text it came from.
    pub fn parse(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unfurl_parser::Document;

    #[test]
    fn test_parse_error_keeps_source() {
        let src = "graph TD\nA[App --> B\n";
        let err = Document::parse(src).unwrap_err();
        let wrapped = UnfurlError::parse(err, src);
        match wrapped {
            UnfurlError::Parse { src: kept, .. } => assert_eq!(kept, src),
            other => panic!("unexpected variant: {other}"),
        }
    }
}
