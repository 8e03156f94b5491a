use thiserror::Error;

/// An error that can occur when querying the feed or mapping its response.
#[derive(Error, Debug)]
pub enum Error {
    /// Impossible to reach the feed endpoint (connection refused, timeout, HTTP error status)
    #[error("impossible to reach the feed")]
    Fetch(#[from] reqwest::Error),
    /// The response body is not well-formed XML
    #[error("impossible to parse the feed response")]
    Xml(#[from] roxmltree::Error),
    /// The feed endpoint is not a valid url
    #[error("invalid feed url")]
    InvalidUrl(#[from] url::ParseError),
    /// A required attribute is absent from its element
    #[error("missing attribute '{attribute}' on <{element}>")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },
    /// An attribute is present but its text is not a valid number
    #[error("'{0}' is not a valid number")]
    InvalidNumber(String),
    /// An attribute is present but its text is not valid epoch milliseconds
    #[error("'{0}' is not a valid timestamp")]
    InvalidTimestamp(String),
    /// A tag referencing another object is not known
    #[error("the tag {0} is not known")]
    ReferenceError(String),
    /// An element the response structure guarantees is absent
    #[error("missing element <{0}> in the feed response")]
    MissingElement(&'static str),
}
