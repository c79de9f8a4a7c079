use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("Malformed percent-encoding at byte {offset} in {value:?}")]
    MalformedEscape { value: String, offset: usize },

    #[error("Percent-encoded value {value:?} is not valid UTF-8")]
    InvalidUtf8 { value: String },

    #[error("Index {index} out of range for list of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid standings: {0}")]
    InvalidStandings(String),

    #[error("Unknown conference {0:?}")]
    UnknownConference(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
