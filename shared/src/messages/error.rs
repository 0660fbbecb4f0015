use mirror_serde::SerdeErr;
use thiserror::Error;

/// Failure to decode a received command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Could not read the command tag: {source}")]
    UnreadableTag {
        #[source]
        source: SerdeErr,
    },

    #[error("Unknown command tag {tag:?}")]
    UnknownTag { tag: String },

    #[error("Malformed {tag} command: {source}")]
    Malformed {
        tag: &'static str,
        #[source]
        source: SerdeErr,
    },
}
