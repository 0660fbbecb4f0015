use thiserror::Error;

/// Errors that can occur while decoding a byte stream
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// The stream ended before a value could be fully read
    #[error("Unexpected end of stream: needed {needed} bytes but only {remaining} remain")]
    UnexpectedEnd { needed: usize, remaining: usize },

    /// A value was read but is outside the range allowed for its type
    #[error("Invalid value {value} for {type_name}")]
    InvalidValue { type_name: &'static str, value: u64 },

    /// A variable-length integer kept its continuation bit set for too long
    #[error("Variable-length integer exceeds {max_bytes} bytes")]
    VariableIntegerOverflow { max_bytes: usize },

    /// A length-prefixed string did not contain valid UTF-8
    #[error("String of {length} bytes is not valid UTF-8")]
    InvalidUtf8 { length: usize },
}
