//! Unified error handling for lmsensors
//!
//! Every fallible operation in lmsensors reports one of three failure kinds:
//! the library could not be initialized, an operation on an already resolved
//! entity failed, or a lookup found nothing. Each kind carries a message, built
//! either from text or from a libsensors error number.

/// Result type alias using SensorsError
pub type Result<T> = std::result::Result<T, SensorsError>;

/// Failure kind, for callers that only care which class of error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Global state could not be established
    Init,
    /// Read, write or formatting against a resolved entity failed
    Io,
    /// A path or name matched no entity
    Parse,
}

/// Unified error type for all lmsensors operations
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SensorsError {
    #[error("sensors initialization failed: {0}")]
    Init(String),

    #[error("sensors I/O error: {0}")]
    Io(String),

    #[error("sensors lookup failed: {0}")]
    Parse(String),
}

impl SensorsError {
    /// Create an error of the given kind from a message
    pub fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        match kind {
            ErrorKind::Init => Self::Init(msg),
            ErrorKind::Io => Self::Io(msg),
            ErrorKind::Parse => Self::Parse(msg),
        }
    }

    /// Create an error from a native error number.
    ///
    /// `describe` is the error-to-string facility of whichever library
    /// produced the code.
    pub fn from_code(kind: ErrorKind, code: i32, describe: impl FnOnce(i32) -> String) -> Self {
        Self::new(kind, describe(code))
    }

    pub fn init(msg: impl Into<String>) -> Self {
        Self::Init(msg.into())
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Init(_) => ErrorKind::Init,
            Self::Io(_) => ErrorKind::Io,
            Self::Parse(_) => ErrorKind::Parse,
        }
    }

    /// The message without the kind prefix used by `Display`
    pub fn message(&self) -> &str {
        match self {
            Self::Init(msg) | Self::Io(msg) | Self::Parse(msg) => msg,
        }
    }
}

/// libsensors error numbers (`SENSORS_ERR_*`).
///
/// The library returns them negated; the sign carries no information.
pub mod code {
    pub const WILDCARDS: i32 = 1;
    pub const NO_ENTRY: i32 = 2;
    pub const ACCESS_R: i32 = 3;
    pub const KERNEL: i32 = 4;
    pub const DIV_ZERO: i32 = 5;
    pub const CHIP_NAME: i32 = 6;
    pub const BUS_NAME: i32 = 7;
    pub const PARSE: i32 = 8;
    pub const ACCESS_W: i32 = 9;
    pub const IO: i32 = 10;
    pub const RECURSION: i32 = 11;
}

const CODE_TEXT: [&str; 12] = [
    "Unknown error",
    "Wildcard found in chip name",
    "No such subfeature known",
    "Can't read",
    "Kernel interface error",
    "Divide by zero",
    "Can't parse chip name",
    "Can't parse bus name",
    "General parse error",
    "Can't write",
    "I/O error",
    "Evaluation recurses too deep",
];

/// Describe a libsensors error number the way `sensors_strerror` does
pub fn describe_code(code: i32) -> &'static str {
    let index = code.unsigned_abs() as usize;
    CODE_TEXT.get(index).copied().unwrap_or(CODE_TEXT[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(SensorsError::init("x").kind(), ErrorKind::Init);
        assert_eq!(SensorsError::io("x").kind(), ErrorKind::Io);
        assert_eq!(SensorsError::parse("x").kind(), ErrorKind::Parse);
        assert_eq!(SensorsError::new(ErrorKind::Io, "x"), SensorsError::io("x"));
    }

    #[test]
    fn test_message_and_display() {
        let err = SensorsError::parse("No chip found at /nowhere");
        assert_eq!(err.message(), "No chip found at /nowhere");
        assert_eq!(err.to_string(), "sensors lookup failed: No chip found at /nowhere");
    }

    #[test]
    fn test_from_code_uses_describer() {
        let err = SensorsError::from_code(ErrorKind::Io, -code::ACCESS_R, |c| {
            describe_code(c).to_string()
        });
        assert_eq!(err, SensorsError::Io("Can't read".into()));
    }

    #[test]
    fn test_describe_code_ignores_sign_and_range() {
        assert_eq!(describe_code(code::PARSE), "General parse error");
        assert_eq!(describe_code(-code::PARSE), "General parse error");
        assert_eq!(describe_code(0), "Unknown error");
        assert_eq!(describe_code(99), "Unknown error");
        assert_eq!(describe_code(i32::MIN), "Unknown error");
    }
}
