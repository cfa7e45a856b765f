//! # Errors

use core::convert::From;
use core::fmt;

/// PSA status codes
pub mod status {
    /// Generic error
    pub const GENERIC_ERROR: i32 = -132;
    /// The requested operation or parameter is not supported
    pub const NOT_SUPPORTED: i32 = -134;
    /// Invalid parameters passed to the function
    pub const INVALID_ARGUMENT: i32 = -135;
    /// The session or key handle is not valid
    pub const INVALID_HANDLE: i32 = -136;
    /// The call is not permitted in the current state
    pub const BAD_STATE: i32 = -137;
    /// The output buffer is too small
    pub const BUFFER_TOO_SMALL: i32 = -138;
    /// There is not enough runtime memory
    pub const INSUFFICIENT_MEMORY: i32 = -141;
}

/// Errors
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The algorithm identifier has no native counterpart
    UnsupportedAlgorithm,
    /// No key sizes are known for the key type
    UnsupportedKeyType,
    /// The key cannot be bound to the operation
    KeyBinding,
    /// The call is out of protocol order
    BadState,
    /// The output buffer is too small
    ShortBuffer,
    /// The native engine failed
    NativeFailure(tee_crypto::Error),
    /// The native engine ran out of resources
    ResourceExhausted,
    /// No session with the identifier
    UnknownSession,
}

impl Error {
    /// The PSA status code of the error
    pub fn status(self) -> i32 {
        match self {
            Error::UnsupportedAlgorithm | Error::UnsupportedKeyType => status::NOT_SUPPORTED,
            Error::KeyBinding => status::INVALID_ARGUMENT,
            Error::BadState => status::BAD_STATE,
            Error::ShortBuffer => status::BUFFER_TOO_SMALL,
            Error::NativeFailure(_) => status::GENERIC_ERROR,
            Error::ResourceExhausted => status::INSUFFICIENT_MEMORY,
            Error::UnknownSession => status::INVALID_HANDLE,
        }
    }
}

impl From<tee_crypto::Error> for Error {
    fn from(error: tee_crypto::Error) -> Self {
        match error {
            tee_crypto::Error::ShortBuffer => Self::ShortBuffer,
            tee_crypto::Error::OutOfMemory => Self::ResourceExhausted,
            e => Self::NativeFailure(e),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnsupportedAlgorithm => f.write_str("unsupported algorithm"),
            Error::UnsupportedKeyType => f.write_str("unsupported key type"),
            Error::KeyBinding => f.write_str("key cannot be bound to the operation"),
            Error::BadState => f.write_str("bad state"),
            Error::ShortBuffer => f.write_str("buffer too small"),
            Error::NativeFailure(e) => write!(f, "native failure, {}", e),
            Error::ResourceExhausted => f.write_str("out of resources"),
            Error::UnknownSession => f.write_str("unknown session"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_errors() {
        assert_eq!(
            Error::from(tee_crypto::Error::ShortBuffer),
            Error::ShortBuffer
        );
        assert_eq!(
            Error::from(tee_crypto::Error::OutOfMemory),
            Error::ResourceExhausted
        );
        assert_eq!(
            Error::from(tee_crypto::Error::BadParameters),
            Error::NativeFailure(tee_crypto::Error::BadParameters)
        );
        assert_eq!(
            Error::from(tee_crypto::Error::Other(0x8000_0001)),
            Error::NativeFailure(tee_crypto::Error::Other(0x8000_0001))
        );
    }

    #[test]
    fn errors_are_comparable() {
        fn assert_eq_impl<T: Eq>() {}
        assert_eq_impl::<Error>();
        assert_eq_impl::<tee_crypto::Error>();
        assert_ne!(
            Error::NativeFailure(tee_crypto::Error::Other(1)),
            Error::NativeFailure(tee_crypto::Error::Other(2))
        );
    }

    #[test]
    fn status_codes() {
        assert_eq!(Error::UnsupportedAlgorithm.status(), -134);
        assert_eq!(Error::BadState.status(), -137);
        assert_eq!(Error::ShortBuffer.status(), -138);
        assert_eq!(Error::ResourceExhausted.status(), -141);
        assert_eq!(
            Error::NativeFailure(tee_crypto::Error::Generic).status(),
            -132
        );
    }
}
