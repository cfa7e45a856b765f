#![warn(missing_docs)]

//! PSA crypto API on top of the internal crypto engine of a trusted
//! execution environment
//!
//! PSA algorithm identifiers are translated to the native identifiers of
//! the engine, key sizes are validated per key type, and the native
//! operation and key object handles of each session are managed across
//! setup, update and finish calls.

#[macro_use]
mod utils;

pub mod algorithm;
pub mod error;
pub mod factory;
pub mod key_size;
pub mod operation;
pub mod session;

pub use algorithm::{abstract_algorithm, native_type_for_algorithm, translate_algorithm, Algorithm};
pub use error::Error;
pub use factory::{SessionId, Sessions};
pub use key_size::{default_key_size, validate_key_size, KeySizeOutcome};
pub use operation::Session;
pub use session::{OperationKind, SessionContext};

pub use tee_crypto::{MAX_BLOCK_SIZE, MAX_DIGEST_SIZE};
