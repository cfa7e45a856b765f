#![no_std]
#![warn(missing_docs)]

//! Traits for the internal crypto engine of a trusted execution environment
//!
//! The engine hands out opaque operation and object handles and is driven
//! through explicit operation modes, following the GlobalPlatform TEE
//! internal core API.

#[macro_use]
mod utils;

mod algorithm;

pub use algorithm::{Algorithm, AlgorithmClass, ObjectType, OperationMode};

/// Largest digest produced by any supported algorithm, in octets
pub const MAX_DIGEST_SIZE: usize = 64;
/// Largest cipher block of any supported algorithm, in octets
pub const MAX_BLOCK_SIZE: usize = 16;

/// Engine error codes, see the `TEE_Result` values of the TEE internal core API
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Non-specific cause
    Generic,
    /// Access privileges are not sufficient
    AccessDenied,
    /// The operation was cancelled
    Cancel,
    /// Concurrent accesses caused conflict
    AccessConflict,
    /// Too much data for the requested operation was passed
    ExcessData,
    /// Input data was of invalid format
    BadFormat,
    /// Input parameters were invalid
    BadParameters,
    /// Operation is not valid in the current state
    BadState,
    /// The requested data item is not found
    ItemNotFound,
    /// The requested operation should exist but is not yet implemented
    NotImplemented,
    /// The requested operation is valid but is not supported
    NotSupported,
    /// Expected data was missing
    NoData,
    /// System ran out of resources
    OutOfMemory,
    /// The system is busy working on something else
    Busy,
    /// Communication with a remote party failed
    Communication,
    /// A security fault was detected
    Security,
    /// The supplied buffer is too short for the generated output
    ShortBuffer,
    /// Other error, probably a error code from the engine
    Other(u32),
}

impl Error {
    /// The numeric `TEE_Result` code of the error
    pub fn code(self) -> u32 {
        match self {
            Error::Generic => 0xffff_0000,
            Error::AccessDenied => 0xffff_0001,
            Error::Cancel => 0xffff_0002,
            Error::AccessConflict => 0xffff_0003,
            Error::ExcessData => 0xffff_0004,
            Error::BadFormat => 0xffff_0005,
            Error::BadParameters => 0xffff_0006,
            Error::BadState => 0xffff_0007,
            Error::ItemNotFound => 0xffff_0008,
            Error::NotImplemented => 0xffff_0009,
            Error::NotSupported => 0xffff_000a,
            Error::NoData => 0xffff_000b,
            Error::OutOfMemory => 0xffff_000c,
            Error::Busy => 0xffff_000d,
            Error::Communication => 0xffff_000e,
            Error::Security => 0xffff_000f,
            Error::ShortBuffer => 0xffff_0010,
            Error::Other(code) => code,
        }
    }
}

impl From<u32> for Error {
    fn from(code: u32) -> Self {
        match code {
            0xffff_0000 => Error::Generic,
            0xffff_0001 => Error::AccessDenied,
            0xffff_0002 => Error::Cancel,
            0xffff_0003 => Error::AccessConflict,
            0xffff_0004 => Error::ExcessData,
            0xffff_0005 => Error::BadFormat,
            0xffff_0006 => Error::BadParameters,
            0xffff_0007 => Error::BadState,
            0xffff_0008 => Error::ItemNotFound,
            0xffff_0009 => Error::NotImplemented,
            0xffff_000a => Error::NotSupported,
            0xffff_000b => Error::NoData,
            0xffff_000c => Error::OutOfMemory,
            0xffff_000d => Error::Busy,
            0xffff_000e => Error::Communication,
            0xffff_000f => Error::Security,
            0xffff_0010 => Error::ShortBuffer,
            other => Error::Other(other),
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?} (0x{:08x})", self, self.code())
    }
}

/// Opaque handle to an operation allocated by the engine
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct OperationHandle(u32);

impl OperationHandle {
    /// Wrap a raw engine value
    pub const fn from_raw(value: u32) -> Self {
        Self(value)
    }
    /// The raw engine value
    pub const fn into_raw(self) -> u32 {
        self.0
    }
}

/// Opaque handle to a transient key object allocated by the engine
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectHandle(u32);

impl ObjectHandle {
    /// Wrap a raw engine value
    pub const fn from_raw(value: u32) -> Self {
        Self(value)
    }
    /// The raw engine value
    pub const fn into_raw(self) -> u32 {
        self.0
    }
}

/// Trait for implementing a TEE crypto engine
///
/// Handles are only meaningful to the engine that issued them.
pub trait TeeCrypto {
    /// Allocate an operation for `algorithm` in `mode`
    ///
    /// `max_key_size` is the largest key, in bits, the operation will accept.
    /// Digest operations ignore it.
    fn allocate_operation(
        &mut self,
        algorithm: Algorithm,
        mode: OperationMode,
        max_key_size: u32,
    ) -> Result<OperationHandle, Error>;
    /// Release an operation, unknown handles are ignored
    fn free_operation(&mut self, operation: OperationHandle);
    /// Return an operation to its initial state, the key is kept
    fn reset_operation(&mut self, operation: OperationHandle);
    /// Copy the key material of `key` into the operation
    fn set_operation_key(
        &mut self,
        operation: OperationHandle,
        key: ObjectHandle,
    ) -> Result<(), Error>;

    /// Start a cipher operation with the given IV
    fn cipher_init(&mut self, operation: OperationHandle, iv: &[u8]) -> Result<(), Error>;
    /// Process data, returns the number of octets written to `output`
    fn cipher_update(
        &mut self,
        operation: OperationHandle,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<usize, Error>;
    /// Process the last data and finish, returns the number of octets written to `output`
    fn cipher_do_final(
        &mut self,
        operation: OperationHandle,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<usize, Error>;

    /// Feed data into a digest operation
    fn digest_update(&mut self, operation: OperationHandle, chunk: &[u8]) -> Result<(), Error>;
    /// Feed the last data and write the digest, returns the digest length
    fn digest_do_final(
        &mut self,
        operation: OperationHandle,
        chunk: &[u8],
        hash: &mut [u8],
    ) -> Result<usize, Error>;

    /// Start a MAC operation
    fn mac_init(&mut self, operation: OperationHandle, iv: &[u8]) -> Result<(), Error>;
    /// Feed data into a MAC operation
    fn mac_update(&mut self, operation: OperationHandle, chunk: &[u8]) -> Result<(), Error>;
    /// Feed the last data and write the MAC, returns the MAC length
    fn mac_compute_final(
        &mut self,
        operation: OperationHandle,
        message: &[u8],
        mac: &mut [u8],
    ) -> Result<usize, Error>;

    /// Allocate an uninitialized transient object
    fn allocate_transient_object(
        &mut self,
        object_type: ObjectType,
        max_object_size: u32,
    ) -> Result<ObjectHandle, Error>;
    /// Release a transient object, unknown handles are ignored
    fn free_transient_object(&mut self, object: ObjectHandle);
    /// Generate a random key of `key_size` bits into the object
    fn generate_key(&mut self, object: ObjectHandle, key_size: u32) -> Result<(), Error>;

    /// Fill the buffer with random data
    fn generate_random(&mut self, buffer: &mut [u8]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes() {
        assert_eq!(Error::Generic.code(), 0xffff_0000);
        assert_eq!(Error::ShortBuffer.code(), 0xffff_0010);
        assert_eq!(Error::from(0xffff_000c), Error::OutOfMemory);
        assert_eq!(Error::from(0xffff_0006), Error::BadParameters);
        assert_eq!(Error::from(0x1234_5678), Error::Other(0x1234_5678));
        assert_eq!(Error::Other(0x1234_5678).code(), 0x1234_5678);
    }

    #[test]
    fn handles_are_opaque_values() {
        let operation = OperationHandle::from_raw(7);
        assert_eq!(operation.into_raw(), 7);
        let object = ObjectHandle::from_raw(9);
        assert_eq!(object.into_raw(), 9);
    }
}
