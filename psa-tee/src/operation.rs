//! # Operation lifecycle
//!
//! Digest, cipher and MAC operations follow a setup, update and finish
//! protocol. Setup allocates a native operation and binds it to the
//! session, finish releases it on every path. A setup while another
//! operation is live releases the earlier operation first.

use tee_crypto::{AlgorithmClass, ObjectHandle, OperationMode, TeeCrypto};

use crate::algorithm::{native_type_for_algorithm, translate_algorithm, Algorithm};
use crate::error::Error;
use crate::key_size::{validate_key_size, KeySizeOutcome};
use crate::session::{OperationKind, SessionContext};

fn native_failure(what: &str, error: tee_crypto::Error) -> Error {
    log::error!("{} failed, {}", what, error);
    Error::from(error)
}

/// Crypto session
///
/// Borrows the context of one session together with the native engine.
pub struct Session<'a, E: TeeCrypto> {
    engine: &'a mut E,
    context: &'a mut SessionContext,
}

impl<'a, E: TeeCrypto> Session<'a, E> {
    pub(crate) fn new(engine: &'a mut E, context: &'a mut SessionContext) -> Self {
        Self { engine, context }
    }

    /// State of the session
    pub fn context(&self) -> &SessionContext {
        self.context
    }

    fn release_operation(&mut self) {
        if let Some((handle, kind)) = self.context.take_operation() {
            self.engine.free_operation(handle);
            log::info!("Released {:?} operation", kind);
        }
    }

    /// Release an operation that a new setup replaces
    fn displace_operation(&mut self) {
        if let Some(kind) = self.context.active_operation() {
            log::warn!("Setup replaces a live {:?} operation", kind);
            self.release_operation();
        }
    }

    /// The session key, if it is `key` and fits `algorithm`
    fn session_key(
        &self,
        key: ObjectHandle,
        algorithm: tee_crypto::Algorithm,
    ) -> Result<ObjectHandle, Error> {
        let required = native_type_for_algorithm(algorithm)?;
        if self.context.key_handle() != Some(key) {
            log::warn!("Key is not the session key");
            return Err(Error::KeyBinding);
        }
        if self.context.key_type() != Some(required) {
            log::warn!("Session key does not fit {:?}", algorithm);
            return Err(Error::KeyBinding);
        }
        Ok(key)
    }

    /// Release the live operation, if any
    pub fn abort(&mut self) {
        self.release_operation();
    }

    /// Start a streaming digest
    pub fn hash_setup(&mut self, algorithm: Algorithm) -> Result<(), Error> {
        let native = translate_algorithm(algorithm)?;
        if native.class() != AlgorithmClass::Digest {
            return Err(Error::UnsupportedAlgorithm);
        }
        self.displace_operation();
        let handle = self
            .engine
            .allocate_operation(native, OperationMode::Digest, 0)
            .map_err(|e| native_failure("Allocate digest operation", e))?;
        self.context
            .bind_operation(handle, OperationKind::Digest, native, OperationMode::Digest);
        log::info!("Digest {} started", algorithm);
        Ok(())
    }

    /// Feed data to the digest
    pub fn hash_update(&mut self, input: &[u8]) -> Result<(), Error> {
        let handle = self.context.operation(OperationKind::Digest)?;
        if let Err(e) = self.engine.digest_update(handle, input) {
            self.release_operation();
            return Err(native_failure("Digest update", e));
        }
        Ok(())
    }

    /// Finish the digest, writing it to `hash`
    ///
    /// Returns the length of the digest. The operation is released even
    /// when finishing fails.
    pub fn hash_finish(&mut self, hash: &mut [u8]) -> Result<usize, Error> {
        let handle = self.context.operation(OperationKind::Digest)?;
        let result = self.engine.digest_do_final(handle, &[], hash);
        self.release_operation();
        result.map_err(|e| native_failure("Digest final", e))
    }

    /// Digest `input` in one go, without touching the live operation
    pub fn hash_compute(
        &mut self,
        algorithm: Algorithm,
        input: &[u8],
        hash: &mut [u8],
    ) -> Result<usize, Error> {
        let native = translate_algorithm(algorithm)?;
        if native.class() != AlgorithmClass::Digest {
            return Err(Error::UnsupportedAlgorithm);
        }
        let handle = self
            .engine
            .allocate_operation(native, OperationMode::Digest, 0)
            .map_err(|e| native_failure("Allocate digest operation", e))?;
        let result = self.engine.digest_do_final(handle, input, hash);
        self.engine.free_operation(handle);
        result.map_err(|e| native_failure("Digest", e))
    }

    fn cipher_setup(
        &mut self,
        key: ObjectHandle,
        algorithm: Algorithm,
        iv: &[u8],
        mode: OperationMode,
    ) -> Result<(), Error> {
        let native = translate_algorithm(algorithm)?;
        if native.class() != AlgorithmClass::Cipher {
            return Err(Error::UnsupportedAlgorithm);
        }
        let key = self.session_key(key, native)?;
        self.displace_operation();
        let handle = self
            .engine
            .allocate_operation(native, mode, self.context.key_size())
            .map_err(|e| native_failure("Allocate cipher operation", e))?;
        let bound = self
            .engine
            .set_operation_key(handle, key)
            .map_err(|e| {
                log::error!("Set operation key failed, {}", e);
                Error::KeyBinding
            })
            .and_then(|()| {
                self.engine
                    .cipher_init(handle, iv)
                    .map_err(|e| native_failure("Cipher init", e))
            });
        if let Err(e) = bound {
            self.engine.free_operation(handle);
            return Err(e);
        }
        self.context
            .bind_operation(handle, OperationKind::Cipher, native, mode);
        log::info!("Cipher {} {:?} started", algorithm, mode);
        Ok(())
    }

    /// Start encrypting with the session key `key`
    pub fn cipher_encrypt_setup(
        &mut self,
        key: ObjectHandle,
        algorithm: Algorithm,
        iv: &[u8],
    ) -> Result<(), Error> {
        self.cipher_setup(key, algorithm, iv, OperationMode::Encrypt)
    }

    /// Start decrypting with the session key `key`
    pub fn cipher_decrypt_setup(
        &mut self,
        key: ObjectHandle,
        algorithm: Algorithm,
        iv: &[u8],
    ) -> Result<(), Error> {
        self.cipher_setup(key, algorithm, iv, OperationMode::Decrypt)
    }

    /// Process `input`, returns the number of octets written to `output`
    ///
    /// A too small `output` keeps the operation live so that the call
    /// can be retried.
    pub fn cipher_update(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, Error> {
        let handle = self.context.operation(OperationKind::Cipher)?;
        match self.engine.cipher_update(handle, input, output) {
            Ok(size) => Ok(size),
            Err(tee_crypto::Error::ShortBuffer) => Err(Error::ShortBuffer),
            Err(e) => {
                self.release_operation();
                Err(native_failure("Cipher update", e))
            }
        }
    }

    /// Finish the cipher, returns the number of octets written to `output`
    pub fn cipher_finish(&mut self, output: &mut [u8]) -> Result<usize, Error> {
        let handle = self.context.operation(OperationKind::Cipher)?;
        let result = self.engine.cipher_do_final(handle, &[], output);
        self.release_operation();
        result.map_err(|e| native_failure("Cipher final", e))
    }

    /// Start computing a MAC with the session key `key`
    pub fn mac_sign_setup(&mut self, algorithm: Algorithm, key: ObjectHandle) -> Result<(), Error> {
        let native = translate_algorithm(algorithm)?;
        if native.class() != AlgorithmClass::Mac {
            return Err(Error::UnsupportedAlgorithm);
        }
        let key = self.session_key(key, native)?;
        self.displace_operation();
        let handle = self
            .engine
            .allocate_operation(native, OperationMode::Mac, self.context.key_size())
            .map_err(|e| native_failure("Allocate MAC operation", e))?;
        let bound = self
            .engine
            .set_operation_key(handle, key)
            .map_err(|e| {
                log::error!("Set operation key failed, {}", e);
                Error::KeyBinding
            })
            .and_then(|()| {
                self.engine
                    .mac_init(handle, &[])
                    .map_err(|e| native_failure("MAC init", e))
            });
        if let Err(e) = bound {
            self.engine.free_operation(handle);
            return Err(e);
        }
        self.context
            .bind_operation(handle, OperationKind::Mac, native, OperationMode::Mac);
        log::info!("MAC {} started", algorithm);
        Ok(())
    }

    /// Feed data to the MAC
    pub fn mac_update(&mut self, input: &[u8]) -> Result<(), Error> {
        let handle = self.context.operation(OperationKind::Mac)?;
        if let Err(e) = self.engine.mac_update(handle, input) {
            self.release_operation();
            return Err(native_failure("MAC update", e));
        }
        Ok(())
    }

    /// Finish the MAC, writing it to `mac`
    ///
    /// Returns the length reported by the engine.
    pub fn mac_sign_finish(&mut self, mac: &mut [u8]) -> Result<usize, Error> {
        let handle = self.context.operation(OperationKind::Mac)?;
        let result = self.engine.mac_compute_final(handle, &[], mac);
        self.release_operation();
        result.map_err(|e| native_failure("MAC final", e))
    }

    /// Generate a new session key for `algorithm`
    ///
    /// A zero or invalid `key_bits` is replaced with the default size of
    /// the key type, which the returned outcome reports. The previous
    /// session key is released once the new key exists.
    pub fn generate_key(
        &mut self,
        key_bits: u32,
        algorithm: Algorithm,
    ) -> Result<KeySizeOutcome, Error> {
        let native = translate_algorithm(algorithm)?;
        let object_type = native_type_for_algorithm(native)?;
        let outcome = validate_key_size(object_type, key_bits);
        let bits = match outcome {
            KeySizeOutcome::Valid(bits) => bits,
            KeySizeOutcome::Corrected(bits) => {
                log::warn!(
                    "Key size {} is not valid for {:?}, using {}",
                    key_bits,
                    object_type,
                    bits
                );
                bits
            }
            KeySizeOutcome::Rejected => return Err(Error::UnsupportedKeyType),
        };
        let object = self
            .engine
            .allocate_transient_object(object_type, bits)
            .map_err(|e| native_failure("Allocate transient object", e))?;
        if let Err(e) = self.engine.generate_key(object, bits) {
            self.engine.free_transient_object(object);
            return Err(native_failure("Generate key", e));
        }
        if let Some(previous) = self.context.replace_key(object, object_type, bits) {
            self.engine.free_transient_object(previous);
        }
        log::info!("Generated {} bit {:?} key", bits, object_type);
        Ok(outcome)
    }

    /// Fill `buffer` with random octets
    pub fn generate_random(&mut self, buffer: &mut [u8]) -> Result<(), Error> {
        self.engine.generate_random(buffer);
        Ok(())
    }
}
