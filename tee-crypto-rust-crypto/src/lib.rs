//! Software implementation of the TEE crypto engine on top of RustCrypto

use std::collections::HashMap;

use digest::DynDigest;
use rand::{rngs::OsRng, RngCore};

use tee_crypto::{
    Algorithm, AlgorithmClass, Error, ObjectHandle, ObjectType, OperationHandle, OperationMode,
    TeeCrypto,
};

mod block;
mod hash;
mod mac;


use block::{BlockCipher, Chaining, CipherState, Direction};
use mac::MacState;

/// Default number of live operations and live transient objects
pub const DEFAULT_CAPACITY: usize = 64;

fn clear(slice: &mut [u8]) {
    for v in slice.iter_mut() {
        *v = 0;
    }
}

/// Key object type an algorithm requires
fn required_object_type(algorithm: Algorithm) -> Option<ObjectType> {
    match algorithm {
        Algorithm::AesEcbNoPad | Algorithm::AesCbcNoPad | Algorithm::AesCtr | Algorithm::AesCmac => {
            Some(ObjectType::Aes)
        }
        Algorithm::DesEcbNoPad | Algorithm::DesCbcNoPad => Some(ObjectType::Des),
        Algorithm::Des3EcbNoPad | Algorithm::Des3CbcNoPad => Some(ObjectType::Des3),
        Algorithm::HmacMd5 => Some(ObjectType::HmacMd5),
        Algorithm::HmacSha1 => Some(ObjectType::HmacSha1),
        Algorithm::HmacSha224 => Some(ObjectType::HmacSha224),
        Algorithm::HmacSha256 => Some(ObjectType::HmacSha256),
        Algorithm::HmacSha384 => Some(ObjectType::HmacSha384),
        Algorithm::HmacSha512 => Some(ObjectType::HmacSha512),
        _ => None,
    }
}

fn chaining(algorithm: Algorithm) -> Option<Chaining> {
    match algorithm {
        Algorithm::AesEcbNoPad | Algorithm::DesEcbNoPad | Algorithm::Des3EcbNoPad => {
            Some(Chaining::Ecb)
        }
        Algorithm::AesCbcNoPad | Algorithm::DesCbcNoPad | Algorithm::Des3CbcNoPad => {
            Some(Chaining::Cbc)
        }
        Algorithm::AesCtr => Some(Chaining::Ctr),
        _ => None,
    }
}

/// Check an object size, in bits, against the sizes the engine supports
fn object_size_supported(object_type: ObjectType, bits: u32) -> bool {
    let in_range = |min: u32, max: u32| bits >= min && bits <= max && bits % 8 == 0;
    match object_type {
        ObjectType::Aes => bits == 128 || bits == 192 || bits == 256,
        ObjectType::Des => bits == 64,
        ObjectType::Des3 => bits == 128 || bits == 192,
        ObjectType::HmacMd5 => in_range(64, 512),
        ObjectType::HmacSha1 => in_range(80, 512),
        ObjectType::HmacSha224 => in_range(112, 512),
        ObjectType::HmacSha256 => in_range(192, 1024),
        ObjectType::HmacSha384 | ObjectType::HmacSha512 => in_range(256, 1024),
        ObjectType::RsaPublicKey | ObjectType::RsaKeypair => {
            bits >= 256 && bits <= 4096 && bits % 64 == 0
        }
        ObjectType::GenericSecret => in_range(8, 4096),
    }
}

struct TransientObject {
    object_type: ObjectType,
    max_size: u32,
    key: Option<Vec<u8>>,
}

impl Drop for TransientObject {
    fn drop(&mut self) {
        if let Some(key) = self.key.as_mut() {
            clear(key);
        }
    }
}

enum State {
    /// Waiting for a key or for init
    Initial,
    Digest(Box<dyn DynDigest>),
    Cipher(CipherState),
    Mac(MacState),
}

struct Operation {
    algorithm: Algorithm,
    mode: OperationMode,
    max_key_size: u32,
    key: Option<(ObjectType, Vec<u8>)>,
    state: State,
}

impl Drop for Operation {
    fn drop(&mut self) {
        if let Some((_, key)) = self.key.as_mut() {
            clear(key);
        }
    }
}

/// TEE crypto engine implemented in software
pub struct RustCryptoBackend {
    operations: HashMap<u32, Operation>,
    objects: HashMap<u32, TransientObject>,
    max_operations: usize,
    max_objects: usize,
    next_handle: u32,
}

impl Default for RustCryptoBackend {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY, DEFAULT_CAPACITY)
    }
}

impl RustCryptoBackend {
    /// Create an engine holding at most `operations` live operations and
    /// `objects` live transient objects
    pub fn with_capacity(operations: usize, objects: usize) -> Self {
        Self {
            operations: HashMap::new(),
            objects: HashMap::new(),
            max_operations: operations,
            max_objects: objects,
            next_handle: 1,
        }
    }

    /// Number of live operations
    pub fn operation_count(&self) -> usize {
        self.operations.len()
    }

    /// Number of live transient objects
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    fn allocate_handle(&mut self) -> u32 {
        let handle = self.next_handle;
        self.next_handle = self.next_handle.wrapping_add(1).max(1);
        handle
    }

    fn operation(&mut self, operation: OperationHandle) -> Result<&mut Operation, Error> {
        self.operations
            .get_mut(&operation.into_raw())
            .ok_or(Error::BadParameters)
    }
}

impl TeeCrypto for RustCryptoBackend {
    fn allocate_operation(
        &mut self,
        algorithm: Algorithm,
        mode: OperationMode,
        max_key_size: u32,
    ) -> Result<OperationHandle, Error> {
        if !algorithm.supports_mode(mode) {
            return Err(Error::NotSupported);
        }
        let state = match algorithm.class() {
            AlgorithmClass::Digest => State::Digest(hash::new_digest(algorithm)?),
            AlgorithmClass::Cipher | AlgorithmClass::Mac => {
                let object_type = required_object_type(algorithm).ok_or(Error::NotSupported)?;
                if !object_size_supported(object_type, max_key_size) {
                    return Err(Error::NotSupported);
                }
                State::Initial
            }
            _ => return Err(Error::NotSupported),
        };
        if self.operations.len() >= self.max_operations {
            return Err(Error::OutOfMemory);
        }
        let handle = self.allocate_handle();
        self.operations.insert(
            handle,
            Operation {
                algorithm,
                mode,
                max_key_size,
                key: None,
                state,
            },
        );
        Ok(OperationHandle::from_raw(handle))
    }

    fn free_operation(&mut self, operation: OperationHandle) {
        self.operations.remove(&operation.into_raw());
    }

    fn reset_operation(&mut self, operation: OperationHandle) {
        if let Ok(op) = self.operation(operation) {
            match op.state {
                State::Digest(ref mut hasher) => hasher.reset(),
                _ => op.state = State::Initial,
            }
        }
    }

    fn set_operation_key(
        &mut self,
        operation: OperationHandle,
        key: ObjectHandle,
    ) -> Result<(), Error> {
        let (object_type, material) = {
            let object = self
                .objects
                .get(&key.into_raw())
                .ok_or(Error::BadParameters)?;
            let material = object.key.as_ref().ok_or(Error::BadParameters)?;
            (object.object_type, material.clone())
        };
        let op = self.operation(operation)?;
        let required = required_object_type(op.algorithm).ok_or(Error::BadParameters)?;
        let usable = object_type == required
            || (op.algorithm.class() == AlgorithmClass::Mac
                && object_type == ObjectType::GenericSecret
                && required != ObjectType::Aes);
        if !usable {
            return Err(Error::BadParameters);
        }
        if material.len() as u32 * 8 > op.max_key_size {
            return Err(Error::BadParameters);
        }
        op.key = Some((object_type, material));
        op.state = State::Initial;
        Ok(())
    }

    fn cipher_init(&mut self, operation: OperationHandle, iv: &[u8]) -> Result<(), Error> {
        let op = self.operation(operation)?;
        let chaining = chaining(op.algorithm).ok_or(Error::BadParameters)?;
        let direction = match op.mode {
            OperationMode::Encrypt => Direction::Encrypt,
            _ => Direction::Decrypt,
        };
        let (object_type, key) = op.key.as_ref().ok_or(Error::BadState)?;
        let cipher = BlockCipher::new(*object_type, key)?;
        op.state = State::Cipher(CipherState::new(cipher, chaining, direction, iv)?);
        Ok(())
    }

    fn cipher_update(
        &mut self,
        operation: OperationHandle,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<usize, Error> {
        match self.operation(operation)?.state {
            State::Cipher(ref mut cipher) => cipher.update(input, output),
            _ => Err(Error::BadState),
        }
    }

    fn cipher_do_final(
        &mut self,
        operation: OperationHandle,
        input: &[u8],
        output: &mut [u8],
    ) -> Result<usize, Error> {
        let op = self.operation(operation)?;
        let written = match op.state {
            State::Cipher(ref mut cipher) => cipher.finish(input, output)?,
            _ => return Err(Error::BadState),
        };
        op.state = State::Initial;
        Ok(written)
    }

    fn digest_update(&mut self, operation: OperationHandle, chunk: &[u8]) -> Result<(), Error> {
        match self.operation(operation)?.state {
            State::Digest(ref mut hasher) => {
                hasher.update(chunk);
                Ok(())
            }
            _ => Err(Error::BadParameters),
        }
    }

    fn digest_do_final(
        &mut self,
        operation: OperationHandle,
        chunk: &[u8],
        hash: &mut [u8],
    ) -> Result<usize, Error> {
        match self.operation(operation)?.state {
            State::Digest(ref mut hasher) => {
                if hash.len() < hasher.output_size() {
                    return Err(Error::ShortBuffer);
                }
                hasher.update(chunk);
                hash::finish_digest(&mut **hasher, hash)
            }
            _ => Err(Error::BadParameters),
        }
    }

    fn mac_init(&mut self, operation: OperationHandle, _iv: &[u8]) -> Result<(), Error> {
        let op = self.operation(operation)?;
        if op.algorithm.class() != AlgorithmClass::Mac {
            return Err(Error::BadParameters);
        }
        let (_, key) = op.key.as_ref().ok_or(Error::BadState)?;
        op.state = State::Mac(MacState::new(op.algorithm, key)?);
        Ok(())
    }

    fn mac_update(&mut self, operation: OperationHandle, chunk: &[u8]) -> Result<(), Error> {
        match self.operation(operation)?.state {
            State::Mac(ref mut mac) => {
                mac.update(chunk);
                Ok(())
            }
            _ => Err(Error::BadState),
        }
    }

    fn mac_compute_final(
        &mut self,
        operation: OperationHandle,
        message: &[u8],
        output: &mut [u8],
    ) -> Result<usize, Error> {
        let op = self.operation(operation)?;
        match op.state {
            State::Mac(ref mut mac) => {
                if output.len() < mac.output_size() {
                    return Err(Error::ShortBuffer);
                }
                mac.update(message);
            }
            _ => return Err(Error::BadState),
        }
        match std::mem::replace(&mut op.state, State::Initial) {
            State::Mac(mac) => Ok(mac.finalize(output)),
            _ => Err(Error::BadState),
        }
    }

    fn allocate_transient_object(
        &mut self,
        object_type: ObjectType,
        max_object_size: u32,
    ) -> Result<ObjectHandle, Error> {
        if !object_size_supported(object_type, max_object_size) {
            return Err(Error::NotSupported);
        }
        if self.objects.len() >= self.max_objects {
            return Err(Error::OutOfMemory);
        }
        let handle = self.allocate_handle();
        self.objects.insert(
            handle,
            TransientObject {
                object_type,
                max_size: max_object_size,
                key: None,
            },
        );
        Ok(ObjectHandle::from_raw(handle))
    }

    fn free_transient_object(&mut self, object: ObjectHandle) {
        self.objects.remove(&object.into_raw());
    }

    fn generate_key(&mut self, object: ObjectHandle, key_size: u32) -> Result<(), Error> {
        let object = self
            .objects
            .get_mut(&object.into_raw())
            .ok_or(Error::BadParameters)?;
        if object.key.is_some() {
            return Err(Error::BadState);
        }
        if key_size > object.max_size || !object_size_supported(object.object_type, key_size) {
            return Err(Error::BadParameters);
        }
        match object.object_type {
            ObjectType::RsaPublicKey | ObjectType::RsaKeypair => Err(Error::NotSupported),
            _ => {
                let mut key = vec![0u8; (key_size / 8) as usize];
                OsRng.fill_bytes(&mut key);
                object.key = Some(key);
                Ok(())
            }
        }
    }

    fn generate_random(&mut self, buffer: &mut [u8]) {
        OsRng.fill_bytes(buffer);
    }
}
