//! # Session context

use tee_crypto::{Algorithm, ObjectHandle, ObjectType, OperationHandle, OperationMode, TeeCrypto};

use crate::error::Error;

/// Operation family owning the live operation handle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationKind {
    /// Message digest
    Digest,
    /// Symmetric cipher
    Cipher,
    /// Message authentication code
    Mac,
}

/// Generated key of a session
#[derive(Clone, Copy, Debug, PartialEq)]
struct SessionKey {
    handle: ObjectHandle,
    object_type: ObjectType,
}

/// State of one logical session
///
/// Holds at most one live operation handle, bound between a setup and
/// the matching finish, and at most one key object, kept until replaced
/// or until the session is closed.
#[derive(Debug, Default)]
pub struct SessionContext {
    algorithm: Option<Algorithm>,
    mode: Option<OperationMode>,
    key_size: u32,
    operation: Option<(OperationHandle, OperationKind)>,
    key: Option<SessionKey>,
}

impl SessionContext {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Native algorithm of the most recent setup
    pub fn algorithm(&self) -> Option<Algorithm> {
        self.algorithm
    }

    /// Native mode of the most recent setup
    pub fn mode(&self) -> Option<OperationMode> {
        self.mode
    }

    /// Size of the session key in bits, zero without a key
    pub fn key_size(&self) -> u32 {
        self.key_size
    }

    /// Handle of the session key
    pub fn key_handle(&self) -> Option<ObjectHandle> {
        self.key.map(|k| k.handle)
    }

    /// Type of the session key
    pub fn key_type(&self) -> Option<ObjectType> {
        self.key.map(|k| k.object_type)
    }

    /// Family of the live operation
    pub fn active_operation(&self) -> Option<OperationKind> {
        self.operation.map(|(_, kind)| kind)
    }

    /// Check that no operation is live
    pub fn is_idle(&self) -> bool {
        self.operation.is_none()
    }

    pub(crate) fn bind_operation(
        &mut self,
        handle: OperationHandle,
        kind: OperationKind,
        algorithm: Algorithm,
        mode: OperationMode,
    ) {
        self.operation = Some((handle, kind));
        self.algorithm = Some(algorithm);
        self.mode = Some(mode);
    }

    /// Handle of the live operation, if it belongs to `kind`
    pub(crate) fn operation(&self, kind: OperationKind) -> Result<OperationHandle, Error> {
        match self.operation {
            Some((handle, k)) if k == kind => Ok(handle),
            _ => Err(Error::BadState),
        }
    }

    pub(crate) fn take_operation(&mut self) -> Option<(OperationHandle, OperationKind)> {
        self.operation.take()
    }

    /// Store a new key, returns the key it replaces
    pub(crate) fn replace_key(
        &mut self,
        handle: ObjectHandle,
        object_type: ObjectType,
        bits: u32,
    ) -> Option<ObjectHandle> {
        let previous = self.key.replace(SessionKey {
            handle,
            object_type,
        });
        self.key_size = bits;
        previous.map(|k| k.handle)
    }

    /// Release both native handles
    pub(crate) fn release<E: TeeCrypto>(&mut self, engine: &mut E) {
        if let Some((handle, _)) = self.operation.take() {
            engine.free_operation(handle);
        }
        if let Some(key) = self.key.take() {
            engine.free_transient_object(key.handle);
        }
        self.key_size = 0;
    }
}
