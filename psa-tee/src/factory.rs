//! # Sessions

use std::collections::HashMap;

use tee_crypto::TeeCrypto;

use crate::error::Error;
use crate::operation::Session;
use crate::session::SessionContext;

/// Identifier of an open session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(u32);

impl SessionId {
    /// Raw identifier value
    pub fn value(self) -> u32 {
        self.0
    }
}

/// Session table owning the native engine
///
/// Every session has its own context, one session can not reach the
/// handles of another. Dropping the table closes all open sessions.
pub struct Sessions<E: TeeCrypto> {
    engine: E,
    contexts: HashMap<SessionId, SessionContext>,
    next_id: u32,
}

impl<E: TeeCrypto> Sessions<E> {
    /// Create an empty session table for `engine`
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            contexts: HashMap::new(),
            next_id: 1,
        }
    }

    /// The native engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Number of open sessions
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    /// Check if no session is open
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// Open a new session without operation or key
    pub fn open(&mut self) -> SessionId {
        let mut id = SessionId(self.next_id);
        while self.contexts.contains_key(&id) {
            self.next_id = self.next_id.wrapping_add(1).max(1);
            id = SessionId(self.next_id);
        }
        self.next_id = self.next_id.wrapping_add(1).max(1);
        self.contexts.insert(id, SessionContext::new());
        log::info!("Opened session {}", id.0);
        id
    }

    /// Access an open session
    pub fn session(&mut self, id: SessionId) -> Result<Session<'_, E>, Error> {
        let context = self.contexts.get_mut(&id).ok_or(Error::UnknownSession)?;
        Ok(Session::new(&mut self.engine, context))
    }

    /// Close a session, releasing its operation and key
    pub fn close(&mut self, id: SessionId) -> Result<(), Error> {
        let mut context = self.contexts.remove(&id).ok_or(Error::UnknownSession)?;
        context.release(&mut self.engine);
        log::info!("Closed session {}", id.0);
        Ok(())
    }
}

impl<E: TeeCrypto> Drop for Sessions<E> {
    fn drop(&mut self) {
        for (_, mut context) in self.contexts.drain() {
            context.release(&mut self.engine);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::Algorithm;
    use tee_crypto_rust_crypto::RustCryptoBackend;

    #[test]
    fn open_and_close() {
        let mut sessions = Sessions::new(RustCryptoBackend::default());
        assert!(sessions.is_empty());
        let first = sessions.open();
        let second = sessions.open();
        assert_ne!(first, second);
        assert_eq!(sessions.len(), 2);
        {
            let session = sessions.session(first).unwrap();
            assert!(session.context().is_idle());
            assert_eq!(session.context().key_handle(), None);
        }
        assert_eq!(sessions.close(first), Ok(()));
        assert_eq!(sessions.close(first), Err(Error::UnknownSession));
        assert!(sessions.session(first).is_err());
        assert!(sessions.session(second).is_ok());
        assert_eq!(sessions.len(), 1);
    }

    #[test]
    fn close_releases_handles() {
        let mut sessions = Sessions::new(RustCryptoBackend::default());
        let id = sessions.open();
        {
            let mut session = sessions.session(id).unwrap();
            session.generate_key(128, Algorithm::Ctr).unwrap();
            session.hash_setup(Algorithm::Sha256).unwrap();
        }
        assert_eq!(sessions.engine().operation_count(), 1);
        assert_eq!(sessions.engine().object_count(), 1);
        sessions.close(id).unwrap();
        assert_eq!(sessions.engine().operation_count(), 0);
        assert_eq!(sessions.engine().object_count(), 0);
    }

    #[test]
    fn sessions_are_isolated() {
        let mut sessions = Sessions::new(RustCryptoBackend::default());
        let first = sessions.open();
        let second = sessions.open();
        let key = {
            let mut session = sessions.session(first).unwrap();
            session.generate_key(128, Algorithm::CbcNoPadding).unwrap();
            session.context().key_handle().unwrap()
        };
        let mut session = sessions.session(second).unwrap();
        assert_eq!(
            session.cipher_encrypt_setup(key, Algorithm::CbcNoPadding, &[0u8; 16]),
            Err(Error::KeyBinding)
        );
        assert!(session.context().is_idle());
    }
}
