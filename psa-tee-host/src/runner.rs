use psa_tee::{Algorithm, Error, KeySizeOutcome, SessionId, Sessions, MAX_DIGEST_SIZE};
use tee_crypto::TeeCrypto;

pub fn to_hex(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02x}", b)).collect()
}

pub fn from_hex(text: &str) -> Option<Vec<u8>> {
    let text = text.trim();
    if text.len() % 2 != 0 {
        return None;
    }
    (0..text.len())
        .step_by(2)
        .map(|n| u8::from_str_radix(text.get(n..n + 2)?, 16).ok())
        .collect()
}

pub struct Settings {
    pub chunk_size: usize,
    pub key_bits: u32,
    pub iv: Vec<u8>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            chunk_size: 64,
            key_bits: 0,
            iv: vec![0u8; 16],
        }
    }
}

pub struct Encrypted {
    pub cipher_text: Vec<u8>,
    pub round_trip: bool,
}

/// Runs crypto flows on one session
pub struct Runner<E: TeeCrypto> {
    sessions: Sessions<E>,
    id: SessionId,
    settings: Settings,
}

impl<E: TeeCrypto> Runner<E> {
    pub fn new(engine: E, settings: Settings) -> Self {
        let mut sessions = Sessions::new(engine);
        let id = sessions.open();
        Runner {
            sessions,
            id,
            settings,
        }
    }

    fn chunk_size(&self) -> usize {
        self.settings.chunk_size.max(1)
    }

    pub fn hash(&mut self, algorithm: Algorithm, data: &[u8]) -> Result<Vec<u8>, Error> {
        let chunk_size = self.chunk_size();
        let mut session = self.sessions.session(self.id)?;
        session.hash_setup(algorithm)?;
        for chunk in data.chunks(chunk_size) {
            session.hash_update(chunk)?;
        }
        let mut hash = [0u8; MAX_DIGEST_SIZE];
        let size = session.hash_finish(&mut hash)?;
        Ok(hash[..size].to_vec())
    }

    pub fn keygen(&mut self, algorithm: Algorithm, bits: u32) -> Result<KeySizeOutcome, Error> {
        let mut session = self.sessions.session(self.id)?;
        session.generate_key(bits, algorithm)
    }

    pub fn encrypt(&mut self, algorithm: Algorithm, data: &[u8]) -> Result<Encrypted, Error> {
        let chunk_size = self.chunk_size();
        let key_bits = self.settings.key_bits;
        let iv = self.settings.iv.clone();
        let mut session = self.sessions.session(self.id)?;
        session.generate_key(key_bits, algorithm)?;
        let key = session.context().key_handle().ok_or(Error::KeyBinding)?;

        let mut cipher_text = vec![0u8; data.len() + psa_tee::MAX_BLOCK_SIZE];
        session.cipher_encrypt_setup(key, algorithm, &iv)?;
        let mut written = 0;
        for chunk in data.chunks(chunk_size) {
            written += session.cipher_update(chunk, &mut cipher_text[written..])?;
        }
        written += session.cipher_finish(&mut cipher_text[written..])?;
        cipher_text.truncate(written);

        let mut plain_text = vec![0u8; cipher_text.len() + psa_tee::MAX_BLOCK_SIZE];
        session.cipher_decrypt_setup(key, algorithm, &iv)?;
        let mut written = 0;
        for chunk in cipher_text.chunks(chunk_size) {
            written += session.cipher_update(chunk, &mut plain_text[written..])?;
        }
        written += session.cipher_finish(&mut plain_text[written..])?;

        Ok(Encrypted {
            round_trip: &plain_text[..written] == data,
            cipher_text,
        })
    }

    pub fn mac(&mut self, algorithm: Algorithm, data: &[u8]) -> Result<Vec<u8>, Error> {
        let chunk_size = self.chunk_size();
        let key_bits = self.settings.key_bits;
        let mut session = self.sessions.session(self.id)?;
        session.generate_key(key_bits, algorithm)?;
        let key = session.context().key_handle().ok_or(Error::KeyBinding)?;
        session.mac_sign_setup(algorithm, key)?;
        for chunk in data.chunks(chunk_size) {
            session.mac_update(chunk)?;
        }
        let mut mac = [0u8; MAX_DIGEST_SIZE];
        let size = session.mac_sign_finish(&mut mac)?;
        Ok(mac[..size].to_vec())
    }

    pub fn random(&mut self, size: usize) -> Result<Vec<u8>, Error> {
        let mut session = self.sessions.session(self.id)?;
        let mut buffer = vec![0u8; size];
        session.generate_random(&mut buffer)?;
        Ok(buffer)
    }
}
