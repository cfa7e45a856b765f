use aes::{Aes128, Aes192, Aes256};
use cmac::Cmac;
use digest::KeyInit;
use hmac::{Hmac, Mac};
use md5::Md5;
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512};
use tee_crypto::{Algorithm, Error};

/// Keyed MAC state
pub enum MacState {
    HmacMd5(Hmac<Md5>),
    HmacSha1(Hmac<Sha1>),
    HmacSha224(Hmac<Sha224>),
    HmacSha256(Hmac<Sha256>),
    HmacSha384(Hmac<Sha384>),
    HmacSha512(Hmac<Sha512>),
    Aes128Cmac(Cmac<Aes128>),
    Aes192Cmac(Cmac<Aes192>),
    Aes256Cmac(Cmac<Aes256>),
}

fn keyed<M: Mac + KeyInit>(key: &[u8]) -> Result<M, Error> {
    <M as Mac>::new_from_slice(key).map_err(|_| Error::BadParameters)
}

macro_rules! with_mac {
    ($state:expr, $mac:ident => $body:expr) => {
        match $state {
            MacState::HmacMd5($mac) => $body,
            MacState::HmacSha1($mac) => $body,
            MacState::HmacSha224($mac) => $body,
            MacState::HmacSha256($mac) => $body,
            MacState::HmacSha384($mac) => $body,
            MacState::HmacSha512($mac) => $body,
            MacState::Aes128Cmac($mac) => $body,
            MacState::Aes192Cmac($mac) => $body,
            MacState::Aes256Cmac($mac) => $body,
        }
    };
}

impl MacState {
    pub fn new(algorithm: Algorithm, key: &[u8]) -> Result<Self, Error> {
        let state = match algorithm {
            Algorithm::HmacMd5 => MacState::HmacMd5(keyed(key)?),
            Algorithm::HmacSha1 => MacState::HmacSha1(keyed(key)?),
            Algorithm::HmacSha224 => MacState::HmacSha224(keyed(key)?),
            Algorithm::HmacSha256 => MacState::HmacSha256(keyed(key)?),
            Algorithm::HmacSha384 => MacState::HmacSha384(keyed(key)?),
            Algorithm::HmacSha512 => MacState::HmacSha512(keyed(key)?),
            Algorithm::AesCmac => match key.len() {
                16 => MacState::Aes128Cmac(keyed(key)?),
                24 => MacState::Aes192Cmac(keyed(key)?),
                32 => MacState::Aes256Cmac(keyed(key)?),
                _ => return Err(Error::BadParameters),
            },
            _ => return Err(Error::NotSupported),
        };
        Ok(state)
    }

    pub fn output_size(&self) -> usize {
        match self {
            MacState::HmacMd5(_) => 16,
            MacState::HmacSha1(_) => 20,
            MacState::HmacSha224(_) => 28,
            MacState::HmacSha256(_) => 32,
            MacState::HmacSha384(_) => 48,
            MacState::HmacSha512(_) => 64,
            MacState::Aes128Cmac(_) | MacState::Aes192Cmac(_) | MacState::Aes256Cmac(_) => 16,
        }
    }

    pub fn update(&mut self, chunk: &[u8]) {
        with_mac!(self, mac => Mac::update(mac, chunk))
    }

    /// Write the MAC into `output`, returns the MAC length
    pub fn finalize(self, output: &mut [u8]) -> usize {
        let size = self.output_size();
        with_mac!(self, mac => {
            let tag = mac.finalize().into_bytes();
            output[..size].copy_from_slice(tag.as_slice());
        });
        size
    }
}
