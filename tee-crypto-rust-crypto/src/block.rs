use aes::{Aes128, Aes192, Aes256};
use byteorder::{BigEndian, ByteOrder};
use cipher::{generic_array::GenericArray, BlockDecrypt, BlockEncrypt, KeyInit};
use des::{Des, TdesEde2, TdesEde3};
use tee_crypto::{Error, ObjectType, MAX_BLOCK_SIZE};

/// Block cipher keyed for one of the supported key types
pub enum BlockCipher {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
    Des(Des),
    Des3Ede2(TdesEde2),
    Des3Ede3(TdesEde3),
}

impl BlockCipher {
    pub fn new(object_type: ObjectType, key: &[u8]) -> Result<Self, Error> {
        let cipher = match (object_type, key.len()) {
            (ObjectType::Aes, 16) => Aes128::new_from_slice(key).map(Self::Aes128),
            (ObjectType::Aes, 24) => Aes192::new_from_slice(key).map(Self::Aes192),
            (ObjectType::Aes, 32) => Aes256::new_from_slice(key).map(Self::Aes256),
            (ObjectType::Des, 8) => Des::new_from_slice(key).map(Self::Des),
            (ObjectType::Des3, 16) => TdesEde2::new_from_slice(key).map(Self::Des3Ede2),
            (ObjectType::Des3, 24) => TdesEde3::new_from_slice(key).map(Self::Des3Ede3),
            _ => return Err(Error::BadParameters),
        };
        cipher.map_err(|_| Error::BadParameters)
    }

    pub fn block_size(&self) -> usize {
        match self {
            Self::Aes128(_) | Self::Aes192(_) | Self::Aes256(_) => 16,
            Self::Des(_) | Self::Des3Ede2(_) | Self::Des3Ede3(_) => 8,
        }
    }

    /// Encrypt one block in place
    pub fn encrypt_block(&self, block: &mut [u8]) {
        match self {
            Self::Aes128(c) => c.encrypt_block(GenericArray::from_mut_slice(block)),
            Self::Aes192(c) => c.encrypt_block(GenericArray::from_mut_slice(block)),
            Self::Aes256(c) => c.encrypt_block(GenericArray::from_mut_slice(block)),
            Self::Des(c) => c.encrypt_block(GenericArray::from_mut_slice(block)),
            Self::Des3Ede2(c) => c.encrypt_block(GenericArray::from_mut_slice(block)),
            Self::Des3Ede3(c) => c.encrypt_block(GenericArray::from_mut_slice(block)),
        }
    }

    /// Decrypt one block in place
    pub fn decrypt_block(&self, block: &mut [u8]) {
        match self {
            Self::Aes128(c) => c.decrypt_block(GenericArray::from_mut_slice(block)),
            Self::Aes192(c) => c.decrypt_block(GenericArray::from_mut_slice(block)),
            Self::Aes256(c) => c.decrypt_block(GenericArray::from_mut_slice(block)),
            Self::Des(c) => c.decrypt_block(GenericArray::from_mut_slice(block)),
            Self::Des3Ede2(c) => c.decrypt_block(GenericArray::from_mut_slice(block)),
            Self::Des3Ede3(c) => c.decrypt_block(GenericArray::from_mut_slice(block)),
        }
    }
}

#[inline]
fn block_xor(a: &mut [u8], b: &[u8]) {
    for (a, b) in a.iter_mut().zip(b.iter()) {
        *a ^= *b;
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Chaining {
    Ecb,
    Cbc,
    Ctr,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

/// Streaming state of a cipher operation
///
/// ECB and CBC keep the last complete block until the operation is
/// finished, CTR writes every octet immediately.
pub struct CipherState {
    cipher: BlockCipher,
    chaining: Chaining,
    direction: Direction,
    /// Chaining block for CBC, counter block for CTR
    block: [u8; MAX_BLOCK_SIZE],
    /// Unused key stream for CTR
    key_stream: [u8; MAX_BLOCK_SIZE],
    key_stream_used: usize,
    /// Pending input for ECB and CBC
    pending: [u8; MAX_BLOCK_SIZE],
    pending_length: usize,
}

impl CipherState {
    pub fn new(
        cipher: BlockCipher,
        chaining: Chaining,
        direction: Direction,
        iv: &[u8],
    ) -> Result<Self, Error> {
        let block_size = cipher.block_size();
        let mut block = [0u8; MAX_BLOCK_SIZE];
        match chaining {
            Chaining::Ecb => (),
            Chaining::Cbc | Chaining::Ctr => {
                if iv.len() != block_size {
                    return Err(Error::BadParameters);
                }
                block[..block_size].copy_from_slice(iv);
            }
        }
        if chaining == Chaining::Ctr && block_size != MAX_BLOCK_SIZE {
            return Err(Error::NotSupported);
        }
        Ok(Self {
            cipher,
            chaining,
            direction,
            block,
            key_stream: [0u8; MAX_BLOCK_SIZE],
            key_stream_used: block_size,
            pending: [0u8; MAX_BLOCK_SIZE],
            pending_length: 0,
        })
    }

    /// Number of octets an update with `input_length` octets will write
    pub fn update_length(&self, input_length: usize) -> usize {
        match self.chaining {
            Chaining::Ctr => input_length,
            Chaining::Ecb | Chaining::Cbc => {
                let block_size = self.cipher.block_size();
                let total = self.pending_length + input_length;
                let mut hold = total % block_size;
                if hold == 0 && total > 0 {
                    hold = block_size;
                }
                total - hold
            }
        }
    }

    /// Process data, returns the number of octets written
    pub fn update(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, Error> {
        let required = self.update_length(input.len());
        if output.len() < required {
            return Err(Error::ShortBuffer);
        }
        match self.chaining {
            Chaining::Ctr => {
                for (i, o) in input.iter().zip(output.iter_mut()) {
                    *o = *i ^ self.next_key_stream_byte();
                }
                Ok(input.len())
            }
            Chaining::Ecb | Chaining::Cbc => {
                let block_size = self.cipher.block_size();
                let mut written = 0;
                for byte in input {
                    if self.pending_length == block_size {
                        self.process_pending(&mut output[written..written + block_size]);
                        written += block_size;
                    }
                    self.pending[self.pending_length] = *byte;
                    self.pending_length += 1;
                }
                Ok(written)
            }
        }
    }

    /// Process the last data, returns the number of octets written
    pub fn finish(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, Error> {
        match self.chaining {
            Chaining::Ctr => self.update(input, output),
            Chaining::Ecb | Chaining::Cbc => {
                let block_size = self.cipher.block_size();
                let total = self.pending_length + input.len();
                if total % block_size != 0 {
                    return Err(Error::BadParameters);
                }
                if output.len() < total {
                    return Err(Error::ShortBuffer);
                }
                let mut written = self.update(input, output)?;
                if self.pending_length == block_size {
                    self.process_pending(&mut output[written..written + block_size]);
                    written += block_size;
                }
                Ok(written)
            }
        }
    }

    fn process_pending(&mut self, output: &mut [u8]) {
        let block_size = self.cipher.block_size();
        let mut work = [0u8; MAX_BLOCK_SIZE];
        let work = &mut work[..block_size];
        work.copy_from_slice(&self.pending[..block_size]);
        match (self.chaining, self.direction) {
            (Chaining::Cbc, Direction::Encrypt) => {
                block_xor(work, &self.block[..block_size]);
                self.cipher.encrypt_block(work);
                self.block[..block_size].copy_from_slice(work);
            }
            (Chaining::Cbc, Direction::Decrypt) => {
                self.cipher.decrypt_block(work);
                block_xor(work, &self.block[..block_size]);
                self.block[..block_size].copy_from_slice(&self.pending[..block_size]);
            }
            (_, Direction::Encrypt) => self.cipher.encrypt_block(work),
            (_, Direction::Decrypt) => self.cipher.decrypt_block(work),
        }
        output.copy_from_slice(work);
        self.pending_length = 0;
    }

    fn next_key_stream_byte(&mut self) -> u8 {
        if self.key_stream_used == MAX_BLOCK_SIZE {
            self.key_stream.copy_from_slice(&self.block);
            self.cipher.encrypt_block(&mut self.key_stream);
            let counter = BigEndian::read_u128(&self.block);
            BigEndian::write_u128(&mut self.block, counter.wrapping_add(1));
            self.key_stream_used = 0;
        }
        let byte = self.key_stream[self.key_stream_used];
        self.key_stream_used += 1;
        byte
    }
}
