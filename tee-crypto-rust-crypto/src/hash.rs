use digest::DynDigest;
use tee_crypto::{Algorithm, Error};

/// Create a hasher for a digest algorithm
pub fn new_digest(algorithm: Algorithm) -> Result<Box<dyn DynDigest>, Error> {
    let hasher: Box<dyn DynDigest> = match algorithm {
        Algorithm::Md5 => Box::new(md5::Md5::default()),
        Algorithm::Sha1 => Box::new(sha1::Sha1::default()),
        Algorithm::Sha224 => Box::new(sha2::Sha224::default()),
        Algorithm::Sha256 => Box::new(sha2::Sha256::default()),
        Algorithm::Sha384 => Box::new(sha2::Sha384::default()),
        Algorithm::Sha512 => Box::new(sha2::Sha512::default()),
        Algorithm::Sha3_224 => Box::new(sha3::Sha3_224::default()),
        Algorithm::Sha3_256 => Box::new(sha3::Sha3_256::default()),
        Algorithm::Sha3_384 => Box::new(sha3::Sha3_384::default()),
        Algorithm::Sha3_512 => Box::new(sha3::Sha3_512::default()),
        _ => return Err(Error::NotSupported),
    };
    Ok(hasher)
}

/// Finish a hasher into `hash`, the hasher is reset afterwards
pub fn finish_digest(hasher: &mut dyn DynDigest, hash: &mut [u8]) -> Result<usize, Error> {
    let size = hasher.output_size();
    if hash.len() < size {
        return Err(Error::ShortBuffer);
    }
    hasher
        .finalize_into_reset(&mut hash[..size])
        .map_err(|_| Error::Generic)?;
    Ok(size)
}
