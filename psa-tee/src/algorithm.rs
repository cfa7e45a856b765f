//! # Algorithm translation
//!
//! Maps the PSA algorithm identifiers onto the native algorithm
//! identifiers of the engine and derives the key object type a native
//! algorithm needs.

use tee_crypto::{Algorithm as NativeAlgorithm, ObjectType};

use crate::error::Error;

algorithm_enum!(
    /// PSA algorithm identifier
    Algorithm,
    u32,
    /// MD5
    Md5 => 0x0200_0003, "md5",
    /// SHA-1
    Sha1 => 0x0200_0005, "sha1",
    /// SHA-224
    Sha224 => 0x0200_0008, "sha224",
    /// SHA-256
    Sha256 => 0x0200_0009, "sha256",
    /// SHA-384
    Sha384 => 0x0200_000a, "sha384",
    /// SHA-512
    Sha512 => 0x0200_000b, "sha512",
    /// SHA3-224
    Sha3_224 => 0x0200_0010, "sha3-224",
    /// SHA3-256
    Sha3_256 => 0x0200_0011, "sha3-256",
    /// SHA3-384
    Sha3_384 => 0x0200_0012, "sha3-384",
    /// SHA3-512
    Sha3_512 => 0x0200_0013, "sha3-512",
    /// Counter mode
    Ctr => 0x04c0_1000, "ctr",
    /// ECB without padding
    EcbNoPadding => 0x0440_4400, "ecb-no-padding",
    /// CBC without padding
    CbcNoPadding => 0x0440_4000, "cbc-no-padding",
    /// CBC with PKCS#7 padding, has no native counterpart
    CbcPkcs7 => 0x0440_4100, "cbc-pkcs7",
    /// HMAC with MD5
    HmacMd5 => 0x0380_0003, "hmac-md5",
    /// HMAC with SHA-1
    HmacSha1 => 0x0380_0005, "hmac-sha1",
    /// HMAC with SHA-224
    HmacSha224 => 0x0380_0008, "hmac-sha224",
    /// HMAC with SHA-256
    HmacSha256 => 0x0380_0009, "hmac-sha256",
    /// HMAC with SHA-384
    HmacSha384 => 0x0380_000a, "hmac-sha384",
    /// HMAC with SHA-512
    HmacSha512 => 0x0380_000b, "hmac-sha512",
    /// CMAC
    Cmac => 0x03c0_0200, "cmac",
);

const TRANSLATIONS: [(Algorithm, NativeAlgorithm); 20] = [
    (Algorithm::Md5, NativeAlgorithm::Md5),
    (Algorithm::Sha1, NativeAlgorithm::Sha1),
    (Algorithm::Sha224, NativeAlgorithm::Sha224),
    (Algorithm::Sha256, NativeAlgorithm::Sha256),
    (Algorithm::Sha384, NativeAlgorithm::Sha384),
    (Algorithm::Sha512, NativeAlgorithm::Sha512),
    (Algorithm::Sha3_224, NativeAlgorithm::Sha3_224),
    (Algorithm::Sha3_256, NativeAlgorithm::Sha3_256),
    (Algorithm::Sha3_384, NativeAlgorithm::Sha3_384),
    (Algorithm::Sha3_512, NativeAlgorithm::Sha3_512),
    (Algorithm::Ctr, NativeAlgorithm::AesCtr),
    (Algorithm::EcbNoPadding, NativeAlgorithm::AesEcbNoPad),
    (Algorithm::CbcNoPadding, NativeAlgorithm::AesCbcNoPad),
    (Algorithm::HmacMd5, NativeAlgorithm::HmacMd5),
    (Algorithm::HmacSha1, NativeAlgorithm::HmacSha1),
    (Algorithm::HmacSha224, NativeAlgorithm::HmacSha224),
    (Algorithm::HmacSha256, NativeAlgorithm::HmacSha256),
    (Algorithm::HmacSha384, NativeAlgorithm::HmacSha384),
    (Algorithm::HmacSha512, NativeAlgorithm::HmacSha512),
    (Algorithm::Cmac, NativeAlgorithm::AesCmac),
];

/// Native identifier of a PSA algorithm
pub fn translate_algorithm(algorithm: Algorithm) -> Result<NativeAlgorithm, Error> {
    TRANSLATIONS
        .iter()
        .find(|(a, _)| *a == algorithm)
        .map(|(_, native)| *native)
        .ok_or(Error::UnsupportedAlgorithm)
}

/// PSA identifier of a native algorithm
pub fn abstract_algorithm(native: NativeAlgorithm) -> Result<Algorithm, Error> {
    TRANSLATIONS
        .iter()
        .find(|(_, n)| *n == native)
        .map(|(algorithm, _)| *algorithm)
        .ok_or(Error::UnsupportedAlgorithm)
}

/// Key object type required by a native algorithm
///
/// Digest algorithms use no key and fail with `UnsupportedAlgorithm`.
pub fn native_type_for_algorithm(native: NativeAlgorithm) -> Result<ObjectType, Error> {
    let object_type = match native {
        NativeAlgorithm::AesEcbNoPad
        | NativeAlgorithm::AesCbcNoPad
        | NativeAlgorithm::AesCtr
        | NativeAlgorithm::AesCts
        | NativeAlgorithm::AesXts
        | NativeAlgorithm::AesCbcMacNoPad
        | NativeAlgorithm::AesCbcMacPkcs5
        | NativeAlgorithm::AesCmac
        | NativeAlgorithm::AesCcm
        | NativeAlgorithm::AesGcm => ObjectType::Aes,
        NativeAlgorithm::DesEcbNoPad
        | NativeAlgorithm::DesCbcNoPad
        | NativeAlgorithm::DesCbcMacNoPad
        | NativeAlgorithm::DesCbcMacPkcs5 => ObjectType::Des,
        NativeAlgorithm::Des3EcbNoPad
        | NativeAlgorithm::Des3CbcNoPad
        | NativeAlgorithm::Des3CbcMacNoPad
        | NativeAlgorithm::Des3CbcMacPkcs5 => ObjectType::Des3,
        NativeAlgorithm::RsassaPkcs1V15Md5
        | NativeAlgorithm::RsassaPkcs1V15Sha1
        | NativeAlgorithm::RsassaPkcs1V15Sha224
        | NativeAlgorithm::RsassaPkcs1V15Sha256
        | NativeAlgorithm::RsassaPkcs1V15Sha384
        | NativeAlgorithm::RsassaPkcs1V15Sha512
        | NativeAlgorithm::RsassaPkcs1PssMgf1Sha1
        | NativeAlgorithm::RsassaPkcs1PssMgf1Sha224
        | NativeAlgorithm::RsassaPkcs1PssMgf1Sha256
        | NativeAlgorithm::RsassaPkcs1PssMgf1Sha384
        | NativeAlgorithm::RsassaPkcs1PssMgf1Sha512 => ObjectType::RsaKeypair,
        NativeAlgorithm::HmacMd5 => ObjectType::HmacMd5,
        NativeAlgorithm::HmacSha1 => ObjectType::HmacSha1,
        NativeAlgorithm::HmacSha224 => ObjectType::HmacSha224,
        NativeAlgorithm::HmacSha256 => ObjectType::HmacSha256,
        NativeAlgorithm::HmacSha384 => ObjectType::HmacSha384,
        NativeAlgorithm::HmacSha512 => ObjectType::HmacSha512,
        _ => return Err(Error::UnsupportedAlgorithm),
    };
    Ok(object_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::TryFrom;

    #[test]
    fn translate_digests() {
        assert_eq!(translate_algorithm(Algorithm::Md5), Ok(NativeAlgorithm::Md5));
        assert_eq!(translate_algorithm(Algorithm::Sha1), Ok(NativeAlgorithm::Sha1));
        assert_eq!(
            translate_algorithm(Algorithm::Sha224),
            Ok(NativeAlgorithm::Sha224)
        );
        assert_eq!(
            translate_algorithm(Algorithm::Sha256),
            Ok(NativeAlgorithm::Sha256)
        );
        assert_eq!(
            translate_algorithm(Algorithm::Sha384),
            Ok(NativeAlgorithm::Sha384)
        );
        assert_eq!(
            translate_algorithm(Algorithm::Sha512),
            Ok(NativeAlgorithm::Sha512)
        );
        assert_eq!(
            translate_algorithm(Algorithm::Sha3_224),
            Ok(NativeAlgorithm::Sha3_224)
        );
        assert_eq!(
            translate_algorithm(Algorithm::Sha3_256),
            Ok(NativeAlgorithm::Sha3_256)
        );
        assert_eq!(
            translate_algorithm(Algorithm::Sha3_384),
            Ok(NativeAlgorithm::Sha3_384)
        );
        assert_eq!(
            translate_algorithm(Algorithm::Sha3_512),
            Ok(NativeAlgorithm::Sha3_512)
        );
    }

    #[test]
    fn translate_ciphers_and_macs() {
        assert_eq!(
            translate_algorithm(Algorithm::CbcNoPadding),
            Ok(NativeAlgorithm::AesCbcNoPad)
        );
        assert_eq!(translate_algorithm(Algorithm::Ctr), Ok(NativeAlgorithm::AesCtr));
        assert_eq!(
            translate_algorithm(Algorithm::EcbNoPadding),
            Ok(NativeAlgorithm::AesEcbNoPad)
        );
        assert_eq!(translate_algorithm(Algorithm::Cmac), Ok(NativeAlgorithm::AesCmac));
    }

    #[test]
    fn translate_hmacs() {
        let cases: [(Algorithm, u32, NativeAlgorithm, u32); 6] = [
            (Algorithm::HmacMd5, 0x0380_0003, NativeAlgorithm::HmacMd5, 0x3000_0001),
            (Algorithm::HmacSha1, 0x0380_0005, NativeAlgorithm::HmacSha1, 0x3000_0002),
            (Algorithm::HmacSha224, 0x0380_0008, NativeAlgorithm::HmacSha224, 0x3000_0003),
            (Algorithm::HmacSha256, 0x0380_0009, NativeAlgorithm::HmacSha256, 0x3000_0004),
            (Algorithm::HmacSha384, 0x0380_000a, NativeAlgorithm::HmacSha384, 0x3000_0005),
            (Algorithm::HmacSha512, 0x0380_000b, NativeAlgorithm::HmacSha512, 0x3000_0006),
        ];
        for (algorithm, value, native, native_value) in cases {
            assert_eq!(Algorithm::try_from(value), Ok(algorithm));
            assert_eq!(translate_algorithm(algorithm), Ok(native));
            assert_eq!(u32::from(native), native_value);
            assert_eq!(abstract_algorithm(native), Ok(algorithm));
        }
    }

    #[test]
    fn unsupported_algorithms() {
        assert_eq!(
            translate_algorithm(Algorithm::CbcPkcs7),
            Err(Error::UnsupportedAlgorithm)
        );
        // RSA PKCS#1 v1.5 signature with SHA-256, not an enumerated identifier
        assert_eq!(
            Algorithm::try_from(0x0602_0209u32),
            Err(Error::UnsupportedAlgorithm)
        );
        assert_eq!(Algorithm::try_from(0u32), Err(Error::UnsupportedAlgorithm));
        assert_eq!(
            Algorithm::try_from(0x0200_0009u32).and_then(translate_algorithm),
            Ok(NativeAlgorithm::Sha256)
        );
    }

    #[test]
    fn translation_is_injective() {
        for (i, (a, native)) in TRANSLATIONS.iter().enumerate() {
            for (b, other) in TRANSLATIONS.iter().skip(i + 1) {
                assert_ne!(a, b);
                assert_ne!(native, other);
            }
        }
    }

    #[test]
    fn reverse_translation() {
        for algorithm in Algorithm::ALL {
            if let Ok(native) = translate_algorithm(*algorithm) {
                assert_eq!(abstract_algorithm(native), Ok(*algorithm));
            }
        }
        assert_eq!(
            abstract_algorithm(NativeAlgorithm::AesGcm),
            Err(Error::UnsupportedAlgorithm)
        );
    }

    #[test]
    fn key_types() {
        assert_eq!(
            native_type_for_algorithm(NativeAlgorithm::AesCbcNoPad),
            Ok(ObjectType::Aes)
        );
        assert_eq!(
            native_type_for_algorithm(NativeAlgorithm::AesGcm),
            Ok(ObjectType::Aes)
        );
        assert_eq!(
            native_type_for_algorithm(NativeAlgorithm::AesCmac),
            Ok(ObjectType::Aes)
        );
        assert_eq!(
            native_type_for_algorithm(NativeAlgorithm::DesCbcMacNoPad),
            Ok(ObjectType::Des)
        );
        assert_eq!(
            native_type_for_algorithm(NativeAlgorithm::Des3EcbNoPad),
            Ok(ObjectType::Des3)
        );
        assert_eq!(
            native_type_for_algorithm(NativeAlgorithm::RsassaPkcs1PssMgf1Sha256),
            Ok(ObjectType::RsaKeypair)
        );
        assert_eq!(
            native_type_for_algorithm(NativeAlgorithm::HmacSha384),
            Ok(ObjectType::HmacSha384)
        );
        assert_eq!(
            native_type_for_algorithm(NativeAlgorithm::Sha256),
            Err(Error::UnsupportedAlgorithm)
        );
    }

    #[test]
    fn names() {
        assert_eq!("sha3-256".parse::<Algorithm>(), Ok(Algorithm::Sha3_256));
        assert_eq!("cbc-no-padding".parse::<Algorithm>(), Ok(Algorithm::CbcNoPadding));
        assert_eq!("sha999".parse::<Algorithm>(), Err(Error::UnsupportedAlgorithm));
        assert_eq!(Algorithm::HmacSha1.to_string(), "hmac-sha1");
        assert_eq!(u32::from(Algorithm::Cmac), 0x03c0_0200);
    }
}
