//! # Native identifiers

native_enum!(
    /// Algorithm identifier, Table 6-11 of the TEE internal core API
    Algorithm,
    /// AES, ECB mode without padding
    AesEcbNoPad => 0x1000_0010,
    /// AES, CBC mode without padding
    AesCbcNoPad => 0x1000_0110,
    /// AES, counter mode
    AesCtr => 0x1000_0210,
    /// AES, CBC mode with ciphertext stealing
    AesCts => 0x1000_0310,
    /// AES, XTS mode
    AesXts => 0x1000_0410,
    /// AES, CBC-MAC without padding
    AesCbcMacNoPad => 0x3000_0110,
    /// AES, CBC-MAC with PKCS#5 padding
    AesCbcMacPkcs5 => 0x3000_0510,
    /// AES, CMAC
    AesCmac => 0x3000_0610,
    /// AES, CCM authenticated encryption
    AesCcm => 0x4000_0710,
    /// AES, GCM authenticated encryption
    AesGcm => 0x4000_0810,
    /// DES, ECB mode without padding
    DesEcbNoPad => 0x1000_0011,
    /// DES, CBC mode without padding
    DesCbcNoPad => 0x1000_0111,
    /// DES, CBC-MAC without padding
    DesCbcMacNoPad => 0x3000_0111,
    /// DES, CBC-MAC with PKCS#5 padding
    DesCbcMacPkcs5 => 0x3000_0511,
    /// Triple DES, ECB mode without padding
    Des3EcbNoPad => 0x1000_0013,
    /// Triple DES, CBC mode without padding
    Des3CbcNoPad => 0x1000_0113,
    /// Triple DES, CBC-MAC without padding
    Des3CbcMacNoPad => 0x3000_0113,
    /// Triple DES, CBC-MAC with PKCS#5 padding
    Des3CbcMacPkcs5 => 0x3000_0513,
    /// RSASSA PKCS#1 v1.5 with MD5
    RsassaPkcs1V15Md5 => 0x7000_1830,
    /// RSASSA PKCS#1 v1.5 with SHA-1
    RsassaPkcs1V15Sha1 => 0x7000_2830,
    /// RSASSA PKCS#1 v1.5 with SHA-224
    RsassaPkcs1V15Sha224 => 0x7000_3830,
    /// RSASSA PKCS#1 v1.5 with SHA-256
    RsassaPkcs1V15Sha256 => 0x7000_4830,
    /// RSASSA PKCS#1 v1.5 with SHA-384
    RsassaPkcs1V15Sha384 => 0x7000_5830,
    /// RSASSA PKCS#1 v1.5 with SHA-512
    RsassaPkcs1V15Sha512 => 0x7000_6830,
    /// RSASSA PSS, MGF1 with SHA-1
    RsassaPkcs1PssMgf1Sha1 => 0x7021_2930,
    /// RSASSA PSS, MGF1 with SHA-224
    RsassaPkcs1PssMgf1Sha224 => 0x7031_3930,
    /// RSASSA PSS, MGF1 with SHA-256
    RsassaPkcs1PssMgf1Sha256 => 0x7041_4930,
    /// RSASSA PSS, MGF1 with SHA-384
    RsassaPkcs1PssMgf1Sha384 => 0x7051_5930,
    /// RSASSA PSS, MGF1 with SHA-512
    RsassaPkcs1PssMgf1Sha512 => 0x7061_6930,
    /// MD5 digest
    Md5 => 0x5000_0001,
    /// SHA-1 digest
    Sha1 => 0x5000_0002,
    /// SHA-224 digest
    Sha224 => 0x5000_0003,
    /// SHA-256 digest
    Sha256 => 0x5000_0004,
    /// SHA-384 digest
    Sha384 => 0x5000_0005,
    /// SHA-512 digest
    Sha512 => 0x5000_0006,
    /// SHA3-224 digest
    Sha3_224 => 0x5000_0008,
    /// SHA3-256 digest
    Sha3_256 => 0x5000_0009,
    /// SHA3-384 digest
    Sha3_384 => 0x5000_000a,
    /// SHA3-512 digest
    Sha3_512 => 0x5000_000b,
    /// HMAC with MD5
    HmacMd5 => 0x3000_0001,
    /// HMAC with SHA-1
    HmacSha1 => 0x3000_0002,
    /// HMAC with SHA-224
    HmacSha224 => 0x3000_0003,
    /// HMAC with SHA-256
    HmacSha256 => 0x3000_0004,
    /// HMAC with SHA-384
    HmacSha384 => 0x3000_0005,
    /// HMAC with SHA-512
    HmacSha512 => 0x3000_0006,
);

native_enum!(
    /// Transient object type, Table 6-13 of the TEE internal core API
    ObjectType,
    /// AES secret key
    Aes => 0xa000_0010,
    /// DES secret key
    Des => 0xa000_0011,
    /// Triple DES secret key
    Des3 => 0xa000_0013,
    /// HMAC MD5 secret key
    HmacMd5 => 0xa000_0001,
    /// HMAC SHA-1 secret key
    HmacSha1 => 0xa000_0002,
    /// HMAC SHA-224 secret key
    HmacSha224 => 0xa000_0003,
    /// HMAC SHA-256 secret key
    HmacSha256 => 0xa000_0004,
    /// HMAC SHA-384 secret key
    HmacSha384 => 0xa000_0005,
    /// HMAC SHA-512 secret key
    HmacSha512 => 0xa000_0006,
    /// RSA public key
    RsaPublicKey => 0xa000_0030,
    /// RSA key pair
    RsaKeypair => 0xa100_0030,
    /// Generic secret
    GenericSecret => 0xa000_0000,
);

native_enum!(
    /// Operation mode
    OperationMode,
    /// Encryption
    Encrypt => 0,
    /// Decryption
    Decrypt => 1,
    /// Signing
    Sign => 2,
    /// Signature verification
    Verify => 3,
    /// Message authentication code
    Mac => 4,
    /// Digest
    Digest => 5,
    /// Key derivation
    Derive => 6,
);

/// Operation class, encoded in the top nibble of the algorithm identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlgorithmClass {
    /// Symmetric cipher
    Cipher,
    /// Message authentication code
    Mac,
    /// Authenticated encryption
    Ae,
    /// Digest
    Digest,
    /// Asymmetric signature
    AsymmetricSignature,
}

impl Algorithm {
    /// The operation class of the algorithm
    pub fn class(self) -> AlgorithmClass {
        match u32::from(self) >> 28 {
            0x1 => AlgorithmClass::Cipher,
            0x3 => AlgorithmClass::Mac,
            0x4 => AlgorithmClass::Ae,
            0x5 => AlgorithmClass::Digest,
            _ => AlgorithmClass::AsymmetricSignature,
        }
    }

    /// Check if the algorithm may be used in `mode`
    pub fn supports_mode(self, mode: OperationMode) -> bool {
        match self.class() {
            AlgorithmClass::Cipher | AlgorithmClass::Ae => {
                mode == OperationMode::Encrypt || mode == OperationMode::Decrypt
            }
            AlgorithmClass::Mac => mode == OperationMode::Mac,
            AlgorithmClass::Digest => mode == OperationMode::Digest,
            AlgorithmClass::AsymmetricSignature => {
                mode == OperationMode::Sign || mode == OperationMode::Verify
            }
        }
    }

    /// Output length of digest and MAC algorithms in octets
    pub fn output_size(self) -> Option<usize> {
        match self {
            Algorithm::Md5 | Algorithm::HmacMd5 => Some(16),
            Algorithm::Sha1 | Algorithm::HmacSha1 => Some(20),
            Algorithm::Sha224 | Algorithm::Sha3_224 | Algorithm::HmacSha224 => Some(28),
            Algorithm::Sha256 | Algorithm::Sha3_256 | Algorithm::HmacSha256 => Some(32),
            Algorithm::Sha384 | Algorithm::Sha3_384 | Algorithm::HmacSha384 => Some(48),
            Algorithm::Sha512 | Algorithm::Sha3_512 | Algorithm::HmacSha512 => Some(64),
            Algorithm::AesCmac | Algorithm::AesCbcMacNoPad | Algorithm::AesCbcMacPkcs5 => Some(16),
            Algorithm::DesCbcMacNoPad
            | Algorithm::DesCbcMacPkcs5
            | Algorithm::Des3CbcMacNoPad
            | Algorithm::Des3CbcMacPkcs5 => Some(8),
            _ => None,
        }
    }
}
