//! # Key sizes
//!
//! Valid sizes in bits per native key object type, and the size used
//! instead when a caller asks for something else.

use tee_crypto::ObjectType;

/// Result of validating a requested key size
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeySizeOutcome {
    /// The requested size is valid
    Valid(u32),
    /// The requested size was zero or invalid, the default is used instead
    Corrected(u32),
    /// There are no known sizes for the key type
    Rejected,
}

impl KeySizeOutcome {
    /// Size to use, in bits
    pub fn bits(self) -> Option<u32> {
        match self {
            KeySizeOutcome::Valid(bits) | KeySizeOutcome::Corrected(bits) => Some(bits),
            KeySizeOutcome::Rejected => None,
        }
    }

    /// Check if the default replaced the requested size
    pub fn is_corrected(self) -> bool {
        matches!(self, KeySizeOutcome::Corrected(_))
    }
}

#[derive(Clone, Copy)]
enum Sizes {
    /// One of the listed sizes
    Listed(&'static [u32]),
    /// Multiple of eight within the inclusive range
    Range(u32, u32),
}

impl Sizes {
    fn contains(self, bits: u32) -> bool {
        match self {
            Sizes::Listed(sizes) => sizes.contains(&bits),
            Sizes::Range(min, max) => bits >= min && bits <= max && bits % 8 == 0,
        }
    }
}

struct KeySizes {
    object_type: ObjectType,
    sizes: Sizes,
    default: u32,
}

static KEY_SIZES: [KeySizes; 10] = [
    KeySizes {
        object_type: ObjectType::Aes,
        sizes: Sizes::Listed(&[128, 192, 256]),
        default: 256,
    },
    KeySizes {
        object_type: ObjectType::Des3,
        sizes: Sizes::Listed(&[128, 192]),
        default: 192,
    },
    KeySizes {
        object_type: ObjectType::Des,
        sizes: Sizes::Listed(&[64]),
        default: 64,
    },
    KeySizes {
        object_type: ObjectType::RsaKeypair,
        sizes: Sizes::Listed(&[256, 512, 768, 1024, 1536, 2048]),
        default: 2048,
    },
    KeySizes {
        object_type: ObjectType::HmacMd5,
        sizes: Sizes::Range(64, 512),
        default: 128,
    },
    KeySizes {
        object_type: ObjectType::HmacSha1,
        sizes: Sizes::Range(80, 512),
        default: 160,
    },
    KeySizes {
        object_type: ObjectType::HmacSha224,
        sizes: Sizes::Range(112, 512),
        default: 224,
    },
    KeySizes {
        object_type: ObjectType::HmacSha256,
        sizes: Sizes::Range(192, 1024),
        default: 256,
    },
    KeySizes {
        object_type: ObjectType::HmacSha384,
        sizes: Sizes::Range(256, 1024),
        default: 384,
    },
    KeySizes {
        object_type: ObjectType::HmacSha512,
        sizes: Sizes::Range(256, 1024),
        default: 512,
    },
];

fn key_sizes(object_type: ObjectType) -> Option<&'static KeySizes> {
    KEY_SIZES.iter().find(|k| k.object_type == object_type)
}

/// Default size of a key type in bits
pub fn default_key_size(object_type: ObjectType) -> Option<u32> {
    key_sizes(object_type).map(|k| k.default)
}

/// Validate `requested_bits` for a key of `object_type`
///
/// Zero means no size was requested.
pub fn validate_key_size(object_type: ObjectType, requested_bits: u32) -> KeySizeOutcome {
    match key_sizes(object_type) {
        Some(k) if k.sizes.contains(requested_bits) => KeySizeOutcome::Valid(requested_bits),
        Some(k) => KeySizeOutcome::Corrected(k.default),
        None => KeySizeOutcome::Rejected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listed_sizes() {
        for bits in [128, 192, 256] {
            assert_eq!(validate_key_size(ObjectType::Aes, bits), KeySizeOutcome::Valid(bits));
        }
        for bits in [128, 192] {
            assert_eq!(validate_key_size(ObjectType::Des3, bits), KeySizeOutcome::Valid(bits));
        }
        assert_eq!(validate_key_size(ObjectType::Des, 64), KeySizeOutcome::Valid(64));
        for bits in [256, 512, 768, 1024, 1536, 2048] {
            assert_eq!(
                validate_key_size(ObjectType::RsaKeypair, bits),
                KeySizeOutcome::Valid(bits)
            );
        }
    }

    #[test]
    fn corrected_sizes() {
        assert_eq!(validate_key_size(ObjectType::Aes, 0), KeySizeOutcome::Corrected(256));
        assert_eq!(validate_key_size(ObjectType::Aes, 100), KeySizeOutcome::Corrected(256));
        assert_eq!(validate_key_size(ObjectType::Des3, 64), KeySizeOutcome::Corrected(192));
        assert_eq!(validate_key_size(ObjectType::Des, 56), KeySizeOutcome::Corrected(64));
        assert_eq!(
            validate_key_size(ObjectType::RsaKeypair, 4096),
            KeySizeOutcome::Corrected(2048)
        );
    }

    #[test]
    fn hmac_ranges() {
        assert_eq!(validate_key_size(ObjectType::HmacSha256, 192), KeySizeOutcome::Valid(192));
        assert_eq!(validate_key_size(ObjectType::HmacSha256, 1024), KeySizeOutcome::Valid(1024));
        assert_eq!(
            validate_key_size(ObjectType::HmacSha256, 200),
            KeySizeOutcome::Valid(200)
        );
        assert_eq!(
            validate_key_size(ObjectType::HmacSha256, 196),
            KeySizeOutcome::Corrected(256)
        );
        assert_eq!(
            validate_key_size(ObjectType::HmacSha1, 72),
            KeySizeOutcome::Corrected(160)
        );
        assert_eq!(validate_key_size(ObjectType::HmacMd5, 512), KeySizeOutcome::Valid(512));
        assert_eq!(
            validate_key_size(ObjectType::HmacSha512, 0),
            KeySizeOutcome::Corrected(512)
        );
    }

    #[test]
    fn rejected_types() {
        assert_eq!(
            validate_key_size(ObjectType::GenericSecret, 128),
            KeySizeOutcome::Rejected
        );
        assert_eq!(
            validate_key_size(ObjectType::RsaPublicKey, 2048),
            KeySizeOutcome::Rejected
        );
        assert_eq!(default_key_size(ObjectType::GenericSecret), None);
        assert_eq!(default_key_size(ObjectType::Des3), Some(192));
    }

    #[test]
    fn outcome() {
        assert_eq!(KeySizeOutcome::Valid(128).bits(), Some(128));
        assert_eq!(KeySizeOutcome::Corrected(256).bits(), Some(256));
        assert_eq!(KeySizeOutcome::Rejected.bits(), None);
        assert!(KeySizeOutcome::Corrected(256).is_corrected());
        assert!(!KeySizeOutcome::Valid(256).is_corrected());
    }
}
