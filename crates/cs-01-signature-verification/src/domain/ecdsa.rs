//! # ECDSA Recovery (secp256k1)
//!
//! Recovers the Ethereum-style address that produced a wallet signature over a
//! text message.
//!
//! ## Security Notes
//!
//! - **Personal Message Prefix (EIP-191)**: signatures are over
//!   `keccak256("\x19Ethereum Signed Message:\n" || len || message)`, never over
//!   the raw text, so a command signature cannot double as a transaction.
//! - **Malleability Prevention (EIP-2)**: S must be STRICTLY LESS THAN half the
//!   curve order.
//! - **Scalar Range Validation**: R and S must be in [1, n-1].
//! - **Constant-Time Comparisons**: range checks use the `subtle` crate.

use super::errors::SignatureError;
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use k256::elliptic_curve::sec1::FromEncodedPoint;
use k256::{AffinePoint, EncodedPoint};
use sha3::{Digest, Keccak256};
use shared_types::Address;
use subtle::{Choice, ConstantTimeEq};

/// A 32-byte Keccak-256 digest.
pub type Hash = [u8; 32];

/// Prefix of an EIP-191 personal message.
const PERSONAL_MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// secp256k1 curve order n
/// n = 0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141
const SECP256K1_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// Half of the secp256k1 curve order (for malleability check).
const SECP256K1_HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

/// Recoverable ECDSA signature on the secp256k1 curve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EcdsaSignature {
    /// R component (32 bytes)
    pub r: [u8; 32],
    /// S component (32 bytes)
    pub s: [u8; 32],
    /// Recovery ID (0, 1, 27, or 28)
    pub v: u8,
}

impl EcdsaSignature {
    /// Length of the `r || s || v` wire encoding.
    pub const ENCODED_LEN: usize = 65;

    /// Decode the `0x`-prefixed hex `r || s || v` form produced by wallets.
    ///
    /// # Errors
    ///
    /// `SignatureError::InvalidFormat` if the text is not hex or not 65 bytes.
    pub fn from_hex(text: &str) -> Result<Self, SignatureError> {
        let digits = text.trim();
        let digits = digits.strip_prefix("0x").unwrap_or(digits);
        let bytes = hex::decode(digits).map_err(|_| SignatureError::InvalidFormat)?;
        if bytes.len() != Self::ENCODED_LEN {
            return Err(SignatureError::InvalidFormat);
        }

        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        Ok(Self { r, s, v: bytes[64] })
    }

    /// Encode as `0x`-prefixed hex `r || s || v`.
    #[must_use]
    pub fn to_hex(&self) -> String {
        let mut bytes = Vec::with_capacity(Self::ENCODED_LEN);
        bytes.extend_from_slice(&self.r);
        bytes.extend_from_slice(&self.s);
        bytes.push(self.v);
        format!("0x{}", hex::encode(bytes))
    }
}

// =============================================================================
// RECOVERY
// =============================================================================

/// Recover the address that signed `message` as an EIP-191 personal message.
///
/// # Errors
///
/// Any [`SignatureError`] raised by [`recover_address`].
pub fn recover_personal_signer(
    message: &str,
    signature: &EcdsaSignature,
) -> Result<Address, SignatureError> {
    recover_address(&personal_message_hash(message), signature)
}

/// Recover the signer's address from a signature over a prehashed message.
///
/// Validations performed, in order:
/// 1. R and S are in [1, n-1]
/// 2. R is a valid x-coordinate on the curve
/// 3. S is in the lower half of the order
/// 4. v is 0, 1, 27 or 28
/// 5. Public key recovery succeeds
pub fn recover_address(
    message_hash: &Hash,
    signature: &EcdsaSignature,
) -> Result<Address, SignatureError> {
    use zeroize::Zeroize;

    if !is_valid_scalar(&signature.r) || !is_valid_r_coordinate(&signature.r) {
        return Err(SignatureError::InvalidFormat);
    }
    if !is_valid_scalar(&signature.s) {
        return Err(SignatureError::InvalidFormat);
    }
    if !is_low_s(&signature.s) {
        return Err(SignatureError::MalleableSignature);
    }

    let recovery_id = parse_recovery_id(signature.v)?;

    let mut sig_bytes = [0u8; 64];
    sig_bytes[..32].copy_from_slice(&signature.r);
    sig_bytes[32..].copy_from_slice(&signature.s);

    let parsed = Signature::from_slice(&sig_bytes);
    sig_bytes.zeroize();
    let sig = parsed.map_err(|_| SignatureError::InvalidFormat)?;

    let recovered_key = VerifyingKey::recover_from_prehash(message_hash, &sig, recovery_id)
        .map_err(|_| SignatureError::RecoveryFailed)?;

    Ok(address_from_pubkey(&recovered_key))
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Keccak256 hash function.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// EIP-191 personal message digest of `message`.
pub fn personal_message_hash(message: &str) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(PERSONAL_MESSAGE_PREFIX.as_bytes());
    hasher.update(message.len().to_string().as_bytes());
    hasher.update(message.as_bytes());
    hasher.finalize().into()
}

/// Derive Ethereum address from public key.
pub fn address_from_pubkey(public_key: &VerifyingKey) -> Address {
    let pubkey_bytes = public_key.to_encoded_point(false);

    // Skip the 0x04 uncompressed prefix
    let hash = keccak256(&pubkey_bytes.as_bytes()[1..]);

    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    Address::new(address)
}

/// Check if S value is in lower half of curve order (EIP-2 malleability protection).
///
/// Constant-time: runs in fixed time regardless of input.
fn is_low_s(s: &[u8; 32]) -> bool {
    let (less, _) = ct_compare(s, &SECP256K1_HALF_ORDER);
    less.into()
}

/// Check if a scalar value is in valid range [1, n-1] for ECDSA.
fn is_valid_scalar(scalar: &[u8; 32]) -> bool {
    let mut is_zero = Choice::from(1u8);
    for &byte in scalar {
        is_zero &= byte.ct_eq(&0u8);
    }

    let (less, _) = ct_compare(scalar, &SECP256K1_ORDER);
    (!is_zero & less).into()
}

/// Constant-time big-endian comparison returning `(a < b, a > b)`.
fn ct_compare(a: &[u8; 32], b: &[u8; 32]) -> (Choice, Choice) {
    let mut less = Choice::from(0u8);
    let mut greater = Choice::from(0u8);

    for i in 0..32 {
        let not_decided = !(less | greater);
        let byte_less = Choice::from(u8::from(a[i] < b[i]));
        let byte_greater = Choice::from(u8::from(a[i] > b[i]));

        less |= not_decided & byte_less;
        greater |= not_decided & byte_greater;
    }

    (less, greater)
}

/// Validate that R is a valid x-coordinate on the secp256k1 curve.
fn is_valid_r_coordinate(r: &[u8; 32]) -> bool {
    let mut compressed = [0u8; 33];
    compressed[0] = 0x02; // Even y-parity
    compressed[1..].copy_from_slice(r);

    let Ok(encoded) = EncodedPoint::from_bytes(compressed) else {
        return false;
    };
    AffinePoint::from_encoded_point(&encoded).is_some().into()
}

/// Parse recovery ID from v value.
///
/// Valid v values: 0, 1, 27, 28
fn parse_recovery_id(v: u8) -> Result<RecoveryId, SignatureError> {
    let id = match v {
        0 | 27 => 0,
        1 | 28 => 1,
        _ => return Err(SignatureError::InvalidRecoveryId(v)),
    };

    RecoveryId::try_from(id).map_err(|_| SignatureError::InvalidRecoveryId(v))
}

/// Invert S value: s' = n - s
pub fn invert_s(s: &[u8; 32]) -> [u8; 32] {
    let mut result = [0u8; 32];
    let mut borrow: i32 = 0;

    for i in (0..32).rev() {
        let diff = i32::from(SECP256K1_ORDER[i]) - i32::from(s[i]) - borrow;
        if diff < 0 {
            result[i] = (diff + 256) as u8;
            borrow = 1;
        } else {
            result[i] = diff as u8;
            borrow = 0;
        }
    }

    result
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(any(test, feature = "test-utils"))]
pub mod test_helpers {
    use super::*;
    use k256::ecdsa::SigningKey;

    /// Generate a new ECDSA keypair.
    pub fn generate_keypair() -> (SigningKey, VerifyingKey) {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        let verifying_key = *signing_key.verifying_key();
        (signing_key, verifying_key)
    }

    /// Address controlled by `key`.
    pub fn address_of(key: &SigningKey) -> Address {
        address_from_pubkey(key.verifying_key())
    }

    /// Sign a message hash, normalizing S to the low half.
    pub fn sign(message_hash: &Hash, private_key: &SigningKey) -> EcdsaSignature {
        let (sig, recid) = private_key
            .sign_prehash_recoverable(message_hash)
            .expect("signing failed");

        let sig_bytes = sig.to_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&sig_bytes[..32]);
        s.copy_from_slice(&sig_bytes[32..]);

        let s_normalized = if is_low_s(&s) { s } else { invert_s(&s) };

        // Inverting S flips the recovery id
        let v = if s_normalized != s {
            if recid.to_byte() == 0 {
                28
            } else {
                27
            }
        } else {
            recid.to_byte() + 27
        };

        EcdsaSignature {
            r,
            s: s_normalized,
            v,
        }
    }

    /// Sign `message` the way a wallet's "sign message" feature does.
    pub fn sign_personal(message: &str, private_key: &SigningKey) -> EcdsaSignature {
        sign(&personal_message_hash(message), private_key)
    }
}
