//! Error types for the RSA message codec.
//!
//! The core fails fast: every error is returned to the caller, which
//! decides how to present it (for instance, marking a message as
//! undecryptable).

use num_bigint::BigUint;
use thiserror::Error;

/// Low-level numeric failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    /// A modular operation was asked to reduce modulo zero.
    #[error("modulus must be non-zero")]
    ZeroModulus,
    /// A string that should hold a base-10 integer does not.
    #[error("malformed decimal integer: {input:?}")]
    MalformedInteger { input: String },
}

/// Reasons a `(p, q, e)` triple cannot produce a key pair.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParameterError {
    #[error("p and q must both be at least 2")]
    FactorTooSmall,
    #[error("p and q must be different prime numbers")]
    EqualFactors,
    #[error("e must be coprime to (p-1)*(q-1) (gcd is {gcd})")]
    NotCoprime { gcd: BigUint },
}

/// Errors produced by key derivation and the message codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    #[error("invalid key parameters: {0}")]
    InvalidKeyParameters(#[from] KeyParameterError),
    #[error("arithmetic error: {0}")]
    Arithmetic(#[from] ArithmeticError),
    /// Decrypted bytes are not valid UTF-8. Usually the wrong key, or a
    /// byte that lost its high bit in the whitening step.
    #[error("decryption failed: plaintext is not valid UTF-8 (valid up to byte {valid_up_to})")]
    Decode { valid_up_to: usize },
}

/// Result type for codec and key derivation operations
pub type CryptoResult<T> = Result<T, CryptoError>;
