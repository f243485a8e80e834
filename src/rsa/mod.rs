// RSA Module - Main module file
// Exports key derivation and the per-byte message codec

pub mod bigint;
pub mod keygen;
pub mod encrypt;
pub mod decrypt;
pub mod whitening;

pub use keygen::{
    derive_default_keypair, derive_keypair, RsaKeyPair, RsaPrivateKey, RsaPublicKey,
    DEFAULT_E, DEFAULT_P, DEFAULT_Q,
};
pub use encrypt::{encrypt_bytes, encrypt_string};
pub use decrypt::{decrypt_ints, decrypt_payload, decrypt_to_string, decrypt_tokens};
pub use whitening::{unwhiten, whiten};

/// Messages at least this many bytes long are processed on the rayon pool
pub const PARALLEL_THRESHOLD: usize = 64;
