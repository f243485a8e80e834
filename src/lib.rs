//! Toy RSA messaging core.
//!
//! Derives a key pair from user-chosen primes `p`, `q` and exponent `e`,
//! then encrypts text one UTF-8 byte at a time into decimal ciphertext
//! tokens. There is no padding and no prime checking: this reproduces a
//! teaching scheme, it is not a secure cryptosystem.
//!
//! ```
//! use rsa_chat::rsa::derive_keypair;
//! use num_bigint::BigUint;
//!
//! let keys = derive_keypair(&BigUint::from(61u8), &BigUint::from(53u8), &BigUint::from(17u8)).unwrap();
//! let payload = keys.public_key().encrypt("Hi").unwrap();
//! assert_eq!(payload.ciphertext.len(), 2);
//! assert_eq!(keys.private_key().decrypt(&payload.ciphertext).unwrap(), "Hi");
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod rsa;
pub mod util;
pub mod wire;

pub use error::{ArithmeticError, CryptoError, CryptoResult, KeyParameterError};
pub use rsa::{RsaKeyPair, RsaPrivateKey, RsaPublicKey};
pub use wire::{CiphertextPayload, WireError, WireRecord};
