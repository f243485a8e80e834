// RSA Encryption Implementation
// Whitens the UTF-8 bytes of a message and encrypts each byte on its own

use num_traits::Zero;
use rayon::prelude::*;
use tracing::debug;

use super::bigint::{from_u64, mod_pow, to_decimal, RsaBigInt};
use super::keygen::RsaPublicKey;
use super::whitening::whiten;
use super::PARALLEL_THRESHOLD;
use crate::error::{ArithmeticError, CryptoResult};
use crate::wire::CiphertextPayload;

/// Encrypt every byte independently: c = m^e mod n.
/// Output position i holds the ciphertext of input byte i.
pub fn encrypt_bytes(bytes: &[u8], public_key: &RsaPublicKey) -> CryptoResult<Vec<RsaBigInt>> {
    if public_key.n.is_zero() {
        return Err(ArithmeticError::ZeroModulus.into());
    }

    let encrypt_one = |&m: &u8| mod_pow(&from_u64(m as u64), &public_key.e, &public_key.n);

    let parallel = bytes.len() >= PARALLEL_THRESHOLD;
    debug!(bytes = bytes.len(), parallel, "encrypting bytes");

    let ciphertext = if parallel {
        bytes.par_iter().map(encrypt_one).collect::<Result<Vec<_>, _>>()?
    } else {
        bytes.iter().map(encrypt_one).collect::<Result<Vec<_>, _>>()?
    };

    Ok(ciphertext)
}

/// Encrypt a string using RSA public key
///
/// Returns one decimal token per UTF-8 byte of `plaintext`, along with the
/// bit length of `n` for the receiving side.
pub fn encrypt_string(plaintext: &str, public_key: &RsaPublicKey) -> CryptoResult<CiphertextPayload> {
    let shifted = whiten(plaintext.as_bytes());
    let ciphertext = encrypt_bytes(&shifted, public_key)?
        .iter()
        .map(to_decimal)
        .collect();

    Ok(CiphertextPayload {
        ciphertext,
        n_bitlen: public_key.bit_length(),
    })
}
