// RSA Decryption Implementation
// Inverts the per-byte encryption and the whitening step

use num_traits::Zero;
use rayon::prelude::*;
use tracing::debug;

use super::bigint::{mod_pow, parse_decimal, RsaBigInt};
use super::keygen::RsaPrivateKey;
use super::whitening::unwhiten;
use super::PARALLEL_THRESHOLD;
use crate::error::{ArithmeticError, CryptoError, CryptoResult};
use crate::wire::CiphertextPayload;

/// Decrypt each ciphertext integer to one byte: (c^d mod n) mod 256.
pub fn decrypt_ints(ciphertext: &[RsaBigInt], private_key: &RsaPrivateKey) -> CryptoResult<Vec<u8>> {
    if private_key.n.is_zero() {
        return Err(ArithmeticError::ZeroModulus.into());
    }

    let decrypt_one = |c: &RsaBigInt| {
        let m = mod_pow(c, &private_key.d, &private_key.n)?;
        // Low byte of the little-endian encoding is m mod 256
        Ok::<u8, ArithmeticError>(m.to_bytes_le().first().copied().unwrap_or(0))
    };

    let parallel = ciphertext.len() >= PARALLEL_THRESHOLD;
    debug!(units = ciphertext.len(), parallel, "decrypting ciphertext");

    let bytes = if parallel {
        ciphertext.par_iter().map(decrypt_one).collect::<Result<Vec<_>, _>>()?
    } else {
        ciphertext.iter().map(decrypt_one).collect::<Result<Vec<_>, _>>()?
    };

    Ok(bytes)
}

/// Parse decimal tokens and decrypt them to the whitened byte sequence.
/// A single malformed token fails the whole call.
pub fn decrypt_tokens<S: AsRef<str>>(
    ciphertext: &[S],
    private_key: &RsaPrivateKey,
) -> CryptoResult<Vec<u8>> {
    let ints = ciphertext
        .iter()
        .map(|token| parse_decimal(token.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    decrypt_ints(&ints, private_key)
}

/// Decrypt ciphertext tokens to a string
pub fn decrypt_to_string<S: AsRef<str>>(
    ciphertext: &[S],
    private_key: &RsaPrivateKey,
) -> CryptoResult<String> {
    let shifted = decrypt_tokens(ciphertext, private_key)?;
    let bytes = unwhiten(&shifted);

    String::from_utf8(bytes).map_err(|e| CryptoError::Decode {
        valid_up_to: e.utf8_error().valid_up_to(),
    })
}

/// Decrypt a received payload; `n_bitlen` is informational and not checked
pub fn decrypt_payload(payload: &CiphertextPayload, private_key: &RsaPrivateKey) -> CryptoResult<String> {
    decrypt_to_string(&payload.ciphertext, private_key)
}
