// RSA Key Derivation
// Builds a key pair from user-supplied primes p, q and public exponent e

use num_traits::Zero;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::bigint::{bit_length, from_u64, gcd, mod_inverse, parse_decimal, RsaBigInt};
use super::decrypt::decrypt_to_string;
use super::encrypt::encrypt_string;
use crate::error::{ArithmeticError, CryptoResult, KeyParameterError};
use crate::wire::{decimal, CiphertextPayload};

/// Defaults offered when registering a new key pair
pub const DEFAULT_P: u64 = 61;
pub const DEFAULT_Q: u64 = 53;
pub const DEFAULT_E: u64 = 17;

/// RSA Public Key, shared with anyone who wants to send us a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaPublicKey {
    #[serde(with = "decimal")]
    pub e: RsaBigInt, // Public exponent
    #[serde(with = "decimal")]
    pub n: RsaBigInt, // Modulus
}

/// RSA Private Key, kept by the recipient and never transmitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsaPrivateKey {
    #[serde(with = "decimal")]
    pub d: RsaBigInt, // Private exponent
    #[serde(with = "decimal")]
    pub n: RsaBigInt, // Modulus (same as public)
}

/// Everything computed at registration time.
///
/// Only [`RsaKeyPair::public_key`] and [`RsaKeyPair::private_key`] are meant to
/// outlive registration; `p` and `q` are dropped with the pair.
#[derive(Debug, Clone)]
pub struct RsaKeyPair {
    pub p: RsaBigInt,
    pub q: RsaBigInt,
    pub e: RsaBigInt,
    pub n: RsaBigInt,
    pub d: RsaBigInt,
}

impl RsaPublicKey {
    /// Parse both fields from decimal strings
    pub fn from_decimal(e: &str, n: &str) -> Result<Self, ArithmeticError> {
        let key = Self {
            e: parse_decimal(e)?,
            n: parse_decimal(n)?,
        };
        if key.n.is_zero() {
            return Err(ArithmeticError::ZeroModulus);
        }
        Ok(key)
    }

    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        bit_length(&self.n)
    }

    /// Encrypt a message to the holder of the matching private key
    pub fn encrypt(&self, plaintext: &str) -> CryptoResult<CiphertextPayload> {
        encrypt_string(plaintext, self)
    }
}

impl RsaPrivateKey {
    /// Parse both fields from decimal strings
    pub fn from_decimal(d: &str, n: &str) -> Result<Self, ArithmeticError> {
        let key = Self {
            d: parse_decimal(d)?,
            n: parse_decimal(n)?,
        };
        if key.n.is_zero() {
            return Err(ArithmeticError::ZeroModulus);
        }
        Ok(key)
    }

    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        bit_length(&self.n)
    }

    /// Decrypt ciphertext tokens back to text
    pub fn decrypt(&self, ciphertext: &[String]) -> CryptoResult<String> {
        decrypt_to_string(ciphertext, self)
    }
}

impl RsaKeyPair {
    /// Derive a key pair from decimal-string form input
    pub fn from_decimal(p: &str, q: &str, e: &str) -> CryptoResult<Self> {
        derive_keypair(&parse_decimal(p)?, &parse_decimal(q)?, &parse_decimal(e)?)
    }

    pub fn public_key(&self) -> RsaPublicKey {
        RsaPublicKey {
            e: self.e.clone(),
            n: self.n.clone(),
        }
    }

    pub fn private_key(&self) -> RsaPrivateKey {
        RsaPrivateKey {
            d: self.d.clone(),
            n: self.n.clone(),
        }
    }

    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        bit_length(&self.n)
    }
}

/// Derive (n, d) from p, q and e.
///
/// p and q are taken on trust: nothing checks that they are prime. A
/// composite factor gives a key that derives fine but does not round-trip.
pub fn derive_keypair(p: &RsaBigInt, q: &RsaBigInt, e: &RsaBigInt) -> CryptoResult<RsaKeyPair> {
    let two = from_u64(2);
    if p < &two || q < &two {
        return Err(KeyParameterError::FactorTooSmall.into());
    }
    if p == q {
        return Err(KeyParameterError::EqualFactors.into());
    }

    let n = p * q;
    let phi = (p - 1u8) * (q - 1u8);

    // d = e^(-1) mod φ(n), only defined when gcd(e, φ) = 1
    let d = match mod_inverse(e, &phi) {
        Some(d) => d,
        None => {
            return Err(KeyParameterError::NotCoprime { gcd: gcd(e, &phi) }.into());
        }
    };

    debug!(n_bitlen = bit_length(&n), "derived key pair");

    Ok(RsaKeyPair {
        p: p.clone(),
        q: q.clone(),
        e: e.clone(),
        n,
        d,
    })
}

/// Derive the key pair for the default registration parameters
pub fn derive_default_keypair() -> CryptoResult<RsaKeyPair> {
    derive_keypair(&from_u64(DEFAULT_P), &from_u64(DEFAULT_Q), &from_u64(DEFAULT_E))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CryptoError;

    fn derive(p: u64, q: u64, e: u64) -> CryptoResult<RsaKeyPair> {
        derive_keypair(&from_u64(p), &from_u64(q), &from_u64(e))
    }

    #[test]
    fn test_textbook_key() {
        let keypair = derive_default_keypair().unwrap();
        assert_eq!(keypair.n, from_u64(3233));
        assert_eq!(keypair.d, from_u64(2753));
        assert_eq!(keypair.bit_length(), 12);
    }

    #[test]
    fn test_key_properties() {
        let primes = [3u64, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 61, 251, 257, 65537];
        let exponents = [3u64, 5, 7, 17, 257, 65537];
        for (i, &p) in primes.iter().enumerate() {
            for &q in &primes[i + 1..] {
                let phi = from_u64((p - 1) * (q - 1));
                for &e in &exponents {
                    match derive(p, q, e) {
                        Ok(keypair) => {
                            // Verify n = p * q and e * d ≡ 1 (mod φ(n))
                            assert_eq!(keypair.n, from_u64(p * q));
                            assert!(keypair.d < phi);
                            assert_eq!((&keypair.e * &keypair.d) % &phi, from_u64(1) % &phi);
                        }
                        Err(err) => {
                            assert!(matches!(
                                err,
                                CryptoError::InvalidKeyParameters(KeyParameterError::NotCoprime { .. })
                            ));
                            assert_ne!(gcd(&from_u64(e), &phi), from_u64(1));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let first = derive(1009, 1013, 65537).unwrap();
        for _ in 0..10 {
            let again = derive(1009, 1013, 65537).unwrap();
            assert_eq!(again.d, first.d);
            assert_eq!(again.n, first.n);
        }
    }

    #[test]
    fn test_equal_factors_rejected() {
        let result = derive(61, 61, 17);
        assert_eq!(
            result.unwrap_err(),
            CryptoError::InvalidKeyParameters(KeyParameterError::EqualFactors)
        );
    }

    #[test]
    fn test_not_coprime_rejected() {
        // φ = 8 shares the factor 2 with e
        let result = derive(3, 5, 2);
        assert_eq!(
            result.unwrap_err(),
            CryptoError::InvalidKeyParameters(KeyParameterError::NotCoprime {
                gcd: from_u64(2)
            })
        );
    }

    #[test]
    fn test_degenerate_factors_rejected() {
        for (p, q) in [(0u64, 5u64), (1, 5), (7, 1)] {
            assert_eq!(
                derive(p, q, 3).unwrap_err(),
                CryptoError::InvalidKeyParameters(KeyParameterError::FactorTooSmall)
            );
        }
    }

    #[test]
    fn test_from_decimal() {
        let keypair = RsaKeyPair::from_decimal("61", "53", "17").unwrap();
        assert_eq!(keypair.private_key(), RsaPrivateKey::from_decimal("2753", "3233").unwrap());
        assert_eq!(keypair.public_key(), RsaPublicKey::from_decimal("17", "3233").unwrap());

        let err = RsaKeyPair::from_decimal("61", "fifty-three", "17").unwrap_err();
        assert!(matches!(
            err,
            CryptoError::Arithmetic(ArithmeticError::MalformedInteger { .. })
        ));
    }

    #[test]
    fn test_zero_modulus_rejected() {
        assert_eq!(
            RsaPublicKey::from_decimal("17", "0"),
            Err(ArithmeticError::ZeroModulus)
        );
        assert_eq!(
            RsaPrivateKey::from_decimal("2753", "0"),
            Err(ArithmeticError::ZeroModulus)
        );
    }

    #[test]
    fn test_key_encrypt_decrypt() {
        let keypair = derive_default_keypair().unwrap();
        let payload = keypair.public_key().encrypt("Hello, RSA!").unwrap();
        let decrypted = keypair.private_key().decrypt(&payload.ciphertext).unwrap();
        assert_eq!(decrypted, "Hello, RSA!");
    }
}
