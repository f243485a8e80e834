//! JSON records exchanged with the transport and storage layers.
//!
//! Every big integer travels as a base-10 string:
//!
//! - public key: `{ "e": "17", "n": "3233" }`
//! - private key (local only): `{ "d": "2753", "n": "3233" }`
//! - ciphertext: `{ "ciphertext": ["3017", ...], "n_bitlen": 12 }`

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rsa::{RsaPrivateKey, RsaPublicKey};

/// Failure to encode or decode a wire record.
#[derive(Debug, Error)]
#[error("invalid wire record: {0}")]
pub struct WireError(#[from] serde_json::Error);

/// Output of encryption: one decimal token per plaintext UTF-8 byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiphertextPayload {
    pub ciphertext: Vec<String>,
    /// Bit length of the modulus used to encrypt. Informational only.
    pub n_bitlen: u64,
}

/// JSON helpers shared by all records.
pub trait WireRecord: Serialize + DeserializeOwned {
    fn to_json(&self) -> Result<String, WireError> {
        Ok(serde_json::to_string(self)?)
    }

    fn to_json_pretty(&self) -> Result<String, WireError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn from_json(json: &str) -> Result<Self, WireError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl WireRecord for RsaPublicKey {}
impl WireRecord for RsaPrivateKey {}
impl WireRecord for CiphertextPayload {}

/// `#[serde(with = "decimal")]` for `BigUint` fields.
pub mod decimal {
    use num_bigint::BigUint;
    use serde::de::{self, Deserialize, Deserializer};
    use serde::Serializer;

    use crate::rsa::bigint::{parse_decimal, to_decimal};

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&to_decimal(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_decimal(&s).map_err(de::Error::custom)
    }
}
