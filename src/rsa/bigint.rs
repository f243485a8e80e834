// RSA Big Integer Operations
// Wrapper around num-bigint for the arithmetic the codec needs

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::error::ArithmeticError;

/// RSA Big Integer type alias
pub type RsaBigInt = BigUint;

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RsaBigInt {
    RsaBigInt::from(n)
}

/// Parse a strict base-10 integer: ASCII digits only, at least one.
pub fn parse_decimal(s: &str) -> Result<RsaBigInt, ArithmeticError> {
    let malformed = || ArithmeticError::MalformedInteger {
        input: s.to_string(),
    };

    // parse_bytes alone would accept a leading '+' and '_' separators
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }

    RsaBigInt::parse_bytes(s.as_bytes(), 10).ok_or_else(malformed)
}

/// Render a big integer as a base-10 string
pub fn to_decimal(n: &RsaBigInt) -> String {
    n.to_str_radix(10)
}

/// Number of significant bits (0 for zero)
pub fn bit_length(n: &RsaBigInt) -> u64 {
    n.bits()
}

/// Modular exponentiation: base^exp mod modulus
/// Square-and-multiply, walking the exponent bits from least to most significant
pub fn mod_pow(
    base: &RsaBigInt,
    exp: &RsaBigInt,
    modulus: &RsaBigInt,
) -> Result<RsaBigInt, ArithmeticError> {
    if modulus.is_zero() {
        return Err(ArithmeticError::ZeroModulus);
    }
    if modulus.is_one() {
        return Ok(RsaBigInt::zero());
    }

    let mut result = RsaBigInt::one();
    let mut base = base % modulus;

    for i in 0..exp.bits() {
        if exp.bit(i) {
            result = (&result * &base) % modulus;
        }
        base = (&base * &base) % modulus;
    }

    Ok(result)
}

/// Extended Euclidean Algorithm
/// Returns (gcd, x, y) such that a*x + b*y = gcd = gcd(a, b)
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    if b.is_zero() {
        return (a.clone(), BigInt::one(), BigInt::zero());
    }

    let (gcd, x1, y1) = extended_gcd(b, &(a % b));
    let y = x1 - (a / b) * &y1;

    (gcd, y1, y)
}

/// Compute modular inverse: a^(-1) mod m, normalized into [0, m)
/// Returns None if inverse doesn't exist
pub fn mod_inverse(a: &RsaBigInt, m: &RsaBigInt) -> Option<RsaBigInt> {
    if m.is_zero() {
        return None;
    }

    let m_signed = BigInt::from(m.clone());
    let (gcd, x, _) = extended_gcd(&BigInt::from(a.clone()), &m_signed);

    if !gcd.is_one() {
        return None;
    }

    // mod_floor lands in [0, m) even when x is negative
    x.mod_floor(&m_signed).to_biguint()
}

/// Greatest common divisor
pub fn gcd(a: &RsaBigInt, b: &RsaBigInt) -> RsaBigInt {
    a.gcd(b)
}
