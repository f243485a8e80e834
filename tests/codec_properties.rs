//! Randomized property checks for the message codec.

use rand::{thread_rng, Rng};
use rsa_chat::rsa::bigint::{from_u64, gcd};
use rsa_chat::rsa::{derive_keypair, RsaKeyPair, PARALLEL_THRESHOLD};

const PRIMES: [u64; 10] = [257, 263, 269, 509, 521, 1009, 1013, 7919, 65521, 65537];
const EXPONENTS: [u64; 5] = [3, 5, 17, 257, 65537];

/// A random valid key pair; n is always above 255 so every byte survives.
fn random_keypair(rng: &mut impl Rng) -> RsaKeyPair {
    loop {
        let p = PRIMES[rng.gen_range(0..PRIMES.len())];
        let q = PRIMES[rng.gen_range(0..PRIMES.len())];
        let e = EXPONENTS[rng.gen_range(0..EXPONENTS.len())];
        if p == q {
            continue;
        }
        if let Ok(keypair) = derive_keypair(&from_u64(p), &from_u64(q), &from_u64(e)) {
            return keypair;
        }
    }
}

fn random_ascii(rng: &mut impl Rng, max_len: usize) -> String {
    let len = rng.gen_range(0..=max_len);
    (0..len).map(|_| rng.gen_range(0u8..0x80) as char).collect()
}

#[test]
fn derived_exponent_inverts_e() {
    let mut rng = thread_rng();
    for _ in 0..100 {
        let keypair = random_keypair(&mut rng);
        let phi = (&keypair.p - 1u8) * (&keypair.q - 1u8);
        assert_eq!(gcd(&keypair.e, &phi), from_u64(1));
        assert_eq!((&keypair.e * &keypair.d) % &phi, from_u64(1));
    }
}

#[test]
fn ascii_roundtrip() {
    let mut rng = thread_rng();
    for _ in 0..100 {
        let keypair = random_keypair(&mut rng);
        let message = random_ascii(&mut rng, 200);
        let payload = keypair.public_key().encrypt(&message).unwrap();
        assert_eq!(payload.ciphertext.len(), message.len());
        assert_eq!(payload.n_bitlen, keypair.bit_length());
        assert_eq!(keypair.private_key().decrypt(&payload.ciphertext).unwrap(), message);
    }
}

#[test]
fn ciphertext_length_is_utf8_length() {
    let mut rng = thread_rng();
    let keypair = random_keypair(&mut rng);
    for _ in 0..50 {
        let len = rng.gen_range(0..100);
        let message: String = (0..len).map(|_| rng.gen::<char>()).collect();
        let payload = keypair.public_key().encrypt(&message).unwrap();
        assert_eq!(payload.ciphertext.len(), message.len());
    }
}

#[test]
fn non_ascii_keeps_low_seven_bits() {
    let mut rng = thread_rng();
    let keypair = random_keypair(&mut rng);
    let message = "naïve café ☕";
    let payload = keypair.public_key().encrypt(message).unwrap();
    let decrypted = keypair.private_key().decrypt(&payload.ciphertext).unwrap();

    let expected: Vec<u8> = message.bytes().map(|b| b & 0x7f).collect();
    assert_eq!(decrypted.as_bytes(), expected.as_slice());
}

#[test]
fn concurrent_callers_agree() {
    let keypair = random_keypair(&mut thread_rng());
    let message = "shared message ".repeat(PARALLEL_THRESHOLD);
    let expected = keypair.public_key().encrypt(&message).unwrap();

    let (keypair, message) = (&keypair, &message);
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                s.spawn(move || {
                    let payload = keypair.public_key().encrypt(&message).unwrap();
                    let decrypted = keypair.private_key().decrypt(&payload.ciphertext).unwrap();
                    (payload, decrypted)
                })
            })
            .collect();

        for handle in handles {
            let (payload, decrypted) = handle.join().unwrap();
            assert_eq!(payload, expected);
            assert_eq!(&decrypted, message);
        }
    });
}
