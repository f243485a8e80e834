// Byte Whitening
// Fixed, key-independent bit shift applied around the numeric cipher

/// Shift every byte left by one bit, dropping bit 7.
///
/// This is lossy: a byte with its high bit set (any non-ASCII UTF-8 byte)
/// cannot be recovered by [`unwhiten`]. The loss is part of the scheme and
/// is kept so ciphertexts stay interchangeable with other implementations.
pub fn whiten(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().map(|&b| b << 1).collect()
}

/// Shift every byte right by one bit.
pub fn unwhiten(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().map(|&b| b >> 1).collect()
}
