//! Autokey XOR stream cipher used by the plug wire protocol.
//!
//! Each byte is XORed with a running key. The key advances to the
//! ciphertext byte on encrypt and to the consumed input byte on decrypt,
//! which makes the two transforms exact inverses of each other.

const INITIAL_KEY: u8 = 0xab;

/// Cipher a plaintext buffer.
pub fn encrypt(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut key = INITIAL_KEY;
    for &b in data {
        let c = b ^ key;
        key = c;
        out.push(c);
    }
    out
}

/// Recover the plaintext of a ciphered buffer.
pub fn decrypt(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut key = INITIAL_KEY;
    for &b in data {
        out.push(b ^ key);
        key = b;
    }
    out
}
