//! Session write-key derivation.
//!
//! The gateway authorizes actuation writes with a key derived from the
//! user's password and the rotating token: AES-128-CBC with a fixed IV,
//! keyed by the password, encrypting the token. Only the first cipher
//! block matters; its hex encoding is the key embedded in write commands.

use aes::cipher::{generic_array::GenericArray, BlockEncryptMut, KeyIvInit};

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;

/// Fixed IV used by every Aqara gateway for write-key derivation.
const WRITE_KEY_IV: [u8; 16] = [
    0x17, 0x99, 0x6d, 0x09, 0x3d, 0x28, 0xdd, 0xb3, 0xba, 0x69, 0x5a, 0x2e, 0x6f, 0x58, 0x56,
    0x2e,
];

/// Derive the session write key from a password and the current token.
///
/// Deterministic: the same `(password, token)` pair always yields the same
/// key. Returns `None` if the password is not exactly 16 bytes or the
/// token is shorter than one cipher block; per protocol policy that is not
/// an error, it just suppresses writes upstream.
pub fn derive_write_key(password: &str, token: &str) -> Option<String> {
    let key: [u8; 16] = password.as_bytes().try_into().ok()?;
    let plaintext: [u8; 16] = token.as_bytes().get(..16)?.try_into().ok()?;

    let mut cipher = Aes128CbcEnc::new(&key.into(), &WRITE_KEY_IV.into());
    let mut block = GenericArray::from(plaintext);
    cipher.encrypt_block_mut(&mut block);

    Some(hex::encode(block))
}
