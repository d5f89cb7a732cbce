//! Random resource names.
//!
//! Hosts get short uppercase alphanumeric names, operations get longer
//! lowercase ones, matching what the managed service hands out.

use rand::Rng;

const HOST_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const OPERATION_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Length of generated host names.
pub const HOST_NAME_LEN: usize = 5;
/// Length of generated operation names.
pub const OPERATION_NAME_LEN: usize = 15;

/// Generate a host name: uppercase letters and digits.
pub fn host_name(len: usize) -> String {
    sample(HOST_ALPHABET, len)
}

/// Generate an operation name: lowercase letters and digits.
pub fn operation_name(len: usize) -> String {
    sample(OPERATION_ALPHABET, len)
}

fn sample(alphabet: &[u8], len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())] as char)
        .collect()
}
