//! test utilities shared by d1-client and its transport crates

use bytes::BytesMut;
use random_fast_rng::{FastRng, Random};

/// compare two arrays for equality
/// Returns true if arrays have the same length and corresponding elements are "equal"
/// ```
/// use d1_client_test_util::arrays_eq;
/// let first: Vec<u8> = vec![1,2,3,4,5];
/// let mut second: Vec<u8> = Vec::new();
/// second.extend_from_slice(&first);
/// assert!(arrays_eq(&first, &second));
/// ```
pub fn arrays_eq<T: PartialEq>(a1: &[T], a2: &[T]) -> bool {
    a1.len() == a2.len() && a1.iter().zip(a2.iter()).all(|(a, b)| a == b)
}

/// Random test data: KIKs, plaintexts, and nonces for mock servers.
/// Not cryptographically secure; production nonces come from `d1_client::rand`.
/// ```
/// use d1_client_test_util::random_bytes;
/// const BUF_LEN:usize = 128;
/// let data = random_bytes(BUF_LEN);
/// assert!(data.len() == BUF_LEN);
/// ```
pub fn random_bytes(len: usize) -> BytesMut {
    let mut buf = zeroed_bytes(len);
    FastRng::new().fill_bytes(buf.as_mut());
    buf
}

/// Random lowercase identifier of the given length, usable as a user or group id
/// ```
/// use d1_client_test_util::random_ident;
/// let id = random_ident(12);
/// assert_eq!(id.len(), 12);
/// assert!(id.chars().all(|c| c.is_ascii_lowercase()));
/// ```
pub fn random_ident(len: usize) -> String {
    const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzabcdef";
    let mut rng = FastRng::new();
    (0..len)
        .map(|_| LETTERS[rng.get_u8() as usize & 31] as char)
        .collect()
}

/// Returns a copy of `data` with one bit of the byte at `pos` flipped.
/// Used to simulate tampering with ciphertext in transit.
/// ```
/// use d1_client_test_util::flip_bit;
/// let orig = vec![0u8, 0, 0];
/// let t = flip_bit(&orig, 1);
/// assert_eq!(t, vec![0u8, 1, 0]);
/// ```
pub fn flip_bit(data: &[u8], pos: usize) -> Vec<u8> {
    let mut out = data.to_vec();
    out[pos] ^= 1;
    out
}

/// Create a zero-filled buffer of specific size.
/// ```
/// use d1_client_test_util::zeroed_bytes;
/// assert_eq!(zeroed_bytes(3).len(), 3);
/// ```
pub fn zeroed_bytes(sz: usize) -> BytesMut {
    let mut buf = BytesMut::with_capacity(sz);
    buf.resize(sz, 0);
    buf
}
