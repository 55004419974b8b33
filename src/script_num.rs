//! Script number encoding
//!
//! Little-endian magnitude with the sign carried in the high bit of the last
//! byte. Zero is the empty array. This matches Bitcoin Core's `CScriptNum`.

/// Encode `value` as minimal script-number bytes.
///
/// ```
/// use blvm_primitives::script_num::encode;
///
/// assert_eq!(encode(0), Vec::<u8>::new());
/// assert_eq!(encode(-1), vec![0x81]);
/// assert_eq!(encode(128), vec![0x80, 0x00]);
/// ```
pub fn encode(value: i64) -> Vec<u8> {
    if value == 0 {
        return Vec::new();
    }

    let negative = value < 0;
    let mut magnitude = value.unsigned_abs();
    let mut result = Vec::with_capacity(9);
    while magnitude > 0 {
        result.push((magnitude & 0xff) as u8);
        magnitude >>= 8;
    }

    // A set high bit would be read as the sign, so spill into an extra byte.
    let last = result.len() - 1;
    if result[last] & 0x80 != 0 {
        result.push(if negative { 0x80 } else { 0x00 });
    } else if negative {
        result[last] |= 0x80;
    }
    result
}

/// Decode script-number bytes of up to 8 bytes. Non-minimal encodings are
/// accepted; callers enforcing minimality check [`is_minimal`] first.
pub fn decode(data: &[u8]) -> Option<i64> {
    if data.is_empty() {
        return Some(0);
    }
    if data.len() > 8 {
        return None;
    }

    let mut magnitude: u64 = 0;
    for (i, byte) in data.iter().enumerate() {
        magnitude |= (*byte as u64) << (8 * i);
    }

    let sign_bit = 0x80u64 << (8 * (data.len() - 1));
    if magnitude & sign_bit != 0 {
        let magnitude = i64::try_from(magnitude & !sign_bit).ok()?;
        Some(-magnitude)
    } else {
        i64::try_from(magnitude).ok()
    }
}

/// True if `data` carries no redundant trailing zero (or sign-only) byte.
pub fn is_minimal(data: &[u8]) -> bool {
    match data {
        [] => true,
        [.., last] if last & 0x7f != 0 => true,
        [_] => false,
        [.., prev, _] => prev & 0x80 != 0,
    }
}
