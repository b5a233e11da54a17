//! Collision-free symbol name generation.

use rand::RngExt;

const SUFFIX_LEN: usize = 10;
const SUFFIX_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a symbol name of the form `<prefix>_<10 random chars>`.
///
/// Every symbol appended to a map's symbol set gets a fresh name from here,
/// which keeps names unique within one exported document without a registry.
pub fn symbol_name(prefix: &str) -> String {
    let mut rng = rand::rng();
    let mut out = String::with_capacity(prefix.len() + 1 + SUFFIX_LEN);
    out.push_str(prefix);
    out.push('_');
    for _ in 0..SUFFIX_LEN {
        let idx = rng.random_range(0..SUFFIX_CHARSET.len());
        out.push(SUFFIX_CHARSET[idx] as char);
    }
    out
}
