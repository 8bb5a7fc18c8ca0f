//! Prefixed short identifiers (`tsk-…`, `prj-…`, `act-…`).

use rand::Rng;

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 10;

/// Generate a fresh id with the given prefix, e.g. `tsk-4k9fz02qhx`.
///
/// 36^10 random suffixes make collisions a non-concern at this scale; the
/// store's primary-key constraint is the backstop.
#[must_use]
pub fn new_id(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let mut out = String::with_capacity(prefix.len() + 1 + SUFFIX_LEN);
    out.push_str(prefix);
    out.push('-');
    for _ in 0..SUFFIX_LEN {
        out.push(ALPHABET[rng.gen_range(0..ALPHABET.len())] as char);
    }
    out
}

/// Id prefix for tasks.
pub const TASK: &str = "tsk";
/// Id prefix for projects.
pub const PROJECT: &str = "prj";
/// Id prefix for activity entries.
pub const ACTIVITY: &str = "act";

#[cfg(test)]
mod tests {
    use super::{SUFFIX_LEN, TASK, new_id};
    use std::collections::HashSet;

    #[test]
    fn ids_have_prefix_and_fixed_length() {
        let id = new_id(TASK);
        assert!(id.starts_with("tsk-"));
        assert_eq!(id.len(), TASK.len() + 1 + SUFFIX_LEN);
        assert!(
            id[4..]
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn ids_do_not_collide_in_practice() {
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(new_id(TASK)));
        }
    }
}
