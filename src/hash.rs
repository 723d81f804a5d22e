//! Process-name hashing for the per-process color.

/// djb2 string hash (`hash * 33 + byte`, seeded with 5381), wrapping at 64 bits.
///
/// Bytes are taken as unsigned. C versions that read the name through a
/// signed `char` sign-extend bytes of 0x80 and above, so non-ASCII names may
/// hash differently there; the role names are plain ASCII.
#[must_use]
pub fn djb2(s: &str) -> u64 {
    s.bytes().fold(5381u64, |hash, b| {
        hash.wrapping_shl(5).wrapping_add(hash).wrapping_add(u64::from(b))
    })
}

/// 256-color palette index for a process name.
#[must_use]
pub fn color256(name: &str) -> u8 {
    (djb2(name) % 256) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn djb2_known_values() {
        assert_eq!(djb2(""), 5381);
        assert_eq!(djb2("a"), 177_670);
        assert_eq!(djb2("b"), 177_671);
        assert_eq!(djb2("parent"), 6_953_891_550_095);
        // 0xc3 0xa9, added as unsigned bytes
        assert_eq!(djb2("\u{e9}"), 5_866_513);
    }

    #[test]
    fn colors_are_stable_per_name() {
        assert_eq!(color256("parent"), 143);
        assert_eq!(color256("control"), 230);
        assert_eq!(color256("ca"), 105);
        assert_eq!(color256("ikev2"), 166);
        assert_eq!(color256("ikev2"), color256("ikev2"));
    }
}
