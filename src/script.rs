//! Superscript and subscript variants of plain characters.
//!
//! Each entry of the table maps a character to its (superscript, subscript)
//! glyph pair.  A `'?'` in either slot means there is no such glyph, and
//! the character is left alone.

const NONE: char = '?';

static SCRIPT_MAP: &[(char, char, char)] = &[
    ('0', '⁰', '₀'),
    ('1', '¹', '₁'),
    ('2', '²', '₂'),
    ('3', '³', '₃'),
    ('4', '⁴', '₄'),
    ('5', '⁵', '₅'),
    ('6', '⁶', '₆'),
    ('7', '⁷', '₇'),
    ('8', '⁸', '₈'),
    ('9', '⁹', '₉'),
    ('+', '⁺', '₊'),
    ('-', '⁻', '₋'),
    ('=', '⁼', '₌'),
    ('(', '⁽', '₍'),
    (')', '⁾', '₎'),
    ('a', 'ᵃ', 'ₐ'),
    ('b', 'ᵇ', NONE),
    ('c', 'ᶜ', NONE),
    ('d', 'ᵈ', NONE),
    ('e', 'ᵉ', 'ₑ'),
    ('f', 'ᶠ', NONE),
    ('g', 'ᵍ', NONE),
    ('h', 'ʰ', 'ₕ'),
    ('i', 'ⁱ', 'ᵢ'),
    ('j', 'ʲ', 'ⱼ'),
    ('k', 'ᵏ', 'ₖ'),
    ('l', 'ˡ', 'ₗ'),
    ('m', 'ᵐ', 'ₘ'),
    ('n', 'ⁿ', 'ₙ'),
    ('o', 'ᵒ', 'ₒ'),
    ('p', 'ᵖ', 'ₚ'),
    ('q', NONE, NONE),
    ('r', 'ʳ', 'ᵣ'),
    ('s', 'ˢ', 'ₛ'),
    ('t', 'ᵗ', 'ₜ'),
    ('u', 'ᵘ', 'ᵤ'),
    ('v', 'ᵛ', 'ᵥ'),
    ('w', 'ʷ', NONE),
    ('x', 'ˣ', 'ₓ'),
    ('y', 'ʸ', NONE),
    ('z', 'ᶻ', NONE),
    ('A', 'ᴬ', NONE),
    ('B', 'ᴮ', NONE),
    ('D', 'ᴰ', NONE),
    ('E', 'ᴱ', NONE),
    ('G', 'ᴳ', NONE),
    ('H', 'ᴴ', NONE),
    ('I', 'ᴵ', NONE),
    ('J', 'ᴶ', NONE),
    ('K', 'ᴷ', NONE),
    ('L', 'ᴸ', NONE),
    ('M', 'ᴹ', NONE),
    ('N', 'ᴺ', NONE),
    ('O', 'ᴼ', NONE),
    ('P', 'ᴾ', NONE),
    ('R', 'ᴿ', NONE),
    ('T', 'ᵀ', NONE),
    ('U', 'ᵁ', NONE),
    ('V', 'ⱽ', NONE),
    ('W', 'ᵂ', NONE),
];

fn lookup(c: char) -> Option<(char, char)> {
    SCRIPT_MAP
        .iter()
        .find(|&&(k, _, _)| k == c)
        .map(|&(_, sup, sub)| (sup, sub))
}

fn or_original(c: char, translated: char) -> char {
    if translated == NONE {
        c
    } else {
        translated
    }
}

/// Return the superscript form of `c`, or `c` itself if there isn't one.
pub fn to_superscript(c: char) -> char {
    match lookup(c) {
        Some((sup, _)) => or_original(c, sup),
        None => c,
    }
}

/// Return the subscript form of `c`, or `c` itself if there isn't one.
pub fn to_subscript(c: char) -> char {
    match lookup(c) {
        Some((_, sub)) => or_original(c, sub),
        None => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits() {
        assert_eq!(to_superscript('2'), '²');
        assert_eq!(to_subscript('2'), '₂');
    }

    #[test]
    fn missing_variant_passes_through() {
        assert_eq!(to_subscript('b'), 'b');
        assert_eq!(to_superscript('q'), 'q');
        assert_eq!(to_subscript('W'), 'W');
    }

    #[test]
    fn unmapped_chars_are_identity() {
        for c in ['€', ' ', '?', 'Q', '.', '\t', '字'] {
            assert_eq!(to_superscript(c), c);
            assert_eq!(to_subscript(c), c);
        }
    }
}
