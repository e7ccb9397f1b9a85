/*!
A collection of modules that provide APIs that are useful across the
automaton and its executor.

Most of these are re-exported at the crate root or from the `dfa` module, but
they are also available here for callers that assemble automata by hand.
*/

pub mod alphabet;
pub mod captures;
pub mod primitives;
pub mod search;
pub mod start;

pub(crate) mod escape;

/// Returns true if and only if the given byte is considered a word character.
/// This only applies to ASCII.
///
/// This was copied from regex-syntax so that we can use it to determine the
/// starting configuration of a search attempt without depending on
/// regex-syntax. The definition is never going to change, so there's no
/// maintenance/bit-rot hazard here.
#[inline(always)]
pub(crate) fn is_word_byte(b: u8) -> bool {
    match b {
        b'_' | b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' => true,
        _ => false,
    }
}
