/// Represents the four possible starting configurations of a search attempt.
///
/// The starting configuration is determined by inspecting the byte
/// immediately preceding the offset at which an attempt begins (if any). A
/// start state in an automaton has one transition per configuration, which is
/// how a single start state can dispatch to different entry points. For
/// example, an automaton for `^abc` sends `Start::Text` to the state matching
/// `a` and every other configuration to rejection.
///
/// Multiple entries in a start state's table may point to the same state if
/// the configurations are otherwise equivalent.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Start {
    /// This occurs when the starting position is not any of the ones below.
    NonWordByte = 0,
    /// This occurs when the byte immediately preceding the start of the
    /// attempt is an ASCII word byte.
    WordByte = 1,
    /// This occurs when the starting position of the attempt corresponds to
    /// the beginning of the haystack.
    Text = 2,
    /// This occurs when the byte immediately preceding the start of the
    /// attempt is a line terminator. Specifically, `\n`.
    Line = 3,
}

impl Start {
    /// Every starting configuration, in the order of their indices.
    pub const ALL: [Start; 4] =
        [Start::NonWordByte, Start::WordByte, Start::Text, Start::Line];

    /// Return the starting configuration corresponding to the given integer.
    /// If no starting configuration exists for the given integer, then None
    /// is returned.
    pub fn from_usize(n: usize) -> Option<Start> {
        Start::ALL.get(n).copied()
    }

    /// Returns the total number of starting configurations. This is also the
    /// length of every start state's transition table.
    pub const fn len() -> usize {
        4
    }

    /// Returns the starting configuration for an attempt beginning at `at`
    /// in the given haystack. If `at` is greater than the haystack length,
    /// then this panics.
    #[inline(always)]
    pub fn from_position_fwd(bytes: &[u8], at: usize) -> Start {
        assert!(at <= bytes.len(), "{} is invalid", at);
        if at == 0 {
            Start::Text
        } else if bytes[at - 1] == b'\n' {
            Start::Line
        } else if crate::util::is_word_byte(bytes[at - 1]) {
            Start::WordByte
        } else {
            Start::NonWordByte
        }
    }

    /// Return this starting configuration as an integer. It is guaranteed to
    /// be less than `Start::len()`.
    #[inline(always)]
    pub fn as_usize(&self) -> usize {
        *self as usize
    }
}
