/*!
Types and routines that support the search APIs of the executor.
*/

use core::ops::Range;

use crate::util::captures::Captures;

/// The parameters for a single run of an automaton.
///
/// An `Input` bundles the haystack with the offset at which searching begins
/// and whether the search is anchored:
///
/// * An **anchored** search only reports a match that starts exactly at
/// `start`.
/// * An **unanchored** search tries `start`, then `start + 1` and so on,
/// reporting the match with the leftmost starting offset.
///
/// The haystack itself is only ever read through bounds-checked accessors.
/// Reading past the end of the haystack is not an error; it simply means no
/// transition is possible.
#[derive(Clone, Copy)]
pub struct Input<'h> {
    haystack: &'h [u8],
    start: usize,
    anchored: bool,
}

impl<'h> Input<'h> {
    /// Create a new search configuration for the given haystack. By default,
    /// the search begins at offset `0` and is unanchored.
    #[inline]
    pub fn new<H: ?Sized + AsRef<[u8]>>(haystack: &'h H) -> Input<'h> {
        Input { haystack: haystack.as_ref(), start: 0, anchored: false }
    }

    /// Set the offset at which the search begins.
    ///
    /// An offset greater than the haystack length is permitted here, but
    /// searching with it returns [`MatchError::InvalidStart`].
    #[inline]
    pub fn start(mut self, start: usize) -> Input<'h> {
        self.start = start;
        self
    }

    /// Whether the search is anchored at its start offset.
    #[inline]
    pub fn anchored(mut self, yes: bool) -> Input<'h> {
        self.anchored = yes;
        self
    }

    /// Return the haystack.
    #[inline]
    pub fn haystack(&self) -> &'h [u8] {
        self.haystack
    }

    /// Return the offset at which the search begins.
    #[inline]
    pub fn get_start(&self) -> usize {
        self.start
    }

    /// Returns true if and only if the search is anchored.
    #[inline]
    pub fn get_anchored(&self) -> bool {
        self.anchored
    }

    /// Return the offset one past the last byte that may be read.
    #[inline]
    pub fn end(&self) -> usize {
        self.haystack.len()
    }

    /// Read the byte at the given offset, or `None` if it's out of bounds.
    #[inline(always)]
    pub fn get(&self, at: usize) -> Option<u8> {
        self.haystack.get(at).copied()
    }

    /// Check that the start offset is valid for the haystack.
    pub(crate) fn validate(&self) -> Result<(), MatchError> {
        if self.start > self.haystack.len() {
            return Err(MatchError::InvalidStart {
                start: self.start,
                len: self.haystack.len(),
            });
        }
        Ok(())
    }
}

impl<'h> core::fmt::Debug for Input<'h> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use crate::util::escape::DebugByte;

        struct Haystack<'a>(&'a [u8]);

        impl<'a> core::fmt::Debug for Haystack<'a> {
            fn fmt(
                &self,
                f: &mut core::fmt::Formatter,
            ) -> core::fmt::Result {
                write!(f, "\"")?;
                for &b in self.0 {
                    write!(f, "{:?}", DebugByte(b))?;
                }
                write!(f, "\"")
            }
        }

        f.debug_struct("Input")
            .field("haystack", &Haystack(self.haystack))
            .field("start", &self.start)
            .field("anchored", &self.anchored)
            .finish()
    }
}

impl<'h, H: ?Sized + AsRef<[u8]>> From<&'h H> for Input<'h> {
    fn from(haystack: &'h H) -> Input<'h> {
        Input::new(haystack)
    }
}

/// A representation of a span reported by an automaton.
///
/// A span corresponds to the starting and ending _byte offsets_ of a
/// contiguous region of bytes. The starting offset is inclusive while the
/// ending offset is exclusive. That is, a span is a half-open interval.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Span {
    /// The start offset of the span, inclusive.
    pub start: usize,
    /// The end offset of the span, exclusive.
    pub end: usize,
}

impl Span {
    /// Returns this span as a range.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        Range::from(*self)
    }

    /// Returns true when this span is empty. That is, when `start >= end`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl core::ops::Index<Span> for [u8] {
    type Output = [u8];

    #[inline]
    fn index(&self, index: Span) -> &[u8] {
        &self[index.range()]
    }
}

impl core::ops::Index<Span> for str {
    type Output = str;

    #[inline]
    fn index(&self, index: Span) -> &str {
        &self[index.range()]
    }
}

impl From<Range<usize>> for Span {
    #[inline]
    fn from(range: Range<usize>) -> Span {
        Span { start: range.start, end: range.end }
    }
}

impl From<Span> for Range<usize> {
    #[inline]
    fn from(span: Span) -> Range<usize> {
        Range { start: span.start, end: span.end }
    }
}

impl PartialEq<Range<usize>> for Span {
    #[inline]
    fn eq(&self, range: &Range<usize>) -> bool {
        self.start == range.start && self.end == range.end
    }
}

/// The outcome of running an automaton over an input.
///
/// Rejection is never an error. When no transition is possible from any
/// permitted starting offset, the result is simply `NoMatch`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MatchResult {
    /// No match was found.
    NoMatch,
    /// A match was found. The captures contain one entry per capture group
    /// of the automaton, which may be zero entries.
    Matched(Captures),
}

impl MatchResult {
    /// Returns true if and only if this is a match.
    #[inline]
    pub fn is_match(&self) -> bool {
        matches!(*self, MatchResult::Matched(_))
    }

    /// Returns the captures of a match, if there is one.
    #[inline]
    pub fn captures(&self) -> Option<&Captures> {
        match *self {
            MatchResult::NoMatch => None,
            MatchResult::Matched(ref caps) => Some(caps),
        }
    }

    /// Converts this result into its captures, if it's a match.
    #[inline]
    pub fn into_captures(self) -> Option<Captures> {
        match self {
            MatchResult::NoMatch => None,
            MatchResult::Matched(caps) => Some(caps),
        }
    }
}

/// An error that occurred while running an automaton.
///
/// A search never fails because of the input itself. These errors are
/// reserved for caller misuse and for limits the caller configured.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum MatchError {
    /// The start offset of the search was greater than the haystack length.
    InvalidStart {
        /// The start offset requested.
        start: usize,
        /// The length of the haystack.
        len: usize,
    },
    /// The search executed more states than the configured step limit
    /// permits.
    StepLimitExceeded {
        /// The configured limit.
        limit: usize,
        /// The cursor position when the search stopped.
        offset: usize,
    },
}

#[cfg(feature = "std")]
impl std::error::Error for MatchError {}

impl core::fmt::Display for MatchError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match *self {
            MatchError::InvalidStart { start, len } => write!(
                f,
                "invalid start offset {} for haystack of length {}",
                start, len,
            ),
            MatchError::StepLimitExceeded { limit, offset } => write!(
                f,
                "search exceeded step limit of {} at offset {}",
                limit, offset,
            ),
        }
    }
}
