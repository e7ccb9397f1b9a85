// This module defines a prefix accelerator for unanchored searches.
//
// An unanchored search retries every offset of the haystack in turn. For most
// automata, the vast majority of those attempts die on the very first byte.
// When every entry point reachable from a non-Text starting configuration is
// a plain (non-accepting) matcher state, the set of bytes that can possibly
// begin a match is just the union of the bytes those matchers have a
// transition for. If that set is small, memchr can find the next candidate
// offset much faster than executing the automaton at every offset.
//
// The Text configuration is excluded since it only ever applies at offset 0,
// which is never skipped. Start states that lead to final states, accepting
// matchers or trace finders disqualify acceleration, since executing them can
// report a match or stop the search without reading a byte.

use crate::{
    dfa::node::{StateNode, NO_SUCCESSOR},
    util::{
        alphabet::{ByteClasses, ByteSet},
        primitives::StateID,
        start::Start,
    },
};

/// The maximum number of needle bytes supported by an accelerator.
const ACCEL_LEN: usize = 3;

/// Return the offset of the first occurrence of any of the given needles in
/// `haystack[at..]`. When `needles` is empty, this always returns `None`.
#[inline(always)]
pub(crate) fn find_fwd(
    needles: &[u8],
    haystack: &[u8],
    at: usize,
) -> Option<usize> {
    let bs = needles;
    let i = match needles.len() {
        0 => return None,
        1 => memchr::memchr(bs[0], &haystack[at..])?,
        2 => memchr::memchr2(bs[0], bs[1], &haystack[at..])?,
        3 => memchr::memchr3(bs[0], bs[1], bs[2], &haystack[at..])?,
        n => unreachable!("invalid needles length: {}", n),
    };
    Some(at + i)
}

/// A set of at most three bytes, one of which must occur at the beginning of
/// any match that doesn't start at offset `0`.
#[derive(Clone, Copy, Eq, PartialEq)]
pub(crate) struct Accel {
    bytes: [u8; ACCEL_LEN],
    len: u8,
}

impl Accel {
    /// Compute an accelerator for the given unanchored start state.
    ///
    /// `lookup` maps a state ID to its state. This returns `None` when the
    /// entry points of the start state can't be summarized as a small set
    /// of bytes.
    pub(crate) fn from_start<'a, F>(
        start: &StateNode,
        classes: &ByteClasses,
        lookup: F,
    ) -> Option<Accel>
    where
        F: Fn(StateID) -> Option<&'a StateNode>,
    {
        let table = match *start {
            StateNode::Start(ref s) => s.table(),
            _ => return None,
        };
        let mut set = ByteSet::empty();
        for &config in Start::ALL.iter() {
            if config == Start::Text {
                continue;
            }
            let entry = table.as_slice()[config.as_usize()];
            if entry == NO_SUCCESSOR {
                continue;
            }
            let matcher = match *lookup(entry)? {
                StateNode::Matcher(ref m) if m.accept().is_none() => m,
                _ => return None,
            };
            for byte in 0..=255u8 {
                let class = usize::from(classes.get(byte));
                if matcher.table().get(class).is_some() {
                    set.add(byte);
                    if set.len() > ACCEL_LEN {
                        return None;
                    }
                }
            }
        }
        let mut accel = Accel { bytes: [0; ACCEL_LEN], len: 0 };
        for byte in set.iter() {
            accel.bytes[usize::from(accel.len)] = byte;
            accel.len += 1;
        }
        Some(accel)
    }

    /// Returns the needle bytes of this accelerator.
    #[inline(always)]
    pub(crate) fn needles(&self) -> &[u8] {
        &self.bytes[..usize::from(self.len)]
    }

    /// Return the first offset at or after `at` that can begin a match.
    #[inline(always)]
    pub(crate) fn find(&self, haystack: &[u8], at: usize) -> Option<usize> {
        find_fwd(self.needles(), haystack, at)
    }
}

impl core::fmt::Debug for Accel {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use crate::util::escape::DebugByte;

        let mut list = f.debug_list();
        for &b in self.needles() {
            list.entry(&DebugByte(b));
        }
        list.finish()
    }
}
