/*!
Types for recording and reporting capture group offsets.

A capture group `g` is represented by two *slots*: slot `2g` holds the start
offset of the group and slot `2g + 1` holds its end offset. Group `0` is, by
convention, the overall match. States in an automaton record the current
cursor into a set of slots (a [`SlotSet`]) as they are executed, and a
successful run reports the recorded offsets as [`Captures`].
*/

use alloc::vec::Vec;

use crate::util::{primitives::NonMaxUsize, search::Span};

/// A set of capture slot indices that a state records when it executes.
///
/// This is represented as a 64-bit bitset, which means slots must be less
/// than [`SlotSet::LIMIT`] and an automaton may have at most
/// `SlotSet::LIMIT / 2` capture groups.
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct SlotSet(u64);

impl SlotSet {
    /// The total number of distinct slots representable in a set.
    pub const LIMIT: usize = 64;

    /// Create an empty set of slots.
    #[inline]
    pub const fn empty() -> SlotSet {
        SlotSet(0)
    }

    /// Create a set containing exactly one slot.
    ///
    /// # Panics
    ///
    /// This panics if `slot >= SlotSet::LIMIT`.
    #[inline]
    pub fn one(slot: usize) -> SlotSet {
        SlotSet::empty().insert(slot)
    }

    /// Create a set containing the start slot of the given group.
    #[inline]
    pub fn group_start(group: usize) -> SlotSet {
        SlotSet::one(group * 2)
    }

    /// Create a set containing the end slot of the given group.
    #[inline]
    pub fn group_end(group: usize) -> SlotSet {
        SlotSet::one(group * 2 + 1)
    }

    /// Return a new set with the given slot added.
    ///
    /// # Panics
    ///
    /// This panics if `slot >= SlotSet::LIMIT`.
    #[inline]
    pub fn insert(self, slot: usize) -> SlotSet {
        assert!(
            slot < SlotSet::LIMIT,
            "slot {} exceeds limit of {}",
            slot,
            SlotSet::LIMIT,
        );
        SlotSet(self.0 | (1 << slot))
    }

    /// Return the union of this set and the one given.
    #[inline]
    pub fn union(self, other: SlotSet) -> SlotSet {
        SlotSet(self.0 | other.0)
    }

    /// Returns true if and only if the given slot is in this set.
    #[inline]
    pub fn contains(self, slot: usize) -> bool {
        slot < SlotSet::LIMIT && self.0 & (1 << slot) != 0
    }

    /// Returns true if and only if this set has no slots.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the number of slots in this set.
    #[inline]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns the largest slot in this set, if any.
    #[inline]
    pub fn max(self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(63 - self.0.leading_zeros() as usize)
        }
    }

    /// Returns an iterator over every slot in this set in ascending order.
    pub fn iter(self) -> SlotSetIter {
        SlotSetIter(self.0)
    }

    /// Write `at` into every slot of `slots` that is in this set. Slots in
    /// this set that are out of bounds for `slots` are ignored.
    #[inline(always)]
    pub(crate) fn apply(self, at: usize, slots: &mut [Option<NonMaxUsize>]) {
        let mut bits = self.0;
        while bits != 0 {
            let slot = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            if let Some(s) = slots.get_mut(slot) {
                *s = NonMaxUsize::new(at);
            }
        }
    }
}

impl core::fmt::Debug for SlotSet {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// An iterator over the slots in a [`SlotSet`].
#[derive(Clone, Debug)]
pub struct SlotSetIter(u64);

impl Iterator for SlotSetIter {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.0 == 0 {
            return None;
        }
        let slot = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Some(slot)
    }
}

/// The capture group offsets reported by a successful run.
///
/// A `Captures` value has exactly `group_len()` groups. A group that did not
/// participate in the match (i.e., either of its slots was never recorded)
/// is reported as `None`.
#[derive(Clone, Eq, PartialEq)]
pub struct Captures {
    slots: Vec<Option<NonMaxUsize>>,
}

impl Captures {
    pub(crate) fn new(slots: Vec<Option<NonMaxUsize>>) -> Captures {
        debug_assert!(slots.len() % 2 == 0);
        Captures { slots }
    }

    /// Returns the total number of capture groups, including groups that did
    /// not participate in the match.
    #[inline]
    pub fn group_len(&self) -> usize {
        self.slots.len() / 2
    }

    /// Returns the span of the given group, if it participated in the match.
    #[inline]
    pub fn get_group(&self, index: usize) -> Option<Span> {
        let start = self.slots.get(index.checked_mul(2)?)?.as_ref()?.get();
        let end = self.slots.get(index * 2 + 1)?.as_ref()?.get();
        Some(Span { start, end })
    }

    /// Returns the span of the overall match, which is group `0` by
    /// convention. This returns `None` when the automaton has no groups.
    #[inline]
    pub fn get_match(&self) -> Option<Span> {
        self.get_group(0)
    }

    /// Returns an iterator over every group in order.
    pub fn iter(&self) -> CapturesIter<'_> {
        CapturesIter { caps: self, index: 0 }
    }

    /// Returns the raw slots, two per group.
    pub fn slots(&self) -> &[Option<NonMaxUsize>] {
        &self.slots
    }
}

impl core::fmt::Debug for Captures {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut list = f.debug_list();
        for span in self.iter() {
            match span {
                None => list.entry(&None::<()>),
                Some(span) => list.entry(&(span.start..span.end)),
            };
        }
        list.finish()
    }
}

/// An iterator over the groups in [`Captures`].
#[derive(Debug)]
pub struct CapturesIter<'a> {
    caps: &'a Captures,
    index: usize,
}

impl<'a> Iterator for CapturesIter<'a> {
    type Item = Option<Span>;

    fn next(&mut self) -> Option<Option<Span>> {
        if self.index >= self.caps.group_len() {
            return None;
        }
        let span = self.caps.get_group(self.index);
        self.index += 1;
        Some(span)
    }
}
