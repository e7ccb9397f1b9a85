/*!
Lower level primitive types that are useful in a variety of circumstances.

# Overview

This list represents the principle types in this module and briefly describes
when you might want to use them.

* [`StateID`] - A type that represents the identifier of an automaton state.
It is always a `u16` internally, which keeps transition tables compact, and
its largest value is reserved as the "no successor" sentinel.
* [`NonMaxUsize`] - A type that is similar to `core::num::NonZeroUsize`, but
instead of not permitting a zero value, it does not permit a `usize::MAX`
value. Capture slots use `Option<NonMaxUsize>` so that an unset slot takes no
extra space.
*/

use core::{convert::TryFrom, num::NonZeroUsize};

use alloc::vec::Vec;

/// A `usize` that can never be `usize::MAX`.
///
/// This is similar to `core::num::NonZeroUsize`, but instead of not permitting
/// a zero value, this does not permit a max value.
///
/// This is useful in certain contexts where one wants to optimize the memory
/// usage of things that contain match offsets. Namely, since Rust slices
/// are guaranteed to never have a length exceeding `isize::MAX`, we can use
/// `usize::MAX` as a sentinel to indicate that no match was found. Indeed,
/// types like `Option<NonMaxUsize>` have exactly the same size in memory as a
/// `usize`.
#[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NonMaxUsize(NonZeroUsize);

impl NonMaxUsize {
    /// Create a new `NonMaxUsize` from the given value.
    ///
    /// This returns `None` only when the given value is equal to `usize::MAX`.
    #[inline]
    pub fn new(value: usize) -> Option<NonMaxUsize> {
        NonZeroUsize::new(value.wrapping_add(1)).map(NonMaxUsize)
    }

    /// Return the underlying `usize` value. The returned value is guaranteed
    /// to not equal `usize::MAX`.
    #[inline]
    pub fn get(self) -> usize {
        self.0.get().wrapping_sub(1)
    }
}

// We provide our own Debug impl because seeing the internal repr can be quite
// surprising if you aren't expecting it. e.g., 'NonMaxUsize(5)' vs just '5'.
impl core::fmt::Debug for NonMaxUsize {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{:?}", self.get())
    }
}

/// The identifier of a state in an automaton.
///
/// A state ID is unique within one automaton and stable for its lifetime.
/// IDs are handed out by whoever assembles the automaton, typically via
/// [`Builder::next_id`](crate::dfa::Builder::next_id), and are never reused.
///
/// # Representation
///
/// This type is always represented internally by a `u16` and is marked as
/// `repr(transparent)`. The value `u16::MAX` is not a valid state ID. It is
/// reserved for [`NO_SUCCESSOR`](crate::dfa::NO_SUCCESSOR), which marks a
/// transition that leads to rejection.
///
/// # Indexing
///
/// For convenience, callers may use a `StateID` to index slices.
#[repr(transparent)]
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, PartialEq, PartialOrd, Ord,
)]
pub struct StateID(u16);

impl StateID {
    /// The maximum state ID value.
    pub const MAX: StateID = StateID::new_unchecked(u16::MAX as usize - 1);

    /// The total number of states that are allowed in any single automaton.
    pub const LIMIT: usize = StateID::MAX.as_usize() + 1;

    /// The zero state ID value.
    pub const ZERO: StateID = StateID::new_unchecked(0);

    /// The number of bytes that a single `StateID` uses in memory.
    pub const SIZE: usize = core::mem::size_of::<StateID>();

    /// Create a new state ID.
    ///
    /// If the given identifier exceeds [`StateID::MAX`], then this returns
    /// an error.
    #[inline]
    pub fn new(id: usize) -> Result<StateID, StateIDError> {
        StateID::try_from(id)
    }

    /// Create a new state ID without checking whether the given value
    /// exceeds [`StateID::MAX`].
    ///
    /// Using this routine with an invalid value will result in unspecified
    /// behavior, but *not* undefined behavior. In particular, an invalid ID
    /// may be confused with the "no successor" sentinel.
    #[inline]
    pub const fn new_unchecked(id: usize) -> StateID {
        StateID(id as u16)
    }

    /// Like [`StateID::new`], but panics if the given ID is not valid.
    #[inline]
    pub fn must(id: usize) -> StateID {
        StateID::new(id).expect("invalid state ID")
    }

    /// Return this state ID as a `usize`.
    #[inline]
    pub const fn as_usize(&self) -> usize {
        self.0 as usize
    }

    /// Return the internal `u16` of this state ID.
    #[inline]
    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// Returns one more than this state ID as a usize.
    ///
    /// Since a state ID has constraints on its maximum value, adding `1` to
    /// it will always fit in a `u16`.
    #[inline]
    pub fn one_more(&self) -> usize {
        self.as_usize() + 1
    }
}

impl TryFrom<usize> for StateID {
    type Error = StateIDError;

    fn try_from(id: usize) -> Result<StateID, StateIDError> {
        if id > StateID::MAX.as_usize() {
            return Err(StateIDError { attempted: id as u64 });
        }
        Ok(StateID::new_unchecked(id))
    }
}

impl TryFrom<u32> for StateID {
    type Error = StateIDError;

    fn try_from(id: u32) -> Result<StateID, StateIDError> {
        if id > StateID::MAX.as_u16() as u32 {
            return Err(StateIDError { attempted: id as u64 });
        }
        Ok(StateID::new_unchecked(id as usize))
    }
}

impl From<u8> for StateID {
    fn from(id: u8) -> StateID {
        StateID::new_unchecked(id as usize)
    }
}

impl<T> core::ops::Index<StateID> for [T] {
    type Output = T;

    #[inline]
    fn index(&self, index: StateID) -> &T {
        &self[index.as_usize()]
    }
}

impl<T> core::ops::IndexMut<StateID> for [T] {
    #[inline]
    fn index_mut(&mut self, index: StateID) -> &mut T {
        &mut self[index.as_usize()]
    }
}

impl<T> core::ops::Index<StateID> for Vec<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: StateID) -> &T {
        &self[index.as_usize()]
    }
}

impl<T> core::ops::IndexMut<StateID> for Vec<T> {
    #[inline]
    fn index_mut(&mut self, index: StateID) -> &mut T {
        &mut self[index.as_usize()]
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for StateID {
    fn arbitrary(gen: &mut quickcheck::Gen) -> StateID {
        use core::cmp::min;

        let id = <u16 as quickcheck::Arbitrary>::arbitrary(gen);
        StateID::new_unchecked(min(id, StateID::MAX.as_u16()) as usize)
    }
}

/// This error occurs when a state ID could not be constructed.
///
/// This occurs when given an integer exceeding the maximum state ID value.
///
/// When the `std` feature is enabled, this implements the `Error` trait.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StateIDError {
    attempted: u64,
}

impl StateIDError {
    /// Returns the value that failed to constructed a state ID.
    pub fn attempted(&self) -> u64 {
        self.attempted
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StateIDError {}

impl core::fmt::Display for StateIDError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "failed to create state ID from {:?}, which exceeds {:?}",
            self.attempted(),
            StateID::MAX,
        )
    }
}
