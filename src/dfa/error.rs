use crate::{
    dfa::node::StateKind,
    util::{captures::SlotSet, escape::DebugByte, primitives::StateID},
};

/// An error that occurred while assembling an automaton.
///
/// This error does not provide many introspection capabilities. The main
/// thing you can do with it is obtain a human readable message via its
/// `std::fmt::Display` impl. Every error is detected by
/// [`Builder`](crate::dfa::Builder) before an
/// [`Automaton`](crate::dfa::Automaton) is produced, so an automaton that
/// exists is always well formed.
///
/// When the `std` feature is enabled, this implements the `std::error::Error`
/// trait.
#[derive(Clone, Debug)]
pub struct BuildError {
    kind: BuildErrorKind,
}

/// The kind of error that occurred while assembling an automaton.
///
/// Note that this error is non-exhaustive. Adding new variants is not
/// considered a breaking change.
#[derive(Clone, Debug)]
enum BuildErrorKind {
    /// No anchored start state was set.
    MissingStart,
    /// A start state was set to a state that isn't a start state.
    NotAStart { id: StateID, kind: StateKind },
    /// A reserved state ID never had a state added for it.
    UnknownState { id: StateID },
    /// A state ID was used that was never reserved or added.
    NoSuchState { id: StateID },
    /// Two states were added with the same ID.
    DuplicateState { id: StateID },
    /// A state's transition table has the wrong number of entries.
    WrongTableLength { id: StateID, expected: usize, got: usize },
    /// A transition refers to a state that doesn't exist.
    DanglingTransition { from: StateID, to: StateID },
    /// A start state transitions to another start state.
    StartToStart { from: StateID, to: StateID },
    /// A state records a slot outside of the automaton's capture groups.
    SlotOutOfRange { id: StateID, slot: usize, group_len: usize },
    /// More capture groups were requested than slots can represent.
    TooManyGroups { given: usize },
    /// More states were requested than state IDs can represent.
    TooManyStates,
    /// A state was unrolled that has no transition to itself.
    InvalidUnroll { id: StateID },
    /// A byte maps to a class outside of the alphabet, so no transition
    /// table could ever have an entry for it.
    InvalidByteClass { byte: u8, class: u8, alphabet_len: usize },
}

impl BuildError {
    fn kind(&self) -> &BuildErrorKind {
        &self.kind
    }

    pub(crate) fn missing_start() -> BuildError {
        BuildError { kind: BuildErrorKind::MissingStart }
    }

    pub(crate) fn not_a_start(id: StateID, kind: StateKind) -> BuildError {
        BuildError { kind: BuildErrorKind::NotAStart { id, kind } }
    }

    pub(crate) fn unknown_state(id: StateID) -> BuildError {
        BuildError { kind: BuildErrorKind::UnknownState { id } }
    }

    pub(crate) fn no_such_state(id: StateID) -> BuildError {
        BuildError { kind: BuildErrorKind::NoSuchState { id } }
    }

    pub(crate) fn duplicate_state(id: StateID) -> BuildError {
        BuildError { kind: BuildErrorKind::DuplicateState { id } }
    }

    pub(crate) fn wrong_table_length(
        id: StateID,
        expected: usize,
        got: usize,
    ) -> BuildError {
        BuildError {
            kind: BuildErrorKind::WrongTableLength { id, expected, got },
        }
    }

    pub(crate) fn dangling_transition(
        from: StateID,
        to: StateID,
    ) -> BuildError {
        BuildError { kind: BuildErrorKind::DanglingTransition { from, to } }
    }

    pub(crate) fn start_to_start(from: StateID, to: StateID) -> BuildError {
        BuildError { kind: BuildErrorKind::StartToStart { from, to } }
    }

    pub(crate) fn slot_out_of_range(
        id: StateID,
        slot: usize,
        group_len: usize,
    ) -> BuildError {
        BuildError {
            kind: BuildErrorKind::SlotOutOfRange { id, slot, group_len },
        }
    }

    pub(crate) fn too_many_groups(given: usize) -> BuildError {
        BuildError { kind: BuildErrorKind::TooManyGroups { given } }
    }

    pub(crate) fn too_many_states() -> BuildError {
        BuildError { kind: BuildErrorKind::TooManyStates }
    }

    pub(crate) fn invalid_unroll(id: StateID) -> BuildError {
        BuildError { kind: BuildErrorKind::InvalidUnroll { id } }
    }

    pub(crate) fn invalid_byte_class(
        byte: u8,
        class: u8,
        alphabet_len: usize,
    ) -> BuildError {
        BuildError {
            kind: BuildErrorKind::InvalidByteClass {
                byte,
                class,
                alphabet_len,
            },
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BuildError {}

impl core::fmt::Display for BuildError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self.kind() {
            BuildErrorKind::MissingStart => {
                write!(f, "automaton has no anchored start state")
            }
            BuildErrorKind::NotAStart { id, kind } => write!(
                f,
                "state {} is a {} state and cannot be used as a start state",
                id.as_usize(),
                kind.name(),
            ),
            BuildErrorKind::UnknownState { id } => write!(
                f,
                "state {} was reserved but never added",
                id.as_usize(),
            ),
            BuildErrorKind::NoSuchState { id } => {
                write!(f, "state {} does not exist", id.as_usize())
            }
            BuildErrorKind::DuplicateState { id } => {
                write!(f, "state {} was added more than once", id.as_usize())
            }
            BuildErrorKind::WrongTableLength { id, expected, got } => write!(
                f,
                "state {} has {} transitions but {} were expected",
                id.as_usize(),
                got,
                expected,
            ),
            BuildErrorKind::DanglingTransition { from, to } => write!(
                f,
                "state {} has a transition to state {}, which does not exist",
                from.as_usize(),
                to.as_usize(),
            ),
            BuildErrorKind::StartToStart { from, to } => write!(
                f,
                "start state {} has a transition to start state {}",
                from.as_usize(),
                to.as_usize(),
            ),
            BuildErrorKind::SlotOutOfRange { id, slot, group_len } => write!(
                f,
                "state {} records slot {} but the automaton only has {} \
                 capture groups",
                id.as_usize(),
                slot,
                group_len,
            ),
            BuildErrorKind::TooManyGroups { given } => write!(
                f,
                "{} capture groups exceeds limit of {}",
                given,
                SlotSet::LIMIT / 2,
            ),
            BuildErrorKind::TooManyStates => write!(
                f,
                "number of states exceeds limit of {}",
                StateID::LIMIT,
            ),
            BuildErrorKind::InvalidUnroll { id } => write!(
                f,
                "state {} cannot be unrolled because it has no transition \
                 to itself",
                id.as_usize(),
            ),
            BuildErrorKind::InvalidByteClass { byte, class, alphabet_len } => {
                write!(
                    f,
                    "byte {:?} maps to class {} but the alphabet only has {} \
                     classes",
                    DebugByte(byte),
                    class,
                    alphabet_len,
                )
            }
        }
    }
}
