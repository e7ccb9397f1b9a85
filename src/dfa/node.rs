/*!
The states of an automaton and the transition tables that connect them.

Every state is a [`StateNode`], which is one of four variants:

* [`StartState`] - consumes nothing and picks an entry state based on the
[`Start`] configuration of the current position.
* [`MatcherState`] - consumes exactly one byte and follows the transition for
that byte's equivalence class. It may also be *accepting*, in which case it
remembers a match before trying to extend it.
* [`FinalState`] - consumes nothing and stops the run with a match.
* [`TraceFinderState`] - consumes one byte like a matcher but without any
capture bookkeeping. Rejecting from it proves that no match can start at or
after the current attempt.

States are connected through [`TransitionTable`]s. A table entry is either
the ID of another state or [`NO_SUCCESSOR`], which means rejection.

States can be duplicated under a fresh identifier with `split_copy`. The
copy's transition table is independently owned, so it can be rewired without
affecting the original. This is what lets an assembler turn a self-loop into
a chain of distinct states (see
[`Builder::unroll`](crate::dfa::Builder::unroll)).
*/

use alloc::{format, string::String, vec, vec::Vec};

use crate::{
    dfa::{
        debug::Table,
        exec::{Current, Frame},
    },
    util::{
        alphabet::ByteClasses, captures::SlotSet, primitives::StateID,
        search::Input, start::Start,
    },
};

/// The sentinel transition that leads to rejection.
///
/// This is never a valid [`StateID`]: it uses the one value of the underlying
/// representation that `StateID::new` refuses.
pub const NO_SUCCESSOR: StateID = StateID::new_unchecked(u16::MAX as usize);

/// An ordered sequence of successor state IDs.
///
/// For matcher and trace finder states, the table is indexed by the
/// equivalence class of the current byte and has exactly
/// [`ByteClasses::alphabet_len`] entries. For start states, it is indexed by
/// [`Start`] and has [`Start::len`] entries. Final states have an empty
/// table.
#[derive(Eq, PartialEq)]
pub struct TransitionTable {
    succ: Vec<StateID>,
}

impl TransitionTable {
    /// Create a table of the given length where every entry rejects.
    pub fn new(len: usize) -> TransitionTable {
        TransitionTable { succ: vec![NO_SUCCESSOR; len] }
    }

    /// Create a table from a sequence of successors, where `None` means
    /// rejection.
    pub fn from_successors<I>(successors: I) -> TransitionTable
    where
        I: IntoIterator<Item = Option<StateID>>,
    {
        let succ = successors
            .into_iter()
            .map(|next| next.unwrap_or(NO_SUCCESSOR))
            .collect();
        TransitionTable { succ }
    }

    /// Returns the number of entries in this table.
    #[inline]
    pub fn len(&self) -> usize {
        self.succ.len()
    }

    /// Returns true if and only if this table has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.succ.is_empty()
    }

    /// Returns the successor at the given index. This returns `None` when
    /// the entry is [`NO_SUCCESSOR`] or when the index is out of bounds.
    #[inline(always)]
    pub fn get(&self, index: usize) -> Option<StateID> {
        match self.succ.get(index) {
            Some(&next) if next != NO_SUCCESSOR => Some(next),
            _ => None,
        }
    }

    /// Set the successor at the given index, where `None` means rejection.
    ///
    /// # Panics
    ///
    /// This panics if `index >= self.len()`.
    #[inline]
    pub fn set(&mut self, index: usize, next: Option<StateID>) {
        self.succ[index] = next.unwrap_or(NO_SUCCESSOR);
    }

    /// Replace every entry equal to `from` with `to`, and return the number
    /// of entries that were changed.
    pub fn redirect(&mut self, from: StateID, to: Option<StateID>) -> usize {
        let to = to.unwrap_or(NO_SUCCESSOR);
        let mut count = 0;
        for next in self.succ.iter_mut() {
            if *next == from {
                *next = to;
                count += 1;
            }
        }
        count
    }

    /// Returns true if and only if some entry in this table is `id`.
    pub fn contains(&self, id: StateID) -> bool {
        self.succ.contains(&id)
    }

    /// Returns an iterator over every entry in order, where `None` means
    /// rejection.
    pub fn iter(&self) -> TransitionIter<'_> {
        TransitionIter { it: self.succ.iter() }
    }

    /// Returns the raw entries of this table, including sentinels.
    pub fn as_slice(&self) -> &[StateID] {
        &self.succ
    }

    /// Returns a new table with identical entries that shares nothing with
    /// this one.
    pub fn deep_copy(&self) -> TransitionTable {
        TransitionTable { succ: self.succ.to_vec() }
    }

    fn to_table(&self, keys: impl Fn(usize) -> String) -> Table {
        let mut table = Table::new("transitions");
        for (i, next) in self.iter().enumerate() {
            table = match next {
                None => table.property(&keys(i), "-"),
                Some(next) => table.property(&keys(i), next.as_usize()),
            };
        }
        table
    }
}

impl core::fmt::Debug for TransitionTable {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut list = f.debug_list();
        for next in self.iter() {
            match next {
                None => list.entry(&format_args!("-")),
                Some(next) => list.entry(&next.as_usize()),
            };
        }
        list.finish()
    }
}

/// An iterator over the entries of a [`TransitionTable`].
#[derive(Debug)]
pub struct TransitionIter<'a> {
    it: core::slice::Iter<'a, StateID>,
}

impl<'a> Iterator for TransitionIter<'a> {
    type Item = Option<StateID>;

    fn next(&mut self) -> Option<Option<StateID>> {
        self.it.next().map(|&next| {
            if next == NO_SUCCESSOR {
                None
            } else {
                Some(next)
            }
        })
    }
}

/// The role a state plays in an automaton.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StateKind {
    /// A [`StartState`].
    Start,
    /// A [`MatcherState`].
    Matcher,
    /// A [`FinalState`].
    Final,
    /// A [`TraceFinderState`].
    TraceFinder,
}

impl StateKind {
    /// The name used for this kind in debug output.
    pub fn name(&self) -> &'static str {
        match *self {
            StateKind::Start => "Start",
            StateKind::Matcher => "Matcher",
            StateKind::Final => "Final",
            StateKind::TraceFinder => "TraceFinder",
        }
    }
}

/// A single state of an automaton.
///
/// This deliberately does not implement `Clone`. The only way to copy a
/// state is [`StateNode::split_copy`], which always gives the copy a new
/// identity.
#[derive(Debug, Eq, PartialEq)]
pub enum StateNode {
    /// An initial state.
    Start(StartState),
    /// A state that consumes one byte.
    Matcher(MatcherState),
    /// An accepting state that ends the run.
    Final(FinalState),
    /// A state that consumes one byte and proves the absence of a match on
    /// rejection.
    TraceFinder(TraceFinderState),
}

impl StateNode {
    /// Returns the identifier of this state.
    #[inline]
    pub fn id(&self) -> StateID {
        match *self {
            StateNode::Start(ref s) => s.id,
            StateNode::Matcher(ref s) => s.id,
            StateNode::Final(ref s) => s.id,
            StateNode::TraceFinder(ref s) => s.id,
        }
    }

    /// Returns the kind of this state.
    #[inline]
    pub fn kind(&self) -> StateKind {
        match *self {
            StateNode::Start(_) => StateKind::Start,
            StateNode::Matcher(_) => StateKind::Matcher,
            StateNode::Final(_) => StateKind::Final,
            StateNode::TraceFinder(_) => StateKind::TraceFinder,
        }
    }

    /// Returns the transitions of this state.
    #[inline]
    pub fn transitions(&self) -> &TransitionTable {
        match *self {
            StateNode::Start(ref s) => &s.table,
            StateNode::Matcher(ref s) => &s.table,
            StateNode::Final(ref s) => &s.table,
            StateNode::TraceFinder(ref s) => &s.table,
        }
    }

    /// Returns the transitions of this state for rewiring.
    ///
    /// States inside a built [`Automaton`](crate::dfa::Automaton) are only
    /// ever reachable through shared references, so this is only usable
    /// while an automaton is being assembled.
    #[inline]
    pub fn transitions_mut(&mut self) -> &mut TransitionTable {
        match *self {
            StateNode::Start(ref mut s) => &mut s.table,
            StateNode::Matcher(ref mut s) => &mut s.table,
            StateNode::Final(ref mut s) => &mut s.table,
            StateNode::TraceFinder(ref mut s) => &mut s.table,
        }
    }

    /// Returns the capture slots this state records when it executes.
    #[inline]
    pub fn slots(&self) -> SlotSet {
        match *self {
            StateNode::Start(ref s) => s.slots,
            StateNode::Matcher(ref s) => s.slots,
            StateNode::Final(ref s) => s.slots,
            StateNode::TraceFinder(_) => SlotSet::empty(),
        }
    }

    /// Returns the slots recorded when this state accepts, if it does.
    ///
    /// Final states always accept with no extra slots. Matcher states accept
    /// only when configured to.
    #[inline]
    pub fn accept(&self) -> Option<SlotSet> {
        match *self {
            StateNode::Matcher(ref s) => s.accept,
            StateNode::Final(_) => Some(SlotSet::empty()),
            StateNode::Start(_) | StateNode::TraceFinder(_) => None,
        }
    }

    /// Create a copy of this state with the given ID.
    ///
    /// The copy is identical to this state except for two things: its ID is
    /// `id`, and its transition table is a fresh table with the same entries.
    /// Everything else is copied as is.
    pub fn split_copy(&self, id: StateID) -> StateNode {
        match *self {
            StateNode::Start(ref s) => StateNode::Start(s.split_copy(id)),
            StateNode::Matcher(ref s) => StateNode::Matcher(s.split_copy(id)),
            StateNode::Final(ref s) => StateNode::Final(s.split_copy(id)),
            StateNode::TraceFinder(ref s) => {
                StateNode::TraceFinder(s.split_copy(id))
            }
        }
    }

    /// Render this state as a [`Table`].
    ///
    /// The table is named after the state's kind and includes its ID, its
    /// slots and its complete transition table (with `-` for rejection).
    pub fn debug_table(&self) -> Table {
        let table = Table::new(self.kind().name())
            .property("id", self.id().as_usize())
            .property("slots", format!("{:?}", self.slots()));
        match *self {
            StateNode::Start(ref s) => table.child(s.table.to_table(|i| {
                match Start::from_usize(i) {
                    Some(start) => format!("{:?}", start),
                    None => format!("{}", i),
                }
            })),
            StateNode::Matcher(ref s) => {
                let accept = match s.accept {
                    None => String::from("none"),
                    Some(slots) => format!("{:?}", slots),
                };
                table
                    .property("accept", accept)
                    .child(s.table.to_table(|i| format!("{}", i)))
            }
            StateNode::Final(ref s) => {
                table.child(s.table.to_table(|i| format!("{}", i)))
            }
            StateNode::TraceFinder(ref s) => {
                table.child(s.table.to_table(|i| format!("{}", i)))
            }
        }
    }

    /// Run this state against the frame.
    ///
    /// On return, the frame's current position is either the next state to
    /// execute or one of the terminal markers.
    #[inline(always)]
    pub(crate) fn execute(
        &self,
        frame: &mut Frame,
        input: &Input<'_>,
        classes: &ByteClasses,
    ) {
        match *self {
            StateNode::Start(ref s) => s.execute(frame, input),
            StateNode::Matcher(ref s) => s.execute(frame, input, classes),
            StateNode::Final(ref s) => s.execute(frame),
            StateNode::TraceFinder(ref s) => s.execute(frame, input, classes),
        }
    }
}

impl From<StartState> for StateNode {
    fn from(s: StartState) -> StateNode {
        StateNode::Start(s)
    }
}

impl From<MatcherState> for StateNode {
    fn from(s: MatcherState) -> StateNode {
        StateNode::Matcher(s)
    }
}

impl From<FinalState> for StateNode {
    fn from(s: FinalState) -> StateNode {
        StateNode::Final(s)
    }
}

impl From<TraceFinderState> for StateNode {
    fn from(s: TraceFinderState) -> StateNode {
        StateNode::TraceFinder(s)
    }
}

/// An initial state.
///
/// A start state never consumes input. It records its slots (typically the
/// start of group `0`) and then dispatches on the [`Start`] configuration of
/// the current position. An automaton may have distinct start states for
/// anchored and unanchored runs.
#[derive(Debug, Eq, PartialEq)]
pub struct StartState {
    id: StateID,
    table: TransitionTable,
    slots: SlotSet,
}

impl StartState {
    /// Create a start state that dispatches every configuration to `entry`.
    pub fn new(id: StateID, entry: Option<StateID>) -> StartState {
        let table = TransitionTable::from_successors(
            Start::ALL.iter().map(|_| entry),
        );
        StartState { id, table, slots: SlotSet::empty() }
    }

    /// Set the entry used for one starting configuration.
    pub fn entry(mut self, start: Start, next: Option<StateID>) -> StartState {
        self.table.set(start.as_usize(), next);
        self
    }

    /// Set the slots recorded when this state executes.
    pub fn with_slots(mut self, slots: SlotSet) -> StartState {
        self.slots = slots;
        self
    }

    /// Returns the transitions of this state, indexed by [`Start`].
    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    /// Copy this state under a new ID with an independently owned table.
    pub fn split_copy(&self, id: StateID) -> StartState {
        StartState { id, table: self.table.deep_copy(), slots: self.slots }
    }

    #[inline(always)]
    fn execute(&self, frame: &mut Frame, input: &Input<'_>) {
        frame.record(self.slots);
        let start = Start::from_position_fwd(input.haystack(), frame.at);
        frame.current = match self.table.get(start.as_usize()) {
            None => Current::Reject,
            Some(next) => Current::State(next),
        };
    }
}

/// A state that consumes exactly one byte.
///
/// When executed, it first records its slots at the cursor. If it is
/// accepting, the current slots plus its accept slots are saved as the best
/// match so far. This gives greedy semantics: the run continues, and a later
/// accepting state replaces the saved match with a longer one. Finally, the
/// byte under the cursor is classified and its transition is followed. At
/// the end of the input, or when the transition is [`NO_SUCCESSOR`], the
/// state rejects.
#[derive(Debug, Eq, PartialEq)]
pub struct MatcherState {
    id: StateID,
    table: TransitionTable,
    slots: SlotSet,
    accept: Option<SlotSet>,
}

impl MatcherState {
    /// Create a non-accepting matcher state with the given transitions.
    pub fn new(id: StateID, table: TransitionTable) -> MatcherState {
        MatcherState { id, table, slots: SlotSet::empty(), accept: None }
    }

    /// Set the slots recorded when this state executes.
    pub fn with_slots(mut self, slots: SlotSet) -> MatcherState {
        self.slots = slots;
        self
    }

    /// Make this state accepting. When it executes, the given slots are
    /// recorded at the cursor in the saved match (typically the end of group
    /// `0`).
    pub fn with_accept(mut self, slots: SlotSet) -> MatcherState {
        self.accept = Some(slots);
        self
    }

    /// Returns the transitions of this state, indexed by byte class.
    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    /// Returns the accept slots of this state, if it's accepting.
    pub fn accept(&self) -> Option<SlotSet> {
        self.accept
    }

    /// Copy this state under a new ID with an independently owned table.
    pub fn split_copy(&self, id: StateID) -> MatcherState {
        MatcherState {
            id,
            table: self.table.deep_copy(),
            slots: self.slots,
            accept: self.accept,
        }
    }

    #[inline(always)]
    fn execute(
        &self,
        frame: &mut Frame,
        input: &Input<'_>,
        classes: &ByteClasses,
    ) {
        frame.record(self.slots);
        if let Some(accept) = self.accept {
            frame.save_match(accept);
        }
        let byte = match input.get(frame.at) {
            None => {
                frame.current = Current::Reject;
                return;
            }
            Some(byte) => byte,
        };
        frame.current = match self.table.get(usize::from(classes.get(byte))) {
            None => Current::Reject,
            Some(next) => {
                frame.at += 1;
                Current::State(next)
            }
        };
    }
}

/// An accepting state that ends the run.
///
/// It records its slots (typically the end of group `0`) at the cursor and
/// stops with a match without looking at any more input. Its transition
/// table is always empty.
#[derive(Debug, Eq, PartialEq)]
pub struct FinalState {
    id: StateID,
    table: TransitionTable,
    slots: SlotSet,
}

impl FinalState {
    /// Create a final state that records no slots.
    pub fn new(id: StateID) -> FinalState {
        FinalState {
            id,
            table: TransitionTable::new(0),
            slots: SlotSet::empty(),
        }
    }

    /// Set the slots recorded when this state executes.
    pub fn with_slots(mut self, slots: SlotSet) -> FinalState {
        self.slots = slots;
        self
    }

    /// Copy this state under a new ID with an independently owned table.
    pub fn split_copy(&self, id: StateID) -> FinalState {
        FinalState { id, table: self.table.deep_copy(), slots: self.slots }
    }

    #[inline(always)]
    fn execute(&self, frame: &mut Frame) {
        frame.record(self.slots);
        frame.save_match(SlotSet::empty());
        frame.current = Current::Accept;
    }
}

/// A state that consumes one byte without capture bookkeeping.
///
/// A trace finder is placed by an assembler on a branch that can only lead
/// to a match if the input has a particular shape. Rejecting from a trace
/// finder means that no match can begin at the current attempt's offset or
/// at any later offset, so the executor stops searching instead of retrying
/// at the next offset. A match saved earlier in the same attempt is still
/// reported.
#[derive(Debug, Eq, PartialEq)]
pub struct TraceFinderState {
    id: StateID,
    table: TransitionTable,
}

impl TraceFinderState {
    /// Create a trace finder state with the given transitions.
    pub fn new(id: StateID, table: TransitionTable) -> TraceFinderState {
        TraceFinderState { id, table }
    }

    /// Returns the transitions of this state, indexed by byte class.
    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    /// Copy this state under a new ID with an independently owned table.
    pub fn split_copy(&self, id: StateID) -> TraceFinderState {
        TraceFinderState { id, table: self.table.deep_copy() }
    }

    #[inline(always)]
    fn execute(
        &self,
        frame: &mut Frame,
        input: &Input<'_>,
        classes: &ByteClasses,
    ) {
        let next = input
            .get(frame.at)
            .and_then(|byte| self.table.get(usize::from(classes.get(byte))));
        frame.current = match next {
            None => Current::NoMatchPossible,
            Some(next) => {
                frame.at += 1;
                Current::State(next)
            }
        };
    }
}
