use alloc::{boxed::Box, format, vec::Vec};

use crate::{
    dfa::{
        accel::Accel,
        debug::Table,
        error::BuildError,
        node::{StateKind, StateNode, TransitionTable, NO_SUCCESSOR},
    },
    util::{
        alphabet::ByteClasses, captures::SlotSet, escape::DebugByte,
        primitives::StateID, start::Start,
    },
};

/// What happens at the end of a chain produced by [`Builder::unroll`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoopEnd {
    /// The last state of the chain rejects where the original state looped.
    /// This is what a bounded repetition like `a{2,5}` needs.
    Reject,
    /// The last state of the chain loops to itself, so the chain accepts any
    /// number of repetitions beyond its length. This is what a repetition
    /// like `a{5,}` needs.
    Keep,
}

/// An assembler for a frozen [`Automaton`].
///
/// A builder collects states, wires them together and then freezes them via
/// [`Builder::build`]. Freezing validates the whole graph, so every
/// structural problem is reported as a [`BuildError`] before execution
/// begins.
///
/// State IDs are allocated with [`Builder::next_id`], which makes it
/// possible to refer to a state before it has been added. Every allocated ID
/// must have a state by the time the automaton is built.
///
/// The builder is also where states are duplicated. [`Builder::duplicate`]
/// copies a state under a new ID and [`Builder::unroll`] uses duplication to
/// turn a self-loop into a chain of distinct states. Once built, an automaton
/// provides no way to add, remove or mutate states.
#[derive(Debug)]
pub struct Builder {
    classes: ByteClasses,
    group_len: usize,
    states: Vec<Option<StateNode>>,
    start_anchored: Option<StateID>,
    start_unanchored: Option<StateID>,
}

impl Builder {
    /// Create a new builder for an automaton whose matcher states are
    /// indexed by the given byte classes and which reports `group_len`
    /// capture groups.
    pub fn new(classes: ByteClasses, group_len: usize) -> Builder {
        Builder {
            classes,
            group_len,
            states: Vec::new(),
            start_anchored: None,
            start_unanchored: None,
        }
    }

    /// Returns the byte classes of the automaton being built.
    pub fn byte_classes(&self) -> &ByteClasses {
        &self.classes
    }

    /// Returns a transition table for a matcher or trace finder state in
    /// this automaton where every entry rejects.
    pub fn empty_table(&self) -> TransitionTable {
        TransitionTable::new(self.classes.alphabet_len())
    }

    /// Allocate a fresh state ID. A state with this ID must be added before
    /// the automaton is built.
    pub fn next_id(&mut self) -> Result<StateID, BuildError> {
        let id = StateID::new(self.states.len())
            .map_err(|_| BuildError::too_many_states())?;
        self.states.push(None);
        Ok(id)
    }

    /// Add a state.
    ///
    /// The state's ID need not have been allocated by [`Builder::next_id`],
    /// but it is an error to add two states with the same ID.
    pub fn add<N: Into<StateNode>>(
        &mut self,
        node: N,
    ) -> Result<(), BuildError> {
        let node = node.into();
        let id = node.id();
        if id == NO_SUCCESSOR {
            return Err(BuildError::too_many_states());
        }
        if id.as_usize() >= self.states.len() {
            self.states.resize_with(id.one_more(), || None);
        }
        if self.states[id].is_some() {
            return Err(BuildError::duplicate_state(id));
        }
        self.states[id] = Some(node);
        Ok(())
    }

    /// Returns the state with the given ID, if it has been added.
    pub fn node(&self, id: StateID) -> Option<&StateNode> {
        self.states.get(id.as_usize()).and_then(|s| s.as_ref())
    }

    /// Returns the state with the given ID for rewiring, if it has been
    /// added.
    pub fn node_mut(&mut self, id: StateID) -> Option<&mut StateNode> {
        self.states.get_mut(id.as_usize()).and_then(|s| s.as_mut())
    }

    /// Add a copy of the state `src` under the ID `new_id`.
    ///
    /// The copy has the same transitions as `src`, but its table is
    /// independently owned and may be rewired through
    /// [`Builder::node_mut`] without changing `src`.
    pub fn duplicate(
        &mut self,
        src: StateID,
        new_id: StateID,
    ) -> Result<(), BuildError> {
        let copy = match self.node(src) {
            None => return Err(self.missing(src)),
            Some(node) => node.split_copy(new_id),
        };
        self.add(copy)
    }

    /// Unroll the self-loop of the state `id` into a chain of `copies`
    /// duplicates.
    ///
    /// Given a state `S` with at least one transition to itself, this adds
    /// the duplicates `S1, ..., Sn` and rewires every self transition so
    /// that `S` leads to `S1`, `S1` leads to `S2` and so on. Transitions of
    /// `S` to other states are kept in every copy. What happens to the self
    /// transitions of the last state of the chain is determined by `end`.
    ///
    /// The chain is returned, starting with `id` itself. Transitions from
    /// other states into `S` are not changed, so they enter at the beginning
    /// of the chain.
    ///
    /// This returns an error without changing the builder if `copies` more
    /// states would exceed the limit on state IDs.
    pub fn unroll(
        &mut self,
        id: StateID,
        copies: usize,
        end: LoopEnd,
    ) -> Result<Vec<StateID>, BuildError> {
        match self.node(id) {
            None => return Err(self.missing(id)),
            Some(node) if !node.transitions().contains(id) => {
                return Err(BuildError::invalid_unroll(id));
            }
            Some(_) => {}
        }
        let len = self.states.len();
        if copies > StateID::LIMIT.saturating_sub(len) {
            return Err(BuildError::too_many_states());
        }
        let mut chain = Vec::with_capacity(copies + 1);
        chain.push(id);
        for _ in 0..copies {
            let copied = self.next_id().and_then(|new_id| {
                self.duplicate(id, new_id)?;
                Ok(new_id)
            });
            match copied {
                Ok(new_id) => chain.push(new_id),
                Err(err) => {
                    self.states.truncate(len);
                    return Err(err);
                }
            }
        }
        for pair in chain.windows(2) {
            self.rewire(pair[0], id, Some(pair[1]));
        }
        let last = chain[chain.len() - 1];
        match end {
            LoopEnd::Keep => self.rewire(last, id, Some(last)),
            LoopEnd::Reject => self.rewire(last, id, None),
        }
        debug!(
            "unrolled state {} into chain of {} states ({:?})",
            id.as_usize(),
            chain.len(),
            end,
        );
        Ok(chain)
    }

    /// The error for a state that hasn't been added. IDs that were reserved
    /// via `next_id` are reported differently from IDs that never were.
    fn missing(&self, id: StateID) -> BuildError {
        if id.as_usize() < self.states.len() {
            BuildError::unknown_state(id)
        } else {
            BuildError::no_such_state(id)
        }
    }

    fn rewire(&mut self, at: StateID, from: StateID, to: Option<StateID>) {
        if let Some(node) = self.node_mut(at) {
            node.transitions_mut().redirect(from, to);
        }
    }

    /// Set the start state used for anchored searches. This is required.
    pub fn start_anchored(&mut self, id: StateID) -> &mut Builder {
        self.start_anchored = Some(id);
        self
    }

    /// Set the start state used for unanchored searches. When this isn't
    /// set, unanchored searches use the anchored start state.
    pub fn start_unanchored(&mut self, id: StateID) -> &mut Builder {
        self.start_unanchored = Some(id);
        self
    }

    /// Validate and freeze the states added so far into an automaton.
    ///
    /// The builder is left untouched, so it may be modified and built again.
    /// Since states cannot be cloned implicitly, every state is copied into
    /// the automaton via its split copy under its own ID.
    pub fn build(&self) -> Result<Automaton, BuildError> {
        if self.group_len > SlotSet::LIMIT / 2 {
            return Err(BuildError::too_many_groups(self.group_len));
        }
        let start_anchored =
            self.start_anchored.ok_or_else(BuildError::missing_start)?;
        let start_unanchored = self.start_unanchored.unwrap_or(start_anchored);
        let alphabet_len = self.classes.alphabet_len();
        for b in 0..=255u8 {
            let class = self.classes.get(b);
            if usize::from(class) >= alphabet_len {
                return Err(BuildError::invalid_byte_class(
                    b,
                    class,
                    alphabet_len,
                ));
            }
        }
        let mut states = Vec::with_capacity(self.states.len());
        for (i, node) in self.states.iter().enumerate() {
            let node = match *node {
                None => {
                    return Err(BuildError::unknown_state(
                        StateID::new_unchecked(i),
                    ))
                }
                Some(ref node) => node,
            };
            self.validate(node)?;
            states.push(node.split_copy(node.id()));
        }
        for &start in [start_anchored, start_unanchored].iter() {
            match self.node(start) {
                None => return Err(self.missing(start)),
                Some(node) if node.kind() != StateKind::Start => {
                    return Err(BuildError::not_a_start(start, node.kind()));
                }
                Some(_) => {}
            }
        }
        let states = states.into_boxed_slice();
        let accel = Accel::from_start(
            &states[start_unanchored],
            &self.classes,
            |id| states.get(id.as_usize()),
        );
        debug!(
            "built automaton with {} states, {} groups and accelerator {:?}",
            states.len(),
            self.group_len,
            accel,
        );
        Ok(Automaton {
            classes: self.classes,
            group_len: self.group_len,
            states,
            start_anchored,
            start_unanchored,
            accel,
        })
    }

    fn validate(&self, node: &StateNode) -> Result<(), BuildError> {
        let id = node.id();
        let expected = match node.kind() {
            StateKind::Start => Start::len(),
            StateKind::Matcher | StateKind::TraceFinder => {
                self.classes.alphabet_len()
            }
            StateKind::Final => 0,
        };
        let got = node.transitions().len();
        if expected != got {
            return Err(BuildError::wrong_table_length(id, expected, got));
        }
        for next in node.transitions().iter().filter_map(|next| next) {
            let target = match self.node(next) {
                None => return Err(BuildError::dangling_transition(id, next)),
                Some(target) => target,
            };
            if node.kind() == StateKind::Start
                && target.kind() == StateKind::Start
            {
                return Err(BuildError::start_to_start(id, next));
            }
        }
        let slots = node.slots().union(node.accept().unwrap_or_default());
        if let Some(slot) = slots.max() {
            if slot >= self.group_len * 2 {
                return Err(BuildError::slot_out_of_range(
                    id,
                    slot,
                    self.group_len,
                ));
            }
        }
        Ok(())
    }
}

/// A frozen automaton ready for execution.
///
/// An automaton is produced by [`Builder::build`] and cannot be modified
/// afterwards. Every transition of every state refers to a state in the
/// automaton, and every start state is a [`StateKind::Start`] state.
///
/// Since an automaton is immutable, it may be shared between any number of
/// threads running searches at the same time. Runs are carried out by an
/// [`Executor`](crate::dfa::Executor).
pub struct Automaton {
    classes: ByteClasses,
    group_len: usize,
    states: Box<[StateNode]>,
    start_anchored: StateID,
    start_unanchored: StateID,
    accel: Option<Accel>,
}

impl Automaton {
    /// Returns the byte classes used to index the transition tables of
    /// matcher and trace finder states.
    pub fn byte_classes(&self) -> &ByteClasses {
        &self.classes
    }

    /// Returns the number of capture groups reported by a match.
    pub fn group_len(&self) -> usize {
        self.group_len
    }

    /// Returns the total number of states.
    pub fn state_len(&self) -> usize {
        self.states.len()
    }

    /// Returns the state with the given ID, if it exists.
    pub fn state(&self, id: StateID) -> Option<&StateNode> {
        self.states.get(id.as_usize())
    }

    /// Returns every state, ordered by ID.
    pub fn states(&self) -> &[StateNode] {
        &self.states
    }

    /// Returns the start state used for anchored searches.
    pub fn start_anchored(&self) -> StateID {
        self.start_anchored
    }

    /// Returns the start state used for unanchored searches.
    pub fn start_unanchored(&self) -> StateID {
        self.start_unanchored
    }

    /// Returns the bytes one of which must begin any match that doesn't
    /// start at offset `0`, when the automaton has a prefix accelerator.
    pub fn accelerator(&self) -> Option<&[u8]> {
        self.accel.as_ref().map(|a| a.needles())
    }

    pub(crate) fn accel(&self) -> Option<&Accel> {
        self.accel.as_ref()
    }

    /// Returns the state with the given ID. Every transition in a frozen
    /// automaton is valid, so this never fails for an ID read from one.
    #[inline(always)]
    pub(crate) fn get(&self, id: StateID) -> &StateNode {
        &self.states[id]
    }

    /// Render this automaton as a [`Table`].
    ///
    /// The table includes the number of groups, the start states and the
    /// byte classes, followed by one child table per state in ID order.
    pub fn debug_table(&self) -> Table {
        let mut table = Table::new("Automaton")
            .property("groups", self.group_len)
            .property("start_anchored", self.start_anchored.as_usize())
            .property("start_unanchored", self.start_unanchored.as_usize())
            .property("classes", format!("{:?}", self.classes));
        for state in self.states.iter() {
            table = table.child(state.debug_table());
        }
        table
    }
}

impl core::fmt::Debug for Automaton {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "dfa::Automaton(")?;
        for state in self.states.iter() {
            fmt_state_indicator(f, self, state)?;
            write!(f, "{:06?}: ", state.id().as_usize())?;
            match *state {
                StateNode::Start(ref s) => {
                    for (i, next) in s.table().iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        let start = Start::ALL[i];
                        match next {
                            None => write!(f, "{:?} => -", start)?,
                            Some(next) => write!(
                                f,
                                "{:?} => {:?}",
                                start,
                                next.as_usize()
                            )?,
                        }
                    }
                }
                _ => fmt_sparse(f, &self.classes, state.transitions())?,
            }
            if !state.slots().is_empty() {
                write!(f, " (slots: {:?})", state.slots())?;
            }
            writeln!(f, "")?;
        }
        writeln!(f, "")?;
        writeln!(f, "  anchored => {:06?}", self.start_anchored.as_usize())?;
        writeln!(
            f,
            "  unanchored => {:06?}",
            self.start_unanchored.as_usize()
        )?;
        writeln!(f, "groups: {:?}", self.group_len)?;
        if let Some(ref accel) = self.accel {
            writeln!(f, "accelerator: {:?}", accel)?;
        }
        writeln!(f, ")")?;
        Ok(())
    }
}

fn fmt_state_indicator(
    f: &mut core::fmt::Formatter<'_>,
    aut: &Automaton,
    state: &StateNode,
) -> core::fmt::Result {
    let id = state.id();
    if id == aut.start_anchored || id == aut.start_unanchored {
        write!(f, " >")
    } else {
        match state.kind() {
            StateKind::Final => write!(f, " *"),
            StateKind::Matcher if state.accept().is_some() => write!(f, "+*"),
            StateKind::TraceFinder => write!(f, " T"),
            _ => write!(f, "  "),
        }
    }
}

/// Write the transitions of a matcher or trace finder state as contiguous
/// byte ranges that lead to the same state. Rejecting transitions are
/// omitted.
fn fmt_sparse(
    f: &mut core::fmt::Formatter<'_>,
    classes: &ByteClasses,
    table: &TransitionTable,
) -> core::fmt::Result {
    let mut written = 0;
    let mut range: Option<(u8, u8, StateID)> = None;
    for b in 0..=255u8 {
        let next = table.get(usize::from(classes.get(b)));
        range = match (range, next) {
            (Some((start, end, prev)), Some(next))
                if prev == next && usize::from(end) + 1 == usize::from(b) =>
            {
                Some((start, b, prev))
            }
            (prev, next) => {
                if let Some(prev) = prev {
                    fmt_range(f, written, prev)?;
                    written += 1;
                }
                next.map(|next| (b, b, next))
            }
        };
    }
    if let Some(prev) = range {
        fmt_range(f, written, prev)?;
    }
    Ok(())
}

fn fmt_range(
    f: &mut core::fmt::Formatter<'_>,
    written: usize,
    (start, end, next): (u8, u8, StateID),
) -> core::fmt::Result {
    if written > 0 {
        write!(f, ", ")?;
    }
    if start == end {
        write!(f, "{:?} => {:?}", DebugByte(start), next.as_usize())
    } else {
        write!(
            f,
            "{:?}-{:?} => {:?}",
            DebugByte(start),
            DebugByte(end),
            next.as_usize(),
        )
    }
}
