/*!
A frozen automaton, the states it is made of and the executor that runs it.

An [`Automaton`] is a graph of [`StateNode`]s connected by
[`TransitionTable`]s. It is assembled with a [`Builder`], which validates the
graph and freezes it. Once built, an automaton never changes, and any number
of threads may run searches against it through an [`Executor`] at the same
time.

The builder is also where states are duplicated with [`duplicate_state`] or
[`Builder::unroll`], which turns a state with a self-loop into a chain of
distinct states.

# Example

This builds an automaton for `ab*c` and runs it over a few haystacks.

```
use regex_dfa_exec::{
    dfa::{self, Builder, FinalState, MatcherState, StartState},
    util::{alphabet::ByteClassSet, captures::SlotSet},
    Span,
};

let mut set = ByteClassSet::empty();
for &b in b"abc" {
    set.set_range(b, b);
}
let classes = set.byte_classes();
let class = |b: u8| usize::from(classes.get(b));

let mut builder = Builder::new(classes, 1);
let (start, m0, m1, fin) = (
    builder.next_id()?,
    builder.next_id()?,
    builder.next_id()?,
    builder.next_id()?,
);
builder.add(StartState::new(start, Some(m0)).with_slots(SlotSet::one(0)))?;
let mut table = builder.empty_table();
table.set(class(b'a'), Some(m1));
builder.add(MatcherState::new(m0, table))?;
let mut table = builder.empty_table();
table.set(class(b'b'), Some(m1));
table.set(class(b'c'), Some(fin));
builder.add(MatcherState::new(m1, table))?;
builder.add(FinalState::new(fin).with_slots(SlotSet::one(1)))?;
builder.start_anchored(start);
let aut = builder.build()?;

let result = dfa::run_match(&aut, b"abbbc", 0, true)?;
assert_eq!(Some(Span::from(0..5)), result.captures().unwrap().get_match());

let result = dfa::run_match(&aut, b"xabc", 0, false)?;
assert_eq!(Some(Span::from(1..4)), result.captures().unwrap().get_match());

assert!(!dfa::run_match(&aut, b"abd", 0, true)?.is_match());

# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

pub use self::{
    automaton::{Automaton, Builder, LoopEnd},
    debug::Table,
    error::BuildError,
    exec::{Config, Executor},
    node::{
        FinalState, MatcherState, StartState, StateKind, StateNode,
        TraceFinderState, TransitionIter, TransitionTable, NO_SUCCESSOR,
    },
};

use crate::util::{
    primitives::StateID,
    search::{Input, MatchError, MatchResult},
};

mod accel;
mod automaton;
pub mod debug;
mod error;
pub mod exec;
pub mod node;

/// Run the automaton over `haystack` with the default configuration.
///
/// The search begins at `start`. When `anchored` is true, only a match
/// beginning exactly at `start` is reported. Otherwise, the match with the
/// leftmost starting offset at or after `start` is reported.
///
/// This returns an error only when `start` is greater than the length of
/// the haystack.
pub fn run_match(
    aut: &Automaton,
    haystack: &[u8],
    start: usize,
    anchored: bool,
) -> Result<MatchResult, MatchError> {
    let input = Input::new(haystack).start(start).anchored(anchored);
    Executor::new().search(aut, &input)
}

/// Return a copy of the given state under a new ID.
///
/// This is the same as [`StateNode::split_copy`].
pub fn duplicate_state(node: &StateNode, id: StateID) -> StateNode {
    node.split_copy(id)
}

/// Render the given state as a [`Table`].
///
/// This is the same as [`StateNode::debug_table`].
pub fn export_debug_table(node: &StateNode) -> Table {
    node.debug_table()
}
