/*!
The executor, which runs a frozen [`Automaton`] over a haystack.

A run consists of one or more *attempts*. Each attempt begins at an offset
in the haystack with the automaton's start state, and repeatedly executes the
current state until the attempt accepts, rejects or proves that no match is
possible anywhere after its starting offset. An anchored search makes exactly
one attempt. An unanchored search makes an attempt at every offset from the
start of the search until one of them matches, which means the match
reported always has the leftmost possible starting offset.

All mutable state of a run lives in a `Frame` that is created when the
run begins and dropped when it ends. Neither the automaton nor the executor
is mutated by a search, so both may be shared freely between threads.
*/

use alloc::{vec, vec::Vec};

use crate::{
    dfa::automaton::Automaton,
    util::{
        captures::{Captures, SlotSet},
        primitives::{NonMaxUsize, StateID},
        search::{Input, MatchError, MatchResult},
    },
};

/// The configuration used for running an automaton.
///
/// Every option has a default that is used when it isn't set explicitly.
#[derive(Clone, Debug, Default)]
pub struct Config {
    step_limit: Option<Option<usize>>,
    accelerate: Option<bool>,
}

impl Config {
    /// Return a new default configuration.
    pub fn new() -> Config {
        Config::default()
    }

    /// Set the maximum number of states that may be executed in a single
    /// search, summed over all attempts.
    ///
    /// When the limit is exceeded, the search stops and returns
    /// [`MatchError::StepLimitExceeded`]. This bounds the work done for very
    /// long haystacks, since an unanchored search can take time quadratic in
    /// the length of the haystack.
    ///
    /// By default, there is no limit.
    pub fn step_limit(mut self, limit: Option<usize>) -> Config {
        self.step_limit = Some(limit);
        self
    }

    /// Whether to use the automaton's prefix accelerator, if it has one, to
    /// skip over offsets that cannot begin a match in unanchored searches.
    ///
    /// Acceleration never changes the result of a search, but it can change
    /// the number of steps counted against the step limit.
    ///
    /// This is enabled by default.
    pub fn accelerate(mut self, yes: bool) -> Config {
        self.accelerate = Some(yes);
        self
    }

    /// Returns the step limit, if one is set.
    pub fn get_step_limit(&self) -> Option<usize> {
        self.step_limit.unwrap_or(None)
    }

    /// Returns whether acceleration is enabled.
    pub fn get_accelerate(&self) -> bool {
        self.accelerate.unwrap_or(true)
    }

    /// Overwrite the default configuration such that the options in `o` are
    /// always used. If an option in `o` is not set, then the corresponding
    /// option in `self` is used.
    pub(crate) fn overwrite(self, o: Config) -> Config {
        Config {
            step_limit: o.step_limit.or(self.step_limit),
            accelerate: o.accelerate.or(self.accelerate),
        }
    }
}

/// Runs automata over haystacks.
///
/// An executor holds only its configuration. It is cheap to clone and may
/// be used to run any number of automata.
///
/// # Example
///
/// ```
/// use regex_dfa_exec::{
///     dfa::{Builder, Executor, FinalState, MatcherState, StartState},
///     util::{alphabet::ByteClassSet, captures::SlotSet},
///     Input, Span,
/// };
///
/// // Build an automaton for 'a+', with one capture group for the overall
/// // match.
/// let mut set = ByteClassSet::empty();
/// set.set_range(b'a', b'a');
/// let classes = set.byte_classes();
/// let class_a = usize::from(classes.get(b'a'));
///
/// let mut builder = Builder::new(classes, 1);
/// let start = builder.next_id()?;
/// let first = builder.next_id()?;
/// let rest = builder.next_id()?;
/// builder.add(
///     StartState::new(start, Some(first)).with_slots(SlotSet::one(0)),
/// )?;
/// let mut table = builder.empty_table();
/// table.set(class_a, Some(rest));
/// builder.add(MatcherState::new(first, table))?;
/// let mut table = builder.empty_table();
/// table.set(class_a, Some(rest));
/// builder.add(MatcherState::new(rest, table).with_accept(SlotSet::one(1)))?;
/// builder.start_anchored(start);
/// let aut = builder.build()?;
///
/// let exec = Executor::new();
/// let result = exec.search(&aut, &Input::new("xxaaay"))?;
/// let caps = result.captures().unwrap();
/// assert_eq!(Some(Span::from(2..5)), caps.get_match());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Executor {
    config: Config,
}

impl Executor {
    /// Create a new executor with the default configuration.
    pub fn new() -> Executor {
        Executor::default()
    }

    /// Create a new executor with the given configuration.
    pub fn with_config(config: Config) -> Executor {
        Executor { config: Config::new().overwrite(config) }
    }

    /// Returns the configuration of this executor.
    pub fn get_config(&self) -> &Config {
        &self.config
    }

    /// Run the automaton over the given input.
    ///
    /// When the input is anchored, the automaton's anchored start state is
    /// used and only a match beginning exactly at the input's start offset
    /// is reported. Otherwise the unanchored start state is used and the
    /// match with the leftmost starting offset is reported.
    ///
    /// Rejection is never an error. This only returns an error when the
    /// input's start offset is greater than the length of the haystack, or
    /// when the configured step limit is exceeded.
    pub fn search(
        &self,
        aut: &Automaton,
        input: &Input<'_>,
    ) -> Result<MatchResult, MatchError> {
        input.validate()?;
        let anchored = input.get_anchored();
        let start = if anchored {
            aut.start_anchored()
        } else {
            aut.start_unanchored()
        };
        let accel = if !anchored && self.config.get_accelerate() {
            aut.accel()
        } else {
            None
        };
        let limit = self.config.get_step_limit();
        let mut frame = Frame::new(aut.group_len() * 2);
        let mut steps = 0;
        let mut at = input.get_start();
        loop {
            if at > 0 {
                if let Some(accel) = accel {
                    at = match accel.find(input.haystack(), at) {
                        None => {
                            trace!(
                                "accelerator found no candidate after {}",
                                at,
                            );
                            return Ok(MatchResult::NoMatch);
                        }
                        Some(i) => i,
                    };
                }
            }
            trace!("starting attempt at offset {}", at);
            frame.reset(at, start);
            while let Current::State(id) = frame.current {
                if let Some(limit) = limit {
                    if steps >= limit {
                        return Err(MatchError::StepLimitExceeded {
                            limit,
                            offset: frame.at,
                        });
                    }
                }
                steps += 1;
                aut.get(id).execute(&mut frame, input, aut.byte_classes());
            }
            match frame.current {
                Current::Accept => {
                    trace!("attempt at {} accepted at {}", at, frame.at);
                    return Ok(frame.into_result());
                }
                Current::NoMatchPossible => {
                    trace!("no match possible after offset {}", at);
                    return Ok(frame.into_result());
                }
                Current::Reject if frame.has_match => {
                    trace!("attempt at {} rejected after a match", at);
                    return Ok(frame.into_result());
                }
                Current::Reject => {
                    if anchored || at >= input.end() {
                        return Ok(MatchResult::NoMatch);
                    }
                    at += 1;
                }
                Current::State(_) => unreachable!(),
            }
        }
    }
}

/// The position of a run within an automaton.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Current {
    /// The next state to execute.
    State(StateID),
    /// A final state was reached.
    Accept,
    /// No transition was possible from the last executed state.
    Reject,
    /// A trace finder rejected, so no later attempt can match either.
    NoMatchPossible,
}

/// The mutable state of a single run.
///
/// A frame is created when a search begins and is owned by that search
/// alone. It is reset at the beginning of every attempt.
#[derive(Debug)]
pub(crate) struct Frame {
    /// The offset of the next byte to consume.
    pub(crate) at: usize,
    /// The state to execute next, or the outcome of the attempt.
    pub(crate) current: Current,
    /// The slots recorded by the current attempt so far.
    slots: Vec<Option<NonMaxUsize>>,
    /// The slots of the best match seen by the current attempt.
    matched: Vec<Option<NonMaxUsize>>,
    has_match: bool,
}

impl Frame {
    fn new(slot_len: usize) -> Frame {
        Frame {
            at: 0,
            current: Current::Reject,
            slots: vec![None; slot_len],
            matched: vec![None; slot_len],
            has_match: false,
        }
    }

    fn reset(&mut self, at: usize, start: StateID) {
        self.at = at;
        self.current = Current::State(start);
        self.has_match = false;
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
    }

    /// Record the cursor into the given slots of the current attempt.
    #[inline(always)]
    pub(crate) fn record(&mut self, slots: SlotSet) {
        slots.apply(self.at, &mut self.slots);
    }

    /// Save the slots of the current attempt as its best match, with the
    /// cursor additionally recorded into `extra`.
    #[inline(always)]
    pub(crate) fn save_match(&mut self, extra: SlotSet) {
        self.matched.copy_from_slice(&self.slots);
        extra.apply(self.at, &mut self.matched);
        self.has_match = true;
    }

    fn into_result(self) -> MatchResult {
        if self.has_match {
            MatchResult::Matched(Captures::new(self.matched))
        } else {
            MatchResult::NoMatch
        }
    }
}
