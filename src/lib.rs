/*!
This crate executes pre-built deterministic finite automata over byte strings
and reports capture group offsets.

An automaton is a graph of states connected by transition tables. It is not
compiled from a pattern here. Instead, it is assembled state by state through
[`dfa::Builder`] (typically by a regex compiler), validated and then frozen
into an immutable [`dfa::Automaton`]. A frozen automaton can be shared across
threads and run by a [`dfa::Executor`] against any number of haystacks.

# States

There are four kinds of states:

* A **start** state consumes nothing. It dispatches to an entry state based
on the byte preceding the position at which a search attempt begins (the
beginning of the haystack, after a `\n`, after a word byte or after any other
byte). This is how assertions like `^` or `\b` at the start of a pattern are
handled.
* A **matcher** state consumes a single byte and follows the transition for
that byte's equivalence class. A matcher may also be *accepting*, which
records a match but keeps going in search of a longer one.
* A **final** state ends the run with a match.
* A **trace finder** state consumes a single byte without tracking captures.
When it rejects, no match is possible at any later offset either, so an
unanchored search stops early.

Every state may record the current offset into one or more capture *slots*.
Capture group `g` uses slots `2g` and `2g + 1`. By convention group `0` is the
overall match.

# Duplicating states

A state can be copied under a new identifier with an independently owned
transition table. The builder uses this to *unroll* a state with a self-loop
into a chain of distinct states, which is how bounded repetitions are
expressed without counters. See [`dfa::Builder::unroll`].

# Crate features

* **std** - Enabled by default. Provides `std::error::Error` impls for the
error types. When disabled, the crate is `no_std` but still requires `alloc`.
* **logging** - Emits log messages via the `log` crate while building
automata and running searches.
*/

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(any(
    target_pointer_width = "16",
    target_pointer_width = "32",
    target_pointer_width = "64"
)))]
compile_error!("regex-dfa-exec currently not supported on non-{16,32,64}");

extern crate alloc;

pub use crate::util::{
    captures::Captures,
    primitives::StateID,
    search::{Input, MatchError, MatchResult, Span},
};

#[macro_use]
mod macros;

pub mod dfa;
pub mod util;
