// Hand-assembled automata shared by the integration tests. Each builder here
// plays the role a regex compiler would play in practice.

use regex_dfa_exec::{
    dfa::{
        Automaton, Builder, FinalState, LoopEnd, MatcherState, StartState,
        TraceFinderState,
    },
    util::{
        alphabet::{ByteClassSet, ByteClasses},
        captures::SlotSet,
        start::Start,
    },
    StateID,
};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Byte classes where each of the given bytes is in a class of its own.
pub fn byte_classes(bytes: &[u8]) -> ByteClasses {
    let mut set = ByteClassSet::empty();
    for &b in bytes {
        set.set_range(b, b);
    }
    set.byte_classes()
}

fn class(classes: &ByteClasses, byte: u8) -> usize {
    usize::from(classes.get(byte))
}

/// `ab*c` with one capture group.
pub fn ab_star_c() -> Result<Automaton> {
    let classes = byte_classes(b"abc");
    let mut b = Builder::new(classes, 1);
    let (start, m0, m1, fin) =
        (b.next_id()?, b.next_id()?, b.next_id()?, b.next_id()?);
    b.add(StartState::new(start, Some(m0)).with_slots(SlotSet::one(0)))?;
    let mut t = b.empty_table();
    t.set(class(&classes, b'a'), Some(m1));
    b.add(MatcherState::new(m0, t))?;
    let mut t = b.empty_table();
    t.set(class(&classes, b'b'), Some(m1));
    t.set(class(&classes, b'c'), Some(fin));
    b.add(MatcherState::new(m1, t))?;
    b.add(FinalState::new(fin).with_slots(SlotSet::one(1)))?;
    b.start_anchored(start);
    Ok(b.build()?)
}

/// `a(b*)c` with two capture groups.
///
/// Both states that read the `b`s record the end of group 1 each time they
/// execute, so the last write before `c` is consumed wins.
pub fn a_group_b_star_c() -> Result<Automaton> {
    let classes = byte_classes(b"abc");
    let mut b = Builder::new(classes, 2);
    let (start, m0, m1, m2, fin) = (
        b.next_id()?,
        b.next_id()?,
        b.next_id()?,
        b.next_id()?,
        b.next_id()?,
    );
    b.add(StartState::new(start, Some(m0)).with_slots(SlotSet::one(0)))?;
    let mut t = b.empty_table();
    t.set(class(&classes, b'a'), Some(m1));
    b.add(MatcherState::new(m0, t))?;
    let group1 = SlotSet::group_start(1).union(SlotSet::group_end(1));
    for &(id, slots) in &[(m1, group1), (m2, SlotSet::group_end(1))] {
        let mut t = b.empty_table();
        t.set(class(&classes, b'b'), Some(m2));
        t.set(class(&classes, b'c'), Some(fin));
        b.add(MatcherState::new(id, t).with_slots(slots))?;
    }
    b.add(FinalState::new(fin).with_slots(SlotSet::group_end(0)))?;
    b.start_anchored(start);
    Ok(b.build()?)
}

/// `a+`, either greedy (an accepting matcher) or lazy (a final state after
/// the first `a`).
pub fn a_plus(greedy: bool) -> Result<Automaton> {
    let classes = byte_classes(b"a");
    let ca = class(&classes, b'a');
    let mut b = Builder::new(classes, 1);
    let (start, m0, m1) = (b.next_id()?, b.next_id()?, b.next_id()?);
    b.add(StartState::new(start, Some(m0)).with_slots(SlotSet::one(0)))?;
    let mut t = b.empty_table();
    t.set(ca, Some(m1));
    b.add(MatcherState::new(m0, t))?;
    if greedy {
        let mut t = b.empty_table();
        t.set(ca, Some(m1));
        b.add(MatcherState::new(m1, t).with_accept(SlotSet::one(1)))?;
    } else {
        b.add(FinalState::new(m1).with_slots(SlotSet::one(1)))?;
    }
    b.start_anchored(start);
    Ok(b.build()?)
}

/// A literal string with one capture group. The empty literal matches at
/// every position.
pub fn literal(needle: &[u8]) -> Result<Automaton> {
    let classes = byte_classes(needle);
    let mut b = Builder::new(classes, 1);
    let start = b.next_id()?;
    let ids = (0..needle.len())
        .map(|_| b.next_id())
        .collect::<std::result::Result<Vec<StateID>, _>>()?;
    let fin = b.next_id()?;
    let first = ids.first().copied().unwrap_or(fin);
    b.add(StartState::new(start, Some(first)).with_slots(SlotSet::one(0)))?;
    for (i, &id) in ids.iter().enumerate() {
        let next = ids.get(i + 1).copied().unwrap_or(fin);
        let mut t = b.empty_table();
        t.set(class(&classes, needle[i]), Some(next));
        b.add(MatcherState::new(id, t))?;
    }
    b.add(FinalState::new(fin).with_slots(SlotSet::one(1)))?;
    b.start_anchored(start);
    Ok(b.build()?)
}

/// `a{n}b`, built from `a*b` by unrolling the `a*` loop into a chain.
///
/// The loop state `S` reads `a` into itself and `b` into the final state.
/// Unrolling it `n` times gives `S, S1, ..., Sn`, and then only `Sn` is
/// allowed to read `b`.
pub fn a_exactly_b(n: usize) -> Result<Automaton> {
    let classes = byte_classes(b"ab");
    let (ca, cb) = (class(&classes, b'a'), class(&classes, b'b'));
    let mut b = Builder::new(classes, 1);
    let (start, s, fin) = (b.next_id()?, b.next_id()?, b.next_id()?);
    b.add(StartState::new(start, Some(s)).with_slots(SlotSet::one(0)))?;
    let mut t = b.empty_table();
    t.set(ca, Some(s));
    t.set(cb, Some(fin));
    b.add(MatcherState::new(s, t))?;
    b.add(FinalState::new(fin).with_slots(SlotSet::one(1)))?;

    let chain = b.unroll(s, n, LoopEnd::Reject)?;
    for &id in &chain[..chain.len() - 1] {
        if let Some(node) = b.node_mut(id) {
            node.transitions_mut().set(cb, None);
        }
    }
    b.start_anchored(start);
    Ok(b.build()?)
}

/// `^ab` for unanchored searches.
///
/// When `traced` is true, every non-Text starting configuration leads to a
/// trace finder that rejects everything, which stops an unanchored search
/// after its first attempt. Otherwise those configurations simply reject
/// and every offset is tried.
pub fn caret_ab(traced: bool) -> Result<Automaton> {
    let classes = byte_classes(b"ab");
    let mut b = Builder::new(classes, 1);
    let (start, m0, m1, fin) =
        (b.next_id()?, b.next_id()?, b.next_id()?, b.next_id()?);
    let mut st = StartState::new(start, None)
        .entry(Start::Text, Some(m0))
        .with_slots(SlotSet::one(0));
    if traced {
        let tf = b.next_id()?;
        let t = b.empty_table();
        b.add(TraceFinderState::new(tf, t))?;
        for &config in &[Start::NonWordByte, Start::WordByte, Start::Line] {
            st = st.entry(config, Some(tf));
        }
    }
    b.add(st)?;
    let mut t = b.empty_table();
    t.set(class(&classes, b'a'), Some(m1));
    b.add(MatcherState::new(m0, t))?;
    let mut t = b.empty_table();
    t.set(class(&classes, b'b'), Some(fin));
    b.add(MatcherState::new(m1, t))?;
    b.add(FinalState::new(fin).with_slots(SlotSet::one(1)))?;
    b.start_anchored(start);
    Ok(b.build()?)
}

/// `a*` where a `b` after the `a`s leads to a trace finder that rejects
/// everything. The match saved by the greedy loop must survive the trace
/// finder's rejection.
pub fn a_star_then_trace() -> Result<Automaton> {
    let classes = byte_classes(b"ab");
    let (ca, cb) = (class(&classes, b'a'), class(&classes, b'b'));
    let mut b = Builder::new(classes, 1);
    let (start, m0, tf) = (b.next_id()?, b.next_id()?, b.next_id()?);
    b.add(StartState::new(start, Some(m0)).with_slots(SlotSet::one(0)))?;
    let mut t = b.empty_table();
    t.set(ca, Some(m0));
    t.set(cb, Some(tf));
    b.add(MatcherState::new(m0, t).with_accept(SlotSet::one(1)))?;
    let t = b.empty_table();
    b.add(TraceFinderState::new(tf, t))?;
    b.start_anchored(start);
    Ok(b.build()?)
}

/// An automaton whose start state leads directly to a final state. It
/// matches the empty string everywhere.
pub fn empty(group_len: usize) -> Result<Automaton> {
    let mut b = Builder::new(ByteClasses::singletons(), group_len);
    let (start, fin) = (b.next_id()?, b.next_id()?);
    let mut st = StartState::new(start, Some(fin));
    let mut fs = FinalState::new(fin);
    if group_len > 0 {
        st = st.with_slots(SlotSet::one(0));
        fs = fs.with_slots(SlotSet::one(1));
    }
    b.add(st)?;
    b.add(fs)?;
    b.start_anchored(start);
    Ok(b.build()?)
}

/// `\bfoo` where only the unanchored start state checks the word boundary.
/// The anchored start state accepts `foo` in every configuration.
pub fn word_foo() -> Result<Automaton> {
    let classes = byte_classes(b"fo");
    let (cf, co) = (class(&classes, b'f'), class(&classes, b'o'));
    let mut b = Builder::new(classes, 1);
    let (anchored, unanchored, m0, m1, m2, fin) = (
        b.next_id()?,
        b.next_id()?,
        b.next_id()?,
        b.next_id()?,
        b.next_id()?,
        b.next_id()?,
    );
    b.add(StartState::new(anchored, Some(m0)).with_slots(SlotSet::one(0)))?;
    b.add(
        StartState::new(unanchored, Some(m0))
            .entry(Start::WordByte, None)
            .with_slots(SlotSet::one(0)),
    )?;
    for &(id, byte, next) in &[(m0, cf, m1), (m1, co, m2), (m2, co, fin)] {
        let mut t = b.empty_table();
        t.set(byte, Some(next));
        b.add(MatcherState::new(id, t))?;
    }
    b.add(FinalState::new(fin).with_slots(SlotSet::one(1)))?;
    b.start_anchored(anchored).start_unanchored(unanchored);
    Ok(b.build()?)
}
