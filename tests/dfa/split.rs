use regex_dfa_exec::{
    dfa::{
        self, Builder, FinalState, LoopEnd, MatcherState, StartState,
        StateKind,
    },
    util::captures::SlotSet,
    Span, StateID,
};

use crate::util::{self, Result};

fn is_match(aut: &dfa::Automaton, haystack: &[u8]) -> Result<bool> {
    Ok(dfa::run_match(aut, haystack, 0, true)?.is_match())
}

fn a_n_b(n: usize) -> Vec<u8> {
    let mut haystack = vec![b'a'; n];
    haystack.push(b'b');
    haystack
}

#[test]
fn unrolled_bounded_repetition() -> Result<()> {
    let aut = util::a_exactly_b(3)?;
    assert!(is_match(&aut, b"aaab")?);
    assert!(!is_match(&aut, b"aab")?);
    assert!(!is_match(&aut, b"aaaab")?);

    let result = dfa::run_match(&aut, b"xaaaab", 0, false)?;
    assert_eq!(
        Some(Span::from(2..6)),
        result.captures().unwrap().get_match()
    );

    for n in 1..6 {
        let aut = util::a_exactly_b(n)?;
        assert_eq!(3 + n, aut.state_len());
        assert!(is_match(&aut, &a_n_b(n))?, "n = {}", n);
        assert!(!is_match(&aut, &a_n_b(n - 1))?, "n = {}", n);
        assert!(!is_match(&aut, &a_n_b(n + 1))?, "n = {}", n);
    }
    Ok(())
}

#[test]
fn unrolled_open_repetition() -> Result<()> {
    let classes = util::byte_classes(b"ab");
    let ca = usize::from(classes.get(b'a'));
    let cb = usize::from(classes.get(b'b'));
    let mut b = Builder::new(classes, 1);
    let (start, s, fin) = (b.next_id()?, b.next_id()?, b.next_id()?);
    b.add(StartState::new(start, Some(s)).with_slots(SlotSet::one(0)))?;
    let mut t = b.empty_table();
    t.set(ca, Some(s));
    t.set(cb, Some(fin));
    b.add(MatcherState::new(s, t))?;
    b.add(FinalState::new(fin).with_slots(SlotSet::one(1)))?;

    // a{2,}b
    let chain = b.unroll(s, 2, LoopEnd::Keep)?;
    for &id in &chain[..2] {
        b.node_mut(id).unwrap().transitions_mut().set(cb, None);
    }
    b.start_anchored(start);
    let aut = b.build()?;

    assert!(!is_match(&aut, b"b")?);
    assert!(!is_match(&aut, b"ab")?);
    assert!(is_match(&aut, b"aab")?);
    assert!(is_match(&aut, b"aaaaaaaab")?);
    Ok(())
}

#[test]
fn duplication_preserves_matching() -> Result<()> {
    let classes = util::byte_classes(b"abc");
    let class = |b: u8| usize::from(classes.get(b));
    let mut b = Builder::new(classes, 1);
    let (start, m0, m1, fin) =
        (b.next_id()?, b.next_id()?, b.next_id()?, b.next_id()?);
    b.add(StartState::new(start, Some(m0)).with_slots(SlotSet::one(0)))?;
    let mut t = b.empty_table();
    t.set(class(b'a'), Some(m1));
    b.add(MatcherState::new(m0, t))?;
    let mut t = b.empty_table();
    t.set(class(b'b'), Some(m1));
    t.set(class(b'c'), Some(fin));
    b.add(MatcherState::new(m1, t))?;
    b.add(FinalState::new(fin).with_slots(SlotSet::one(1)))?;

    // Enter the loop through a copy of its state. The copy still points to
    // the original, so the language is unchanged.
    let copy = b.next_id()?;
    b.duplicate(m1, copy)?;
    b.node_mut(m0).unwrap().transitions_mut().redirect(m1, Some(copy));
    b.start_anchored(start);
    let split = b.build()?;
    let plain = util::ab_star_c()?;
    assert_eq!(5, split.state_len());

    let haystacks: &[&[u8]] =
        &[b"", b"a", b"ac", b"abc", b"abbbbc", b"xac", b"abd", b"cab", b"acc"];
    for &haystack in haystacks {
        for &anchored in &[true, false] {
            assert_eq!(
                dfa::run_match(&plain, haystack, 0, anchored)?,
                dfa::run_match(&split, haystack, 0, anchored)?,
                "haystack: {:?}, anchored: {:?}",
                haystack,
                anchored,
            );
        }
    }
    Ok(())
}

#[test]
fn duplicate_state_is_independent() -> Result<()> {
    let aut = util::ab_star_c()?;
    let node = aut.state(StateID::must(2)).unwrap();
    assert_eq!(StateKind::Matcher, node.kind());

    let mut copy = dfa::duplicate_state(node, StateID::must(9));
    assert_eq!(StateID::must(9), copy.id());
    assert!(copy.transitions().iter().eq(node.transitions().iter()));

    copy.transitions_mut().redirect(StateID::must(2), Some(StateID::must(9)));
    assert!(copy.transitions().contains(StateID::must(9)));
    assert!(node.transitions().contains(StateID::must(2)));
    assert!(!node.transitions().contains(StateID::must(9)));
    Ok(())
}

#[test]
fn debug_tables() -> Result<()> {
    let aut = util::ab_star_c()?;
    for node in aut.states() {
        let copy = dfa::duplicate_state(node, StateID::must(100));
        let restored = dfa::duplicate_state(&copy, node.id());
        assert_eq!(
            dfa::export_debug_table(node),
            dfa::export_debug_table(&restored)
        );
        assert_ne!(
            dfa::export_debug_table(node),
            dfa::export_debug_table(&copy)
        );
        assert_eq!(Some("100"), dfa::export_debug_table(&copy).get("id"));
    }

    let table = dfa::export_debug_table(aut.state(StateID::must(2)).unwrap());
    let expected = "\
Matcher
  id: 2
  slots: {}
  accept: none
  transitions
    0: -
    1: -
    2: 2
    3: 3
    4: -
";
    assert_eq!(expected, table.to_string());

    // Unrolling shows up in the automaton's table as one entry per copy.
    let aut = util::a_exactly_b(2)?;
    let table = aut.debug_table();
    let matchers = table
        .children()
        .iter()
        .filter(|t| t.name() == "Matcher")
        .count();
    assert_eq!(3, matchers);
    Ok(())
}
