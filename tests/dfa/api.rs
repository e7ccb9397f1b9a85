use std::sync::Arc;

use bstr::ByteSlice;
use quickcheck::{quickcheck, TestResult};

use regex_dfa_exec::{
    dfa::{self, Automaton, Config, Executor},
    Input, MatchError, MatchResult, Span,
};

use crate::util::{self, Result};

/// Run an automaton with the default configuration and return the spans of
/// every group, or `None` when there is no match.
fn spans(
    aut: &Automaton,
    haystack: &[u8],
    anchored: bool,
) -> Result<Option<Vec<Option<Span>>>> {
    let result = dfa::run_match(aut, haystack, 0, anchored)?;
    Ok(result.into_captures().map(|caps| caps.iter().collect()))
}

fn span(range: std::ops::Range<usize>) -> Option<Span> {
    Some(Span::from(range))
}

#[test]
fn ab_star_c() -> Result<()> {
    let aut = util::ab_star_c()?;
    assert_eq!(spans(&aut, b"ac", true)?, Some(vec![span(0..2)]));
    assert_eq!(spans(&aut, b"abbbc", true)?, Some(vec![span(0..5)]));
    assert_eq!(spans(&aut, b"xabc", false)?, Some(vec![span(1..4)]));
    assert_eq!(spans(&aut, b"abd", true)?, None);

    // An anchored search never looks past its starting offset.
    assert_eq!(spans(&aut, b"xabc", true)?, None);
    // Running out of input is a rejection, not an error.
    assert_eq!(spans(&aut, b"abbb", true)?, None);
    assert_eq!(spans(&aut, b"", false)?, None);
    Ok(())
}

#[test]
fn capture_groups() -> Result<()> {
    let aut = util::a_group_b_star_c()?;
    assert_eq!(
        spans(&aut, b"abbc", true)?,
        Some(vec![span(0..4), span(1..3)])
    );
    assert_eq!(spans(&aut, b"ac", true)?, Some(vec![span(0..2), span(1..1)]));
    assert_eq!(
        spans(&aut, b"zzabcz", false)?,
        Some(vec![span(2..5), span(3..4)])
    );
    Ok(())
}

#[test]
fn greedy_and_lazy() -> Result<()> {
    let greedy = util::a_plus(true)?;
    assert_eq!(spans(&greedy, b"aaab", true)?, Some(vec![span(0..3)]));
    assert_eq!(spans(&greedy, b"aaa", true)?, Some(vec![span(0..3)]));
    assert_eq!(spans(&greedy, b"baa", false)?, Some(vec![span(1..3)]));
    assert_eq!(spans(&greedy, b"b", false)?, None);

    let lazy = util::a_plus(false)?;
    assert_eq!(spans(&lazy, b"aaab", true)?, Some(vec![span(0..1)]));
    assert_eq!(spans(&lazy, b"baa", false)?, Some(vec![span(1..2)]));
    Ok(())
}

#[test]
fn empty_haystack() -> Result<()> {
    let aut = util::empty(0)?;
    let result = dfa::run_match(&aut, b"", 0, true)?;
    let caps = result.captures().unwrap();
    assert_eq!(0, caps.group_len());
    assert_eq!(None, caps.get_match());

    let aut = util::empty(1)?;
    assert_eq!(spans(&aut, b"", true)?, Some(vec![span(0..0)]));
    assert_eq!(spans(&aut, b"abc", false)?, Some(vec![span(0..0)]));

    let aut = util::ab_star_c()?;
    assert_eq!(MatchResult::NoMatch, dfa::run_match(&aut, b"", 0, true)?);
    Ok(())
}

#[test]
fn start_offset() -> Result<()> {
    let aut = util::ab_star_c()?;
    let result = dfa::run_match(&aut, b"xxac", 2, true)?;
    assert_eq!(span(2..4), result.captures().unwrap().get_match());

    let result = dfa::run_match(&aut, b"acxac", 1, false)?;
    assert_eq!(span(3..5), result.captures().unwrap().get_match());

    // Starting at the very end is fine, it just can't match.
    assert!(!dfa::run_match(&aut, b"ac", 2, false)?.is_match());

    assert_eq!(
        dfa::run_match(&aut, b"abc", 5, false),
        Err(MatchError::InvalidStart { start: 5, len: 3 }),
    );
    Ok(())
}

#[test]
fn start_configurations() -> Result<()> {
    let aut = util::word_foo()?;
    assert_eq!(spans(&aut, b"foo", false)?, Some(vec![span(0..3)]));
    assert_eq!(spans(&aut, b"a foo", false)?, Some(vec![span(2..5)]));
    assert_eq!(spans(&aut, b"a\nfoo", false)?, Some(vec![span(2..5)]));
    assert_eq!(spans(&aut, b"afoo", false)?, None);
    assert_eq!(spans(&aut, b"afoo foo", false)?, Some(vec![span(5..8)]));

    // The anchored start state doesn't check the boundary.
    let result = dfa::run_match(&aut, b"afoo", 1, true)?;
    assert_eq!(span(1..4), result.captures().unwrap().get_match());
    Ok(())
}

#[test]
fn trace_finder_stops_search() -> Result<()> {
    let traced = util::caret_ab(true)?;
    let plain = util::caret_ab(false)?;
    for aut in &[&traced, &plain] {
        assert_eq!(spans(aut, b"abx", false)?, Some(vec![span(0..2)]));
        assert_eq!(spans(aut, b"xab", false)?, None);
        assert_eq!(spans(aut, b"xab", true)?, None);
    }

    // Without acceleration, the plain automaton tries every offset while the
    // traced automaton gives up after the second attempt.
    let exec = Executor::with_config(
        Config::new().accelerate(false).step_limit(Some(4)),
    );
    let input = Input::new("xab");
    assert_eq!(MatchResult::NoMatch, exec.search(&traced, &input)?);
    assert_eq!(
        exec.search(&plain, &input),
        Err(MatchError::StepLimitExceeded { limit: 4, offset: 3 }),
    );
    Ok(())
}

#[test]
fn trace_finder_keeps_saved_match() -> Result<()> {
    let aut = util::a_star_then_trace()?;
    assert_eq!(spans(&aut, b"aab", true)?, Some(vec![span(0..2)]));
    assert_eq!(spans(&aut, b"aab", false)?, Some(vec![span(0..2)]));
    assert_eq!(spans(&aut, b"ab", false)?, Some(vec![span(0..1)]));
    assert_eq!(spans(&aut, b"b", false)?, Some(vec![span(0..0)]));

    // The trace finder also ends the search, so the five steps of the first
    // attempt are all that run.
    let exec = Executor::with_config(
        Config::new().accelerate(false).step_limit(Some(5)),
    );
    let result = exec.search(&aut, &Input::new("aabaaaa"))?;
    assert_eq!(span(0..2), result.captures().unwrap().get_match());
    Ok(())
}

#[test]
fn accelerator() -> Result<()> {
    let aut = util::literal(b"foo")?;
    assert_eq!(Some(&b"f"[..]), aut.accelerator());

    // Only the first attempt (two steps for the mismatch on 'x') and the
    // attempt at the 'f' (five steps) are executed.
    let exec = Executor::with_config(Config::new().step_limit(Some(7)));
    let input = Input::new("xyyyyyyyyyyfoo");
    let result = exec.search(&aut, &input)?;
    assert_eq!(span(11..14), result.captures().unwrap().get_match());

    let exec = Executor::with_config(
        Config::new().accelerate(false).step_limit(Some(7)),
    );
    assert!(exec.search(&aut, &input).is_err());

    // A start state that rejects every non-Text configuration leads to an
    // accelerator with no needles.
    let aut = util::caret_ab(false)?;
    assert_eq!(Some(&b""[..]), aut.accelerator());
    // A trace finder entry disables acceleration.
    let aut = util::caret_ab(true)?;
    assert_eq!(None, aut.accelerator());
    Ok(())
}

#[test]
fn shared_between_threads() -> Result<()> {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Automaton>();
    assert_send_sync::<Executor>();

    let aut = Arc::new(util::ab_star_c()?);
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let aut = Arc::clone(&aut);
            std::thread::spawn(move || {
                let haystack = format!("{}abbc", "x".repeat(i));
                dfa::run_match(&aut, haystack.as_bytes(), 0, false)
                    .map(|r| r.into_captures().and_then(|c| c.get_match()))
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        let got = handle.join().unwrap()?;
        assert_eq!(span(i..i + 4), got);
    }
    Ok(())
}

quickcheck! {
    fn prop_run_is_deterministic(haystack: Vec<u8>, anchored: bool) -> bool {
        let haystack: Vec<u8> =
            haystack.into_iter().map(|b| b"abcx"[b as usize % 4]).collect();
        let aut = util::ab_star_c().unwrap();
        let r1 = dfa::run_match(&aut, &haystack, 0, anchored).unwrap();
        let r2 = dfa::run_match(&aut, &haystack, 0, anchored).unwrap();
        r1 == r2
    }

    fn prop_leftmost_literal(
        haystack: Vec<u8>,
        at: usize,
        len: u8
    ) -> TestResult {
        if haystack.is_empty() {
            return TestResult::discard();
        }
        let start = at % haystack.len();
        let end = std::cmp::min(haystack.len(), start + 1 + len as usize % 3);
        let needle = &haystack[start..end];
        let aut = util::literal(needle).unwrap();

        let expected = haystack.find(needle).map(|i| i..i + needle.len());
        let got = dfa::run_match(&aut, &haystack, 0, false)
            .unwrap()
            .into_captures()
            .and_then(|caps| caps.get_match())
            .map(|span| span.range());
        TestResult::from_bool(expected == got)
    }

    fn prop_acceleration_is_invisible(haystack: Vec<u8>) -> bool {
        let haystack: Vec<u8> =
            haystack.into_iter().map(|b| b"abcx"[b as usize % 4]).collect();
        let aut = util::ab_star_c().unwrap();
        let input = Input::new(&haystack);
        let fast = Executor::new().search(&aut, &input).unwrap();
        let slow = Executor::with_config(Config::new().accelerate(false))
            .search(&aut, &input)
            .unwrap();
        fast == slow
    }
}
