#![no_main]

use libfuzzer_sys::fuzz_target;

use javakey::{parse, Event, Recorder};

// Goal: never panic / never hang on arbitrary input, and honor the tolerance
// contract: at most one malformed callback, always the last one.
fn run_one(key: &str) {
    let parsed = parse(key, Recorder::default());
    let events = &parsed.events.events;
    let malformed = events.iter().filter(|e| **e == Event::Malformed).count();
    assert!(malformed <= 1, "more than one malformed callback: {key:?}");
    assert_eq!(
        malformed == 1,
        parsed.malformed,
        "malformed flag disagrees with the callback: {key:?}"
    );
    if parsed.malformed {
        assert_eq!(
            events.last(),
            Some(&Event::Malformed),
            "callbacks after malformed: {key:?}"
        );
    }

    // Re-parsing must be deterministic.
    let again = parse(key, Recorder::default());
    assert_eq!(*events, again.events.events, "non-deterministic parse: {key:?}");

    let head = javakey::parse_head(key, Recorder::default());
    assert!(head.events.events.len() <= events.len() + 1);
}

fuzz_target!(|data: &[u8]| {
    if let Ok(key) = std::str::from_utf8(data) {
        run_one(key);
    }
});
