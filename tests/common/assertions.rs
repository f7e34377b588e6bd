//! Domain-specific assertion macros for oomx harnesses.
//!
//! These wrap `pretty_assertions` and add context about which counter series
//! or offset was wrong.

/// Assert the counter value for one `(pid, process_name)` series.
///
/// ```rust
/// assert_count!(counter, "1234", "nginx", 1);
/// ```
#[macro_export]
macro_rules! assert_count {
    ($counter:expr, $pid:expr, $name:expr, $expected:expr) => {{
        let counter: &oomx::OomCounter = &$counter;
        let actual = counter.count($pid, $name);
        let expected: u64 = $expected;
        if actual != expected {
            panic!(
                "assert_count! failed for {{pid={:?}, process_name={:?}}}\n  expected: {}\n  actual:   {}\n  all series: {:?}",
                $pid,
                $name,
                expected,
                actual,
                counter.series()
            );
        }
    }};
}

/// Assert the sum over every counter series.
#[macro_export]
macro_rules! assert_total {
    ($counter:expr, $expected:expr) => {{
        let counter: &oomx::OomCounter = &$counter;
        let expected: u64 = $expected;
        pretty_assertions::assert_eq!(
            counter.total(),
            expected,
            "total oom_events_total across series: {:?}",
            counter.series()
        );
    }};
}

/// Assert an in-memory or persisted offset.
#[macro_export]
macro_rules! assert_offset {
    ($state:expr, $expected:expr) => {{
        let state: oomx::State = $state;
        let expected: u64 = $expected;
        pretty_assertions::assert_eq!(state.last_offset, expected, "last_offset mismatch");
    }};
}
