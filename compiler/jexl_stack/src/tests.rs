use super::*;

#[test]
fn deep_native_recursion_survives() {
    fn deep_recurse(n: u64) -> u64 {
        ensure_sufficient_stack(|| if n == 0 { 0 } else { deep_recurse(n - 1) + 1 })
    }

    assert_eq!(deep_recurse(100_000), 100_000);
}

#[test]
fn counter_stops_at_limit() {
    let mut counter = DepthCounter::new(2);
    assert_eq!(counter.enter(), Ok(()));
    assert_eq!(counter.enter(), Ok(()));
    assert_eq!(counter.enter(), Err(2));
    assert_eq!(counter.depth(), 2);
}

#[test]
fn counter_exit_is_saturating() {
    let mut counter = DepthCounter::new(4);
    counter.exit();
    assert_eq!(counter.depth(), 0);
    assert_eq!(counter.enter(), Ok(()));
    counter.exit();
    assert_eq!(counter.depth(), 0);
    assert_eq!(counter.limit(), 4);
}
