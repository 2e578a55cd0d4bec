use rstest::rstest;
use synchronized::UnfairLock;

#[rstest]
#[case(UnfairLock::new(1), true)]
#[case(UnfairLock::new_unchecked(1), false)]
fn construction_selects_checking(#[case] lock: UnfairLock<i32>, #[case] checked: bool) {
    assert_eq!(lock.is_checked(), checked);
    assert_eq!(lock.with_lock(|v| *v), 1);
}

#[test]
fn every_path_reads_and_writes() {
    let lock = UnfairLock::new(0);
    lock.with_lock(|v| *v += 1);
    lock.with_lock_unchecked(|v| *v += 1);
    assert_eq!(
        lock.with_lock_if_available(|v| {
            *v += 1;
            *v
        }),
        Some(3)
    );
    assert_eq!(lock.with_lock_if_available_unchecked(|v| *v), Some(3));
    assert_eq!(lock.into_inner(), 3);
}

#[test]
#[should_panic(expected = "reentrant acquisition")]
fn checked_reentry_panics() {
    let lock = UnfairLock::new(0);
    lock.with_lock(|_| lock.with_lock(|_| ()));
}

#[test]
#[should_panic(expected = "reentrant acquisition")]
fn checked_non_blocking_reentry_panics() {
    let lock = UnfairLock::new(0);
    lock.with_lock(|_| lock.with_lock_if_available(|_| ()));
}

#[test]
fn unchecked_non_blocking_reentry_reports_unavailable() {
    let lock = UnfairLock::new(0);
    let inner = lock.with_lock(|_| lock.with_lock_if_available_unchecked(|_| ()));
    assert_eq!(inner, None);
}

#[test]
fn untracked_lock_does_not_panic_on_reentry() {
    let lock = UnfairLock::new_unchecked(0);
    let inner = lock.with_lock(|_| lock.with_lock_if_available(|_| ()));
    assert_eq!(inner, None);
}

#[test]
fn owner_is_cleared_after_a_panicking_body() {
    let lock = UnfairLock::new(0);
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        lock.with_lock(|_| panic!("body failed"))
    }));
    assert!(result.is_err());
    assert_eq!(lock.with_lock(|v| *v), 0);
}

#[test]
fn held_lock_is_unavailable_to_other_threads() {
    let lock = UnfairLock::new(0);
    std::thread::scope(|s| {
        lock.with_lock(|v| {
            *v = 1;
            let seen = s.spawn(|| lock.with_lock_if_available(|v| *v)).join().unwrap();
            assert_eq!(seen, None);
        });
    });
    assert_eq!(lock.with_lock(|v| *v), 1);
}

#[test]
fn debug_hides_a_held_value() {
    let lock = UnfairLock::new(5);
    assert_eq!(format!("{lock:?}"), "UnfairLock { checked: true, state: 5 }");
    let rendered = lock.with_lock(|_| format!("{lock:?}"));
    assert_eq!(rendered, "UnfairLock { checked: true, state: <locked> }");
}

#[test]
fn conversions() {
    let lock: UnfairLock<String> = "a".to_owned().into();
    assert!(lock.is_checked());
    assert_eq!(UnfairLock::<u8>::default().into_inner(), 0);
}
