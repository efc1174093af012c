//! Strong-guarantee checks: a failed construction leaves the container
//! exactly as it was and leaks nothing.

use std::panic::{catch_unwind, AssertUnwindSafe};

use proptest::prelude::*;
use vessel_containers::{Array, List};
use vessel_test_utils::{CloneBomb, CountingAlloc, Fuse};

fn values(a: &Array<CloneBomb, CountingAlloc>) -> Vec<u32> {
    a.iter().map(CloneBomb::value).collect()
}

fn full_array(fuse: &Fuse, n: u32, alloc: &CountingAlloc) -> Array<CloneBomb, CountingAlloc> {
    let mut a = Array::new_in(alloc.clone());
    for v in 0..n {
        a.push_back(fuse.make(v));
    }
    a
}

#[test]
fn clone_panic_on_full_array_leaves_it_unchanged() {
    let fuse = Fuse::new();
    let alloc = CountingAlloc::new();
    let mut a = full_array(&fuse, 8, &alloc);
    assert_eq!(a.len(), a.capacity());
    let blocks = alloc.stats();
    let proto = fuse.make(100);

    fuse.arm(3);
    let result = catch_unwind(AssertUnwindSafe(|| a.insert_n(4, 5, &proto)));
    assert!(result.is_err());

    assert_eq!(values(&a), (0..8).collect::<Vec<_>>());
    assert_eq!(a.capacity(), 8);
    assert_eq!(fuse.live(), 9);
    assert_eq!(alloc.live_blocks(), 1);
    assert_eq!(alloc.stats().allocations, blocks.allocations + 1);
    assert_eq!(alloc.stats().deallocations, blocks.deallocations + 1);
}

#[test]
fn clone_panic_with_slack_restores_tail() {
    let fuse = Fuse::new();
    let alloc = CountingAlloc::new();
    let mut a = full_array(&fuse, 5, &alloc);
    assert!(a.capacity() - a.len() >= 3);
    let proto = fuse.make(100);

    fuse.arm(2);
    let result = catch_unwind(AssertUnwindSafe(|| a.insert_n(1, 3, &proto)));
    assert!(result.is_err());
    assert_eq!(values(&a), [0, 1, 2, 3, 4]);
    assert_eq!(fuse.live(), 6);

    fuse.disarm();
    a.insert_n(1, 3, &proto);
    assert_eq!(values(&a), [0, 100, 100, 100, 1, 2, 3, 4]);
}

#[test]
fn clone_panic_in_array_clone_leaks_nothing() {
    let fuse = Fuse::new();
    let alloc = CountingAlloc::new();
    let a = full_array(&fuse, 6, &alloc);
    fuse.arm(4);
    let result = catch_unwind(AssertUnwindSafe(|| a.clone()));
    assert!(result.is_err());
    assert_eq!(fuse.live(), 6);
    assert_eq!(alloc.live_blocks(), 1);
}

#[test]
fn clone_panic_in_from_elem_leaks_nothing() {
    let fuse = Fuse::new();
    let alloc = CountingAlloc::new();
    let proto = fuse.make(1);
    fuse.arm(3);
    let result = catch_unwind(AssertUnwindSafe(|| {
        Array::from_elem_in(5, &proto, alloc.clone())
    }));
    assert!(result.is_err());
    assert_eq!(fuse.live(), 1);
    assert!(alloc.is_balanced());
}

#[test]
fn clone_panic_in_list_clone_leaves_source_intact() {
    let fuse = Fuse::new();
    let mut list = List::new_in(CountingAlloc::new());
    for v in 0..5 {
        list.push_back(fuse.make(v));
    }
    fuse.arm(3);
    let result = catch_unwind(AssertUnwindSafe(|| list.clone()));
    assert!(result.is_err());
    assert_eq!(fuse.live(), 5);
    assert_eq!(
        list.iter().map(CloneBomb::value).collect::<Vec<_>>(),
        [0, 1, 2, 3, 4]
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn any_failing_clone_leaves_array_unchanged(
        len in 0u32..12,
        reserve in 0usize..24,
        pos in any::<usize>(),
        n in 1usize..10,
        k in 1usize..10,
    ) {
        let fuse = Fuse::new();
        let alloc = CountingAlloc::new();
        let mut a = full_array(&fuse, len, &alloc);
        a.reserve(reserve);
        let cap = a.capacity();
        let pos = pos % (a.len() + 1);
        let proto = fuse.make(1000);

        fuse.arm(k);
        let result = catch_unwind(AssertUnwindSafe(|| a.insert_n(pos, n, &proto)));
        fuse.disarm();

        if k <= n {
            prop_assert!(result.is_err());
            prop_assert_eq!(values(&a), (0..len).collect::<Vec<_>>());
            prop_assert_eq!(a.capacity(), cap);
            prop_assert_eq!(fuse.live(), len as usize + 1);
        } else {
            prop_assert!(result.is_ok());
            prop_assert_eq!(a.len(), len as usize + n);
        }
        drop(a);
        drop(proto);
        prop_assert!(alloc.is_balanced());
        prop_assert_eq!(fuse.live(), 0);
    }
}
