// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use std::cell::RefCell;
use std::rc::Rc;

use futures::FutureExt;
use ringmul_engine::events::once::Once;
use ringmul_engine::run_ring;
use ringmul_engine::test_helpers::start_test;
use ringmul_engine::traits::Event;

#[test]
fn listeners_before_and_after_notify() {
    let mut engine = start_test(file!());
    let once = Once::new(7);
    let results = Rc::new(RefCell::new(Vec::new()));

    for _ in 0..2 {
        let listener = once.listen();
        let results = results.clone();
        engine.spawn(async move {
            let value = listener.await;
            results.borrow_mut().push(value);
            Ok(())
        });
    }
    {
        let once = once.clone();
        engine.spawn(async move { once.notify() });
    }

    run_ring!(engine);
    assert!(once.is_triggered());
    assert_eq!(*results.borrow(), vec![7, 7]);

    // A late listener completes immediately
    let mut engine = start_test(file!());
    let results_late = results.clone();
    engine.spawn(async move {
        results_late.borrow_mut().push(once.listen().await);
        Ok(())
    });
    run_ring!(engine);
    assert_eq!(results.borrow().len(), 3);
}

#[test]
fn notify_twice() {
    let mut engine = start_test(file!());
    let once = Once::default();
    engine.spawn(async move {
        once.notify()?;
        once.notify()
    });
    run_ring!(engine, "Transfer error: once event already triggered");
}

#[test]
fn completed_listener_stays_ready() {
    let once = Once::new(3);
    let mut listener = once.listen();
    assert_eq!((&mut listener).now_or_never(), None);

    once.notify().unwrap();
    assert_eq!((&mut listener).now_or_never(), Some(3));
    assert_eq!(listener.now_or_never(), Some(3));
}
