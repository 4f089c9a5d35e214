// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use std::cell::RefCell;
use std::rc::Rc;

use ringmul_engine::run_ring;
use ringmul_engine::test_helpers::start_test;
use ringmul_models::fence::LoadFence;

#[test]
fn ranks_start_in_order() {
    let mut engine = start_test(file!());
    let fence = LoadFence::new(engine.top(), 4);
    let order = Rc::new(RefCell::new(Vec::new()));

    // Spawn in reverse so that only the fence imposes the order
    for rank in (0..4).rev() {
        let fence = fence.clone();
        let order = order.clone();
        engine.spawn(async move {
            fence.wait_turn(rank).await?;
            order.borrow_mut().push(rank);
            fence.release(rank)
        });
    }

    run_ring!(engine);
    assert_eq!(*order.borrow(), vec![0, 1, 2, 3]);
}

#[test]
fn double_release() {
    let engine = start_test(file!());
    let fence = LoadFence::new(engine.top(), 2);
    fence.release(0).unwrap();
    assert_eq!(
        fence.release(0).unwrap_err().to_string(),
        "Transfer error: top::fence: rank 0 released twice"
    );
    assert!(fence.release(2).is_err());
}

#[test]
fn unreleased_predecessor_stalls() {
    let mut engine = start_test(file!());
    let fence = LoadFence::new(engine.top(), 2);
    engine.spawn(async move { fence.wait_turn(1).await });
    run_ring!(
        engine,
        "Transfer error: 1 task(s) stalled waiting for transfers that are never sent"
    );
}
