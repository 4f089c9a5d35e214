// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! The load fence.
//!
//! Participants load their blocks one at a time, in rank order, so that the
//! backing store is never hit by every participant at once. Rank `r` may
//! start loading only once rank `r-1` has released the fence. The fence is
//! a pure scheduling dependency: it carries no data and never uses the ring
//! channel.

use std::rc::Rc;

use ringmul_engine::events::once::Once;
use ringmul_engine::traits::Event;
use ringmul_engine::transfer_error;
use ringmul_engine::types::RingResult;
use ringmul_track::entity::Entity;
use ringmul_track::trace;

pub struct LoadFence {
    pub entity: Rc<Entity>,
    released: Vec<Once<()>>,
}

impl LoadFence {
    #[must_use]
    pub fn new(parent: &Rc<Entity>, ring_size: usize) -> Rc<Self> {
        Rc::new(Self {
            entity: Rc::new(Entity::new(parent, "fence")),
            released: (0..ring_size).map(|_| Once::default()).collect(),
        })
    }

    /// Wait until `rank` may start loading.
    pub async fn wait_turn(&self, rank: usize) -> RingResult {
        self.check_rank(rank)?;
        if rank > 0 {
            self.released[rank - 1].listen().await;
        }
        trace!(self.entity ; "rank {rank} may load");
        Ok(())
    }

    /// Let the successor of `rank` start loading.
    pub fn release(&self, rank: usize) -> RingResult {
        self.check_rank(rank)?;
        if self.released[rank].is_triggered() {
            return transfer_error!("{}: rank {rank} released twice", self.entity);
        }
        trace!(self.entity ; "rank {rank} released");
        self.released[rank].notify()
    }

    fn check_rank(&self, rank: usize) -> RingResult {
        if rank >= self.released.len() {
            return transfer_error!(
                "{}: rank {rank} is outside a ring of size {}",
                self.entity,
                self.released.len()
            );
        }
        Ok(())
    }
}
