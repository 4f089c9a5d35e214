// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! One member of the multiplication ring.
//!
//! A participant owns its row-band of `A`, the column-panel of `B` it
//! currently holds, and the accumulator for its band of `C`. It moves
//! through the phases:
//!
//! ```text
//! Loading -> Round(0) -> ... -> Round(P-2) -> Draining -> Done
//! ```
//!
//!  - `Loading`: wait for the load fence, load the row-band and the initial
//!    panel, then release the fence for the next rank.
//!  - `Round(i)`: send the held panel to the next rank and post the receive
//!    for the panel from the previous rank, multiply the held panel while
//!    the transfer is in flight, then wait for the new panel. The final
//!    panel is multiplied at the end of the last round.
//!  - `Draining`: the root gathers every band through its
//!    [`Assembler`]; every other rank sends its accumulator to the root.
//!
//! The panel held in round `i` started at rank `(r - i) mod P`, so its
//! columns of the accumulator are found from that index.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use ringmul_engine::channel::{Endpoint, Tag};
use ringmul_engine::engine::Engine;
use ringmul_engine::traits::Runnable;
use ringmul_engine::types::RingResult;
use ringmul_track::entity::Entity;
use ringmul_track::{debug, info, trace};

use crate::assembler::Assembler;
use crate::element::Element;
use crate::fence::LoadFence;
use crate::kernel::multiply_accumulate;
use crate::matrix::Matrix;
use crate::partition::Partition;
use crate::source::MatrixSource;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    Loading,
    Round(usize),
    Draining,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Phase::Loading => write!(f, "loading"),
            Phase::Round(i) => write!(f, "round {i}"),
            Phase::Draining => write!(f, "draining"),
            Phase::Done => write!(f, "done"),
        }
    }
}

/// What a participant reports once it is done.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticipantReport {
    pub rank: usize,

    /// Duration of the compute and communication, excluding the load.
    pub elapsed: Duration,

    /// The global column-panel indices multiplied, in order.
    pub panel_order: Vec<usize>,
}

pub struct Participant<E>
where
    E: Element,
{
    pub entity: Rc<Entity>,
    partition: Partition,
    root: usize,
    endpoint: Endpoint<Vec<E>>,
    fence: Rc<LoadFence>,
    source: Rc<dyn MatrixSource<E>>,
    assembler: Option<Rc<Assembler<E>>>,
    phase: Cell<Phase>,
    report: RefCell<Option<ParticipantReport>>,
}

impl<E> Participant<E>
where
    E: Element,
{
    /// Create a participant and register it to run with the `engine`.
    ///
    /// Only the participant whose rank is `root` keeps the `assembler`.
    #[expect(clippy::too_many_arguments)]
    pub fn new_and_register(
        engine: &Engine,
        parent: &Rc<Entity>,
        partition: Partition,
        root: usize,
        endpoint: Endpoint<Vec<E>>,
        fence: Rc<LoadFence>,
        source: Rc<dyn MatrixSource<E>>,
        assembler: Rc<Assembler<E>>,
    ) -> Rc<Self> {
        let rank = endpoint.rank();
        let entity = Rc::new(Entity::new(parent, &format!("participant{rank}")));
        let assembler = (rank == root).then_some(assembler);
        let rc_self = Rc::new(Self {
            entity,
            partition,
            root,
            endpoint,
            fence,
            source,
            assembler,
            phase: Cell::new(Phase::Loading),
            report: RefCell::new(None),
        });
        engine.register(rc_self.clone());
        rc_self
    }

    #[must_use]
    pub fn rank(&self) -> usize {
        self.endpoint.rank()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase.get()
    }

    /// The report, once the participant is done.
    #[must_use]
    pub fn report(&self) -> Option<ParticipantReport> {
        self.report.borrow().clone()
    }

    fn enter(&self, phase: Phase) {
        debug!(self.entity ; "{phase}");
        self.phase.set(phase);
    }

    fn accumulate(
        &self,
        band: &Matrix<E>,
        panel: &Matrix<E>,
        panel_index: usize,
        acc: &mut Matrix<E>,
        panel_order: &mut Vec<usize>,
    ) -> RingResult {
        let col_offset = self.partition.col_panel(panel_index).start;
        multiply_accumulate(band, panel, acc, col_offset)?;
        panel_order.push(panel_index);
        Ok(())
    }

    async fn load(&self) -> RingResult<(Matrix<E>, Matrix<E>)> {
        let rank = self.rank();
        self.fence.wait_turn(rank).await?;
        let band = self.source.load_band(self.partition.row_band(rank))?;
        let panel = self.source.load_panel(self.partition.col_panel(rank))?;
        self.fence.release(rank)?;
        Ok((band, panel))
    }
}

#[async_trait(?Send)]
impl<E> Runnable for Participant<E>
where
    E: Element,
{
    async fn run(&self) -> RingResult {
        let rank = self.rank();
        let ring_size = self.partition.ring_size();
        let dims = self.partition.dims();

        self.enter(Phase::Loading);
        let (band, mut panel) = self.load().await?;

        let start = Instant::now();
        let mut acc = Matrix::zeros(band.rows(), dims.n3);
        let mut panel_index = rank;
        let mut panel_order = Vec::with_capacity(ring_size);

        let next = self.endpoint.next_rank();
        let prev = self.endpoint.prev_rank();
        for round in 0..ring_size - 1 {
            self.enter(Phase::Round(round));

            self.endpoint
                .send(next, Tag::panel(round), panel.as_slice().to_vec())?;
            trace!(self.entity ; "sent panel {panel_index} to {next}");

            let incoming_index = (panel_index + ring_size - 1) % ring_size;
            let incoming = self.endpoint.receive(
                prev,
                Tag::panel(round),
                self.partition.panel_elements(incoming_index),
            )?;

            self.accumulate(&band, &panel, panel_index, &mut acc, &mut panel_order)?;

            let flat = incoming.await?;
            panel = Matrix::from_vec(
                dims.n2,
                self.partition.col_panel(incoming_index).len(),
                flat,
            )?;
            panel_index = incoming_index;
            trace!(self.entity ; "received panel {panel_index} from {prev}");
        }
        self.accumulate(&band, &panel, panel_index, &mut acc, &mut panel_order)?;

        self.enter(Phase::Draining);
        match &self.assembler {
            Some(assembler) => assembler.gather(acc, &self.endpoint).await?,
            None => {
                self.endpoint.send(self.root, Tag::band(), acc.into_vec())?;
                trace!(self.entity ; "sent band to root {}", self.root);
            }
        }

        let elapsed = start.elapsed();
        info!(self.entity ; "compute and communication took {elapsed:?}");
        *self.report.borrow_mut() = Some(ParticipantReport {
            rank,
            elapsed,
            panel_order,
        });
        self.enter(Phase::Done);
        Ok(())
    }
}
