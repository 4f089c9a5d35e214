// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Build and run a complete multiplication ring.
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//!
//! use ringmul_engine::engine::Engine;
//! use ringmul_models::matrix::Matrix;
//! use ringmul_models::partition::Dims;
//! use ringmul_models::pipeline::{PipelineConfig, run_pipelined};
//! use ringmul_models::source::{InMemorySource, MatrixSource};
//!
//! let a = Matrix::filled(8, 4, 1);
//! let b = Matrix::filled(4, 8, 1);
//! let source: Rc<dyn MatrixSource<i32>> = Rc::new(InMemorySource::new(a, b).unwrap());
//!
//! let mut engine = Engine::default();
//! let config = PipelineConfig::new(Dims::new(8, 4, 8), 2);
//! let outcome = run_pipelined(&mut engine, &config, source).unwrap();
//! assert_eq!(outcome.product, Matrix::filled(8, 8, 4));
//! ```

use std::rc::Rc;

use ringmul_engine::channel::RingChannel;
use ringmul_engine::engine::Engine;
use ringmul_engine::types::RingResult;
use ringmul_engine::{config_error, transfer_error};
use ringmul_track::entity::Entity;
use ringmul_track::info;

use crate::assembler::Assembler;
use crate::element::Element;
use crate::fence::LoadFence;
use crate::matrix::Matrix;
use crate::participant::{Participant, ParticipantReport};
use crate::partition::{Dims, Partition};
use crate::source::MatrixSource;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PipelineConfig {
    pub dims: Dims,
    pub ring_size: usize,

    /// The rank that assembles the product.
    pub root: usize,
}

impl PipelineConfig {
    #[must_use]
    pub fn new(dims: Dims, ring_size: usize) -> Self {
        Self {
            dims,
            ring_size,
            root: 0,
        }
    }

    #[must_use]
    pub fn with_root(mut self, root: usize) -> Self {
        self.root = root;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PipelineOutcome<E>
where
    E: Element,
{
    pub product: Matrix<E>,

    /// One report per rank, in rank order.
    pub reports: Vec<ParticipantReport>,
}

pub struct Pipeline<E>
where
    E: Element,
{
    pub entity: Rc<Entity>,
    channel: Rc<RingChannel<Vec<E>>>,
    participants: Vec<Rc<Participant<E>>>,
    assembler: Rc<Assembler<E>>,
}

/// Validate `config` and register a ring of participants with `engine`.
///
/// Nothing is created until the partition has been validated, so an invalid
/// configuration is rejected before any participant can communicate.
pub fn build_pipeline<E>(
    engine: &Engine,
    config: &PipelineConfig,
    source: Rc<dyn MatrixSource<E>>,
) -> RingResult<Pipeline<E>>
where
    E: Element,
{
    let partition = Partition::new(config.dims, config.ring_size)?;
    if config.root >= config.ring_size {
        return config_error!(
            "root rank {} is outside a ring of size {}",
            config.root,
            config.ring_size
        );
    }

    let entity = Rc::new(Entity::new(engine.top(), "ring"));
    let channel = RingChannel::new(&entity, "channel", config.ring_size);
    let fence = LoadFence::new(&entity, config.ring_size);
    let assembler = Assembler::new(&entity, partition, config.root);

    let mut participants = Vec::with_capacity(config.ring_size);
    for rank in 0..config.ring_size {
        participants.push(Participant::new_and_register(
            engine,
            &entity,
            partition,
            config.root,
            channel.endpoint(rank)?,
            fence.clone(),
            source.clone(),
            assembler.clone(),
        ));
    }

    info!(entity ; "{} ring of {} over {}", E::TYPE, config.ring_size, config.dims);
    Ok(Pipeline {
        entity,
        channel,
        participants,
        assembler,
    })
}

impl<E> Pipeline<E>
where
    E: Element,
{
    /// Run the `engine` the pipeline was built with to completion.
    pub fn run(&self, engine: &mut Engine) -> RingResult<PipelineOutcome<E>> {
        engine.run()?;

        let Some(product) = self.assembler.take_product() else {
            return transfer_error!("{}: the product was never assembled", self.entity);
        };
        let mut reports = Vec::with_capacity(self.participants.len());
        for participant in &self.participants {
            match participant.report() {
                Some(report) => reports.push(report),
                None => {
                    return transfer_error!("{}: did not complete", participant.entity);
                }
            }
        }
        Ok(PipelineOutcome { product, reports })
    }

    #[must_use]
    pub fn channel(&self) -> &Rc<RingChannel<Vec<E>>> {
        &self.channel
    }

    #[must_use]
    pub fn participants(&self) -> &[Rc<Participant<E>>] {
        &self.participants
    }
}

/// Build a pipeline with [`build_pipeline`] and run it.
pub fn run_pipelined<E>(
    engine: &mut Engine,
    config: &PipelineConfig,
    source: Rc<dyn MatrixSource<E>>,
) -> RingResult<PipelineOutcome<E>>
where
    E: Element,
{
    let pipeline = build_pipeline(engine, config, source)?;
    pipeline.run(engine)
}
