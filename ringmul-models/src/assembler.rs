// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! The result assembler.
//!
//! Runs on the root participant once its own rounds are complete. The root's
//! own row-band is placed directly; every other rank sends its completed
//! row-band as one flat buffer, which is rebuilt into a band-shaped matrix
//! (checking the element count) and copied into its rows of the product.

use std::cell::RefCell;
use std::rc::Rc;

use ringmul_engine::channel::{Endpoint, Tag};
use ringmul_engine::types::RingResult;
use ringmul_track::entity::Entity;
use ringmul_track::{debug, trace};

use crate::element::Element;
use crate::matrix::Matrix;
use crate::partition::Partition;

pub struct Assembler<E>
where
    E: Element,
{
    pub entity: Rc<Entity>,
    partition: Partition,
    root: usize,
    product: RefCell<Option<Matrix<E>>>,
}

impl<E> Assembler<E>
where
    E: Element,
{
    #[must_use]
    pub fn new(parent: &Rc<Entity>, partition: Partition, root: usize) -> Rc<Self> {
        Rc::new(Self {
            entity: Rc::new(Entity::new(parent, "assembler")),
            partition,
            root,
            product: RefCell::new(None),
        })
    }

    /// Collect every row-band, including the root's own `own_band`, into
    /// the global product.
    pub async fn gather(&self, own_band: Matrix<E>, endpoint: &Endpoint<Vec<E>>) -> RingResult {
        let dims = self.partition.dims();
        let mut product = Matrix::zeros(dims.n1, dims.n3);
        product.copy_block_from(self.partition.row_band(self.root).start, 0, &own_band)?;

        for rank in (0..self.partition.ring_size()).filter(|rank| *rank != self.root) {
            let rows = self.partition.row_band(rank);
            let flat = endpoint
                .receive(rank, Tag::band(), self.partition.band_elements(rank))?
                .await?;
            let band = Matrix::from_vec(rows.len(), dims.n3, flat)?;
            product.copy_block_from(rows.start, 0, &band)?;
            trace!(self.entity ; "placed band of rank {rank} at rows {rows:?}");
        }

        debug!(self.entity ; "assembled {}x{} product", dims.n1, dims.n3);
        *self.product.borrow_mut() = Some(product);
        Ok(())
    }

    /// Take the assembled product, if gathering has completed.
    #[must_use]
    pub fn take_product(&self) -> Option<Matrix<E>> {
        self.product.borrow_mut().take()
    }
}
