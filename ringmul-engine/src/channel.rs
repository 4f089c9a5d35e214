// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! The ring channel.
//!
//! A [`RingChannel`] connects the `P` participants of a ring. Each
//! participant holds an [`Endpoint`] for its own rank and uses it to `send`
//! payloads to, and `receive` payloads from, any other rank.
//!
//! Every transfer is identified by the ordered pair of ranks and a [`Tag`].
//! Payloads with distinct tags on the same pair may be sent and received in
//! any order; a receive only ever completes with the payload sent under its
//! own tag.
//!
//! `send` is a buffered hand-off: it never suspends. `receive` returns a
//! future which completes once the matching payload has arrived in full.
//!
//! # Example
//!
//! ```rust
//! use ringmul_engine::channel::{RingChannel, Tag};
//! use ringmul_engine::engine::Engine;
//! use ringmul_engine::run_ring;
//!
//! let mut engine = Engine::default();
//! let channel = RingChannel::<Vec<u8>>::new(engine.top(), "channel", 3);
//! for rank in 0..3 {
//!     let endpoint = channel.endpoint(rank).unwrap();
//!     engine.spawn(async move {
//!         endpoint.send(endpoint.next_rank(), Tag::panel(0), vec![rank as u8])?;
//!         let got = endpoint.receive(endpoint.prev_rank(), Tag::panel(0), 1)?.await?;
//!         assert_eq!(got, vec![endpoint.prev_rank() as u8]);
//!         Ok(())
//!     });
//! }
//! run_ring!(engine);
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use futures::future::FusedFuture;
use ringmul_track::entity::Entity;
use ringmul_track::trace;

use crate::traits::Payload;
use crate::transfer_error;
use crate::types::RingResult;

/// Number of distinct [`Purpose`] values packed into an encoded tag.
pub const NUM_PURPOSES: u64 = 2;

/// The logical channel a transfer belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Purpose {
    /// A column-panel being rotated around the ring.
    Panel = 0,

    /// A completed row-band being gathered at the root.
    Band = 1,
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Purpose::Panel => write!(f, "panel"),
            Purpose::Band => write!(f, "band"),
        }
    }
}

/// Identifies one logical transfer between an ordered pair of ranks.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Tag {
    pub round: u32,
    pub purpose: Purpose,
}

impl Tag {
    #[must_use]
    pub fn panel(round: usize) -> Self {
        Self {
            round: round as u32,
            purpose: Purpose::Panel,
        }
    }

    #[must_use]
    pub fn band() -> Self {
        Self {
            round: 0,
            purpose: Purpose::Band,
        }
    }

    /// The small integer used to key the transfer on its link.
    #[must_use]
    pub fn encode(&self) -> u64 {
        u64::from(self.round) * NUM_PURPOSES + self.purpose as u64
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}@{}", self.purpose, self.round)
    }
}

/// Transfer counters for one ordered pair of ranks.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LinkStats {
    pub messages: usize,
    pub elements: usize,
}

/// The state shared between the two ends of one ordered pair of ranks.
struct Link<T>
where
    T: Payload,
{
    entity: Rc<Entity>,
    pending: RefCell<HashMap<u64, T>>,
    waiting: RefCell<HashMap<u64, Waker>>,
    num_messages: Cell<usize>,
    num_elements: Cell<usize>,
}

impl<T> Link<T>
where
    T: Payload,
{
    fn new(parent: &Rc<Entity>, source: usize, destination: usize) -> Self {
        Self {
            entity: Rc::new(Entity::new(
                parent,
                &format!("link{source}->{destination}"),
            )),
            pending: RefCell::new(HashMap::new()),
            waiting: RefCell::new(HashMap::new()),
            num_messages: Cell::new(0),
            num_elements: Cell::new(0),
        }
    }

    fn deliver(&self, tag: Tag, payload: T) -> RingResult {
        let key = tag.encode();
        let num_elements = payload.num_elements();
        {
            let mut pending = self.pending.borrow_mut();
            if pending.contains_key(&key) {
                return transfer_error!(
                    "{}: payload for tag {tag} is already pending",
                    self.entity
                );
            }
            pending.insert(key, payload);
        }

        self.num_messages.set(self.num_messages.get() + 1);
        self.num_elements.set(self.num_elements.get() + num_elements);
        trace!(self.entity ; "send {tag} ({num_elements} elements)");

        if let Some(waker) = self.waiting.borrow_mut().remove(&key) {
            waker.wake();
        }
        Ok(())
    }

    fn stats(&self) -> LinkStats {
        LinkStats {
            messages: self.num_messages.get(),
            elements: self.num_elements.get(),
        }
    }
}

/// Point-to-point tagged messaging between the ranks of a ring.
pub struct RingChannel<T>
where
    T: Payload,
{
    pub entity: Rc<Entity>,
    ring_size: usize,
    links: RefCell<HashMap<(usize, usize), Rc<Link<T>>>>,
}

impl<T> RingChannel<T>
where
    T: Payload,
{
    #[must_use]
    pub fn new(parent: &Rc<Entity>, name: &str, ring_size: usize) -> Rc<Self> {
        Rc::new(Self {
            entity: Rc::new(Entity::new(parent, name)),
            ring_size,
            links: RefCell::new(HashMap::new()),
        })
    }

    #[must_use]
    pub fn ring_size(&self) -> usize {
        self.ring_size
    }

    /// Create the endpoint owned by `rank`.
    pub fn endpoint(self: &Rc<Self>, rank: usize) -> RingResult<Endpoint<T>> {
        if rank >= self.ring_size {
            return transfer_error!(
                "{}: rank {rank} is outside a ring of size {}",
                self.entity,
                self.ring_size
            );
        }
        Ok(Endpoint {
            rank,
            channel: self.clone(),
        })
    }

    /// Transfer counters for the ordered pair, if anything was ever sent or
    /// received between them.
    #[must_use]
    pub fn link_stats(&self, source: usize, destination: usize) -> Option<LinkStats> {
        self.links
            .borrow()
            .get(&(source, destination))
            .map(|link| link.stats())
    }

    fn link(&self, source: usize, destination: usize) -> Rc<Link<T>> {
        self.links
            .borrow_mut()
            .entry((source, destination))
            .or_insert_with(|| Rc::new(Link::new(&self.entity, source, destination)))
            .clone()
    }

    fn check_peer(&self, rank: usize, peer: usize) -> RingResult {
        if peer >= self.ring_size {
            return transfer_error!(
                "{}: rank {peer} is outside a ring of size {}",
                self.entity,
                self.ring_size
            );
        }
        if peer == rank {
            return transfer_error!("{}: rank {rank} cannot transfer to itself", self.entity);
        }
        Ok(())
    }
}

/// One participant's view of the [`RingChannel`].
pub struct Endpoint<T>
where
    T: Payload,
{
    rank: usize,
    channel: Rc<RingChannel<T>>,
}

impl<T> Endpoint<T>
where
    T: Payload,
{
    #[must_use]
    pub fn rank(&self) -> usize {
        self.rank
    }

    #[must_use]
    pub fn ring_size(&self) -> usize {
        self.channel.ring_size
    }

    /// The successor of this rank in the ring.
    #[must_use]
    pub fn next_rank(&self) -> usize {
        (self.rank + 1) % self.channel.ring_size
    }

    /// The predecessor of this rank in the ring.
    #[must_use]
    pub fn prev_rank(&self) -> usize {
        (self.rank + self.channel.ring_size - 1) % self.channel.ring_size
    }

    /// Hand `payload` to `destination` under `tag`.
    ///
    /// This never suspends: the payload is owned by the link until the
    /// destination receives it.
    pub fn send(&self, destination: usize, tag: Tag, payload: T) -> RingResult {
        self.channel.check_peer(self.rank, destination)?;
        self.channel
            .link(self.rank, destination)
            .deliver(tag, payload)
    }

    /// Post a receive for the payload `source` sends under `tag`.
    ///
    /// The returned future completes with the payload once it has arrived,
    /// or with a transfer error if it does not hold `expected_elements`.
    pub fn receive(
        &self,
        source: usize,
        tag: Tag,
        expected_elements: usize,
    ) -> RingResult<Receive<T>> {
        self.channel.check_peer(self.rank, source)?;
        Ok(Receive {
            link: self.channel.link(source, self.rank),
            tag,
            expected_elements,
            done: false,
        })
    }
}

/// Future returned by [`Endpoint::receive`].
pub struct Receive<T>
where
    T: Payload,
{
    link: Rc<Link<T>>,
    tag: Tag,
    expected_elements: usize,
    done: bool,
}

impl<T> Future for Receive<T>
where
    T: Payload,
{
    type Output = RingResult<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let key = self.tag.encode();
        let payload = self.link.pending.borrow_mut().remove(&key);
        match payload {
            Some(payload) => {
                self.done = true;
                let num_elements = payload.num_elements();
                trace!(self.link.entity ; "receive {} ({num_elements} elements)", self.tag);
                if num_elements != self.expected_elements {
                    return Poll::Ready(transfer_error!(
                        "{}: expected {} elements for tag {}, received {num_elements}",
                        self.link.entity,
                        self.expected_elements,
                        self.tag
                    ));
                }
                Poll::Ready(Ok(payload))
            }
            None => {
                self.link
                    .waiting
                    .borrow_mut()
                    .insert(key, cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

impl<T> FusedFuture for Receive<T>
where
    T: Payload,
{
    fn is_terminated(&self) -> bool {
        self.done
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_distinct_small_integers() {
        assert_eq!(Tag::panel(0).encode(), 0);
        assert_eq!(Tag::band().encode(), 1);
        assert_eq!(Tag::panel(1).encode(), 2);
        assert_eq!(Tag::panel(6).encode(), 12);
        assert_ne!(Tag::panel(0).encode(), Tag::band().encode());
    }

    #[test]
    fn tag_display() {
        assert_eq!(format!("{}", Tag::panel(3)), "panel@3");
        assert_eq!(format!("{}", Tag::band()), "band@0");
    }
}
