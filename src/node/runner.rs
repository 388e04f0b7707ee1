//! Async wrapper around [`Node`]: edge events arrive through a pre-allocated
//! [`embassy_sync::channel::Channel`], the runner sleeps on an `embassy-time`
//! timer between iterations. No allocation, no dependency on a particular BSP.
use core::convert::Infallible;

use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    channel::{Channel, Receiver, Sender},
};
use embassy_time::{Instant, Timer};
use embedded_hal::delay::DelayNs;
use futures_util::{future::select, future::Either, pin_mut};

use crate::core::EdgeEvent;
use crate::node::Node;
use crate::protocol::transport::traits::can_bus::CanBus;
use crate::protocol::transport::traits::trigger_pin::TriggerPin;

/// Channel carrying edge events from the interrupt or callback context to the node.
pub type EdgeChannel<const N: usize> = Channel<CriticalSectionRawMutex, EdgeEvent, N>;

/// Service pairing a node with its edge channel.
pub struct NodeService<'a, B, P, D, const TX_CAP: usize, const EDGE_CAP: usize> {
    node: Node<B, P, D, TX_CAP>,
    edges: &'a EdgeChannel<EDGE_CAP>,
}

impl<'a, B, P, D, const TX_CAP: usize, const EDGE_CAP: usize>
    NodeService<'a, B, P, D, TX_CAP, EDGE_CAP>
where
    B: CanBus,
    P: TriggerPin,
    D: DelayNs,
{
    pub fn new(node: Node<B, P, D, TX_CAP>, edges: &'a EdgeChannel<EDGE_CAP>) -> Self {
        Self { node, edges }
    }

    /// Split into the producer handle and the runner.
    pub fn into_parts(self) -> NodeServiceParts<'a, B, P, D, TX_CAP, EDGE_CAP> {
        NodeServiceParts {
            edges: EdgeSender {
                sender: self.edges.sender(),
            },
            runner: NodeRunner {
                node: self.node,
                edges: self.edges.receiver(),
            },
        }
    }
}

/// Bundle returned by [`NodeService::into_parts`].
pub struct NodeServiceParts<'a, B, P, D, const TX_CAP: usize, const EDGE_CAP: usize> {
    pub edges: EdgeSender<'a, EDGE_CAP>,
    pub runner: NodeRunner<'a, B, P, D, TX_CAP, EDGE_CAP>,
}

/// Producer side, handed to whatever observes the echo line.
#[derive(Clone, Copy)]
pub struct EdgeSender<'a, const EDGE_CAP: usize> {
    sender: Sender<'a, CriticalSectionRawMutex, EdgeEvent, EDGE_CAP>,
}

impl<const EDGE_CAP: usize> EdgeSender<'_, EDGE_CAP> {
    /// Post an edge without waiting. Returns `false` when the channel is full
    /// and the event was dropped.
    pub fn post(&self, event: EdgeEvent) -> bool {
        if self.sender.try_send(event).is_err() {
            warn!("edge channel full, edge at {} dropped", event.tick.as_micros());
            return false;
        }
        true
    }
}

/// Runner that drives the node loop forever.
pub struct NodeRunner<'a, B, P, D, const TX_CAP: usize, const EDGE_CAP: usize> {
    node: Node<B, P, D, TX_CAP>,
    edges: Receiver<'a, CriticalSectionRawMutex, EdgeEvent, EDGE_CAP>,
}

impl<B, P, D, const TX_CAP: usize, const EDGE_CAP: usize> NodeRunner<'_, B, P, D, TX_CAP, EDGE_CAP>
where
    B: CanBus,
    P: TriggerPin,
    D: DelayNs,
{
    /// Handle every edge already waiting in the channel.
    pub fn pump_edges(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.edges.try_receive() {
            self.node.handle_edge(event);
            handled += 1;
        }
        handled
    }

    /// One full iteration at `now`: pending edges, then [`Node::step`].
    pub async fn iterate(&mut self, now: Instant) {
        self.pump_edges();
        self.node.step(now).await;
    }

    /// Run forever. Between iterations, sleep until an edge arrives or the
    /// node's next wake-up instant, whichever comes first.
    pub async fn drive(mut self) -> Infallible {
        loop {
            self.iterate(Instant::now()).await;

            let wake = self.node.next_wake(Instant::now());
            let edge_future = self.edges.receive();
            let timer_future = Timer::at(wake);
            pin_mut!(edge_future);
            pin_mut!(timer_future);

            match select(edge_future, timer_future).await {
                Either::Left((event, _)) => {
                    self.node.handle_edge(event);
                }
                Either::Right(((), _)) => {}
            }
        }
    }

    pub fn node(&self) -> &Node<B, P, D, TX_CAP> {
        &self.node
    }

    pub fn node_mut(&mut self) -> &mut Node<B, P, D, TX_CAP> {
        &mut self.node
    }
}
