use super::*;

use crate::avl::{LeafId, TreeId};

/// An untagged event of a slice entering the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serial)]
pub struct SliceQueuedEvent {
    pub leaf: LeafId,
    pub burrow: BurrowAddress,
    pub tez: Tez,
}

/// An untagged event of a queued slice being cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serial)]
pub struct SliceCancelledEvent {
    pub leaf: LeafId,
    pub burrow: BurrowAddress,
    pub tez: Tez,
}

/// An untagged event of a lot opening in the descending phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serial)]
pub struct AuctionStartedEvent {
    pub auction: TreeId,
    pub lot_tez: Tez,
    pub start_value: Kit,
}

/// An untagged event of a bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serial)]
pub struct BidPlacedEvent {
    pub auction: TreeId,
    pub bidder: AccountAddress,
    pub kit: Kit,
}

/// An untagged event of a lot completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serial)]
pub struct AuctionCompletedEvent {
    pub auction: TreeId,
    pub winner: AccountAddress,
    pub kit: Kit,
    pub sold_tez: Tez,
}

/// An untagged event of a drained batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serial)]
pub struct SlicesTouchedEvent {
    pub count: u32,
    pub burned: Kit,
}

/// An untagged event of a winner claiming the collateral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serial)]
pub struct WinningBidReclaimedEvent {
    pub auction: TreeId,
    pub winner: AccountAddress,
    pub tez: Tez,
}

/// Tagged custom event to be serialized for the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomEvent {
    SliceQueued(SliceQueuedEvent),
    SliceCancelled(SliceCancelledEvent),
    AuctionStarted(AuctionStartedEvent),
    BidPlaced(BidPlacedEvent),
    AuctionCompleted(AuctionCompletedEvent),
    SlicesTouched(SlicesTouchedEvent),
    WinningBidReclaimed(WinningBidReclaimedEvent),
}

impl Serial for CustomEvent {
    fn serial<W: Write>(&self, out: &mut W) -> Result<(), W::Err> {
        match self {
            CustomEvent::SliceQueued(event) => {
                out.write_u8(SLICE_QUEUED_TAG)?;
                event.serial(out)
            }
            CustomEvent::SliceCancelled(event) => {
                out.write_u8(SLICE_CANCELLED_TAG)?;
                event.serial(out)
            }
            CustomEvent::AuctionStarted(event) => {
                out.write_u8(AUCTION_STARTED_TAG)?;
                event.serial(out)
            }
            CustomEvent::BidPlaced(event) => {
                out.write_u8(BID_PLACED_TAG)?;
                event.serial(out)
            }
            CustomEvent::AuctionCompleted(event) => {
                out.write_u8(AUCTION_COMPLETED_TAG)?;
                event.serial(out)
            }
            CustomEvent::SlicesTouched(event) => {
                out.write_u8(SLICES_TOUCHED_TAG)?;
                event.serial(out)
            }
            CustomEvent::WinningBidReclaimed(event) => {
                out.write_u8(WINNING_BID_RECLAIMED_TAG)?;
                event.serial(out)
            }
        }
    }
}

/// Collector for the events of one invocation, drained by the host after
/// the transition commits.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<CustomEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        EventLog { events: Vec::new() }
    }

    pub fn log(&mut self, event: CustomEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[CustomEvent] {
        &self.events
    }
}
