use super::*;

use crate::avl::{LeafId, TreeId};
use crate::state::{Bid, SliceContents, SliceSettlement};

/// Read-only context the host ledger provides for one invocation.
#[derive(Debug, Clone, Copy)]
pub struct HostContext {
    /// Timestamp of the enclosing block.
    pub now: Timestamp,
    /// Height of the enclosing block.
    pub level: BlockHeight,
    /// Originator of the message.
    pub sender: Address,
    /// Address of the auction house itself.
    pub self_address: ContractAddress,
    /// Native value attached to the message. No entrypoint is payable.
    pub amount: Tez,
}

/// Protocol configuration, fixed at construction. Rates must be strictly
/// between zero and one.
#[derive(Debug, Clone, Copy, Serialize, SchemaType)]
pub struct Parameters {
    pub max_queue_height: u64,
    pub max_lot_size: Tez,
    pub min_lot_queue_fraction: Ratio,
    pub auction_decay_rate: Ratio,
    pub bid_improvement_factor: Ratio,
    pub liquidation_penalty: Ratio,
    pub bid_interval_secs: u64,
    pub bid_interval_blocks: u64,
    pub slices_to_process: u32,
    pub touch_batch_limit: u32,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            max_queue_height: MAX_QUEUE_HEIGHT,
            max_lot_size: MAX_LOT_SIZE,
            min_lot_queue_fraction: MIN_LOT_QUEUE_FRACTION,
            auction_decay_rate: AUCTION_DECAY_RATE,
            bid_improvement_factor: BID_IMPROVEMENT_FACTOR,
            liquidation_penalty: LIQUIDATION_PENALTY,
            bid_interval_secs: BID_INTERVAL_SECS,
            bid_interval_blocks: BID_INTERVAL_BLOCKS,
            slices_to_process: NUMBER_OF_SLICES_TO_PROCESS,
            touch_batch_limit: MAX_TOUCH_SLICES_BATCH,
        }
    }
}

/// Opaque capability the minter attaches to a cancellation, forwarded back
/// to it with the cancelled contents. Verified by the minter, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, SchemaType)]
pub struct Permission(pub Vec<u8>);

/// Claim on a placed bid, handed to the bidder on every bid and presented
/// back to reclaim either the kit or the won collateral. Reclaims are
/// accepted only from the recorded bidder and always pay that account; the
/// host's ticket authority guarantees the ticket itself is genuine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SchemaType)]
pub struct BidTicket {
    pub auction: TreeId,
    pub bid: Bid,
}

/// The message surface of the auction house.
#[derive(Debug, Clone, Serialize, SchemaType)]
pub enum AuctionMessage {
    /// Complete the current lot if it is due and start the next one at the
    /// given kit per tez price.
    Touch { price: Ratio },
    /// Trip if the burrow still has untouched slices in completed lots.
    EnsureNoUnclaimedSlices { burrow: BurrowAddress },
    /// Queue a fresh liquidation slice.
    SendSliceToAuction(SliceContents),
    /// Cancel a liquidation while the slice is still queued.
    CancelLiquidationOfSlice { leaf: LeafId, permission: Permission },
    /// Drain the listed slices of completed lots.
    TouchSlices(Vec<LeafId>),
    /// Drain up to `max` of the globally oldest completed slices.
    TouchOldestSlices { max: u32 },
    /// Bid on the current lot.
    PlaceBid { kit: Kit },
    /// Reclaim the kit of a bid that did not win.
    ReclaimBid(BidTicket),
    /// Claim the collateral of a won, fully drained lot.
    ReclaimWinningBid(BidTicket),
}

/// Outbound effect descriptors. The core never performs foreign calls
/// itself; the host interprets these after the transition commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Effect {
    /// Hand the cancelled slice back to the minter for re-crediting.
    CancelSliceLiquidation {
        minter: Address,
        permission: Permission,
        contents: SliceContents,
    },
    /// Tell a burrow to ship the collateral of a settled slice.
    BurrowSendSlice { burrow: BurrowAddress, tez: Tez },
    /// Forward the settlement data of a drained batch to the minter.
    SettleLiquidationSlices {
        minter: Address,
        settlements: Vec<SliceSettlement>,
        total_burn: Kit,
    },
    /// Issue a bid ticket to the bidder.
    TransferBidTicket {
        bidder: AccountAddress,
        ticket: BidTicket,
    },
    /// Return the kit of a losing bid.
    TransferKit { bidder: AccountAddress, kit: Kit },
    /// Ship won collateral to the winner.
    TransferTez { address: AccountAddress, tez: Tez },
}

/// Parameters the scenario tests run with: a 10 tez lot size and a decay
/// of 1/3600 per second keep the numbers easy to follow.
#[concordium_cfg_test]
pub fn test_parameters() -> Parameters {
    Parameters {
        max_queue_height: 20,
        max_lot_size: Tez::from_tez(10),
        min_lot_queue_fraction: Ratio::new(1, 20),
        auction_decay_rate: Ratio::new(1, 3600),
        bid_improvement_factor: Ratio::new(33, 10_000),
        liquidation_penalty: Ratio::new(1, 10),
        bid_interval_secs: 1200,
        bid_interval_blocks: 20,
        slices_to_process: 5,
        touch_batch_limit: 50,
    }
}
