use super::*;

/// Micro kit per kit.
pub const KIT_SCALING_FACTOR: u64 = 1_000_000;

/// Micro tez (mutez) per tez.
pub const TEZ_SCALING_FACTOR: u64 = 1_000_000;

/// Maximum height of the queue AVL tree. A height of 20 admits tens of
/// thousands of queued slices.
pub const MAX_QUEUE_HEIGHT: u64 = 20;

/// Lower bound of the lot split threshold.
pub const MAX_LOT_SIZE: Tez = Tez::from_tez(10_000);

/// Fraction of the queue that must go into a new lot when the queue is
/// deeper than [`MAX_LOT_SIZE`].
pub const MIN_LOT_QUEUE_FRACTION: Ratio = Ratio::new(1, 20);

/// Decay of the descending reserve price, per second. Must be strictly
/// between zero and one.
pub const AUCTION_DECAY_RATE: Ratio = Ratio::new(1, 10_000);

/// Minimum relative increment of an ascending bid.
pub const BID_IMPROVEMENT_FACTOR: Ratio = Ratio::new(33, 10_000);

/// Fraction of the proceeds of a warranted liquidation that is burned.
pub const LIQUIDATION_PENALTY: Ratio = Ratio::new(1, 10);

/// Seconds without a new bid before an ascending auction can complete.
pub const BID_INTERVAL_SECS: u64 = 1200;

/// Blocks without a new bid before an ascending auction can complete.
pub const BID_INTERVAL_BLOCKS: u64 = 20;

/// Upper bound on slices drained by a single `TouchOldestSlices` call.
pub const NUMBER_OF_SLICES_TO_PROCESS: u32 = 5;

/// Upper bound on the length of a user supplied `TouchSlices` list.
pub const MAX_TOUCH_SLICES_BATCH: u32 = 50;

/// Tag for the custom slice queued event.
pub const SLICE_QUEUED_TAG: u8 = u8::MAX;

/// Tag for the custom slice cancelled event.
pub const SLICE_CANCELLED_TAG: u8 = u8::MAX - 1;

/// Tag for the custom auction started event.
pub const AUCTION_STARTED_TAG: u8 = u8::MAX - 2;

/// Tag for the custom bid placed event.
pub const BID_PLACED_TAG: u8 = u8::MAX - 3;

/// Tag for the custom auction completed event.
pub const AUCTION_COMPLETED_TAG: u8 = u8::MAX - 4;

/// Tag for the custom slices touched event.
pub const SLICES_TOUCHED_TAG: u8 = u8::MAX - 5;

/// Tag for the custom winning bid reclaimed event.
pub const WINNING_BID_RECLAIMED_TAG: u8 = u8::MAX - 6;
