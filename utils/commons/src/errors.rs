use super::*;

/// The custom errors the auction house can produce.
#[derive(Serialize, Debug, PartialEq, Eq, Reject, SchemaType)]
pub enum CustomContractError {
    /// Sender is not allowed to call this entrypoint (Error code: -1).
    Unauthorized,
    /// Native value was attached to a non-payable entrypoint (Error code: -2).
    UnwantedValueAttached,
    /// This function must only be called by an account (Error code: -3).
    OnlyAccountAddress,
    /// The auction queue is at its maximum height (Error code: -4).
    QueueTooLong,
    /// Raised if a bid is below the current minimum bid (Error code: -5).
    BidTooLow,
    /// Raised if a bid is placed while no auction is running (Error code: -6).
    NoOpenAuction,
    /// Attempt to cancel a slice that already left the queue (Error code: -7).
    UnwarrantedCancellation,
    /// The leading bid cannot be reclaimed (Error code: -8).
    CannotReclaimLeadingBid,
    /// A winning bid can only be reclaimed through the winning entrypoint
    /// (Error code: -9).
    CannotReclaimWinningBid,
    /// The presented ticket does not match a winning bid (Error code: -10).
    NotAWinningBid,
    /// The won collateral cannot be claimed before every slice of the lot has
    /// been touched (Error code: -11).
    NotAllSlicesClaimed,
    /// Attempt to touch a slice that is not part of a completed auction
    /// (Error code: -12).
    NotACompletedSlice,
    /// The burrow still has slices in completed auctions that were not
    /// touched (Error code: -13).
    BurrowHasCompletedLiquidation,
    /// The touched slice list is over the batch limit (Error code: -14).
    TooManySlices,
}
