use super::*;

use crate::avl::LeafId;
use crate::events::*;
use crate::external::*;
use crate::state::*;

/// Entry point of the auction house: one message, one atomic transition
/// `(message, state) -> (effects, state')`. On error the host discards the
/// candidate state, so no partial transition is ever observable.
pub fn invoke(
    ctx: &HostContext,
    message: AuctionMessage,
    state: &mut State,
    logger: &mut EventLog,
) -> ContractResult<Vec<Effect>> {
    ensure!(
        ctx.amount == Tez::zero(),
        CustomContractError::UnwantedValueAttached
    );
    match message {
        AuctionMessage::Touch { price } => handle_touch(ctx, price, state, logger),
        AuctionMessage::EnsureNoUnclaimedSlices { burrow } => {
            handle_ensure_no_unclaimed(ctx, burrow, state)
        }
        AuctionMessage::SendSliceToAuction(contents) => {
            handle_send_slice(ctx, contents, state, logger)
        }
        AuctionMessage::CancelLiquidationOfSlice { leaf, permission } => {
            handle_cancel_slice(ctx, leaf, permission, state, logger)
        }
        AuctionMessage::TouchSlices(leaves) => handle_touch_slices(ctx, leaves, state, logger),
        AuctionMessage::TouchOldestSlices { max } => {
            handle_touch_oldest_slices(ctx, max, state, logger)
        }
        AuctionMessage::PlaceBid { kit } => handle_place_bid(ctx, kit, state, logger),
        AuctionMessage::ReclaimBid(ticket) => handle_reclaim_bid(ctx, ticket, state),
        AuctionMessage::ReclaimWinningBid(ticket) => {
            handle_reclaim_winning_bid(ctx, ticket, state, logger)
        }
    }
}

fn only_minter(ctx: &HostContext, state: &State) -> ContractResult<()> {
    ensure!(ctx.sender == state.minter, CustomContractError::Unauthorized);
    Ok(())
}

fn account_sender(ctx: &HostContext) -> ContractResult<AccountAddress> {
    match ctx.sender {
        Address::Account(account) => Ok(account),
        Address::Contract(_) => bail!(CustomContractError::OnlyAccountAddress),
    }
}

fn handle_touch(
    ctx: &HostContext,
    price: Ratio,
    state: &mut State,
    logger: &mut EventLog,
) -> ContractResult<Vec<Effect>> {
    only_minter(ctx, state)?;
    if let Some((auction, winner, sold_tez)) =
        state.complete_auction_if_possible(ctx.now, ctx.level)
    {
        logger.log(CustomEvent::AuctionCompleted(AuctionCompletedEvent {
            auction,
            winner: winner.address,
            kit: winner.kit,
            sold_tez,
        }));
    }
    if let Some((auction, start_value)) = state.start_auction_if_possible(ctx.now, price) {
        logger.log(CustomEvent::AuctionStarted(AuctionStartedEvent {
            auction,
            lot_tez: state.current_auction_tez().unwrap_abort(),
            start_value,
        }));
    }
    Ok(Vec::new())
}

fn handle_ensure_no_unclaimed(
    ctx: &HostContext,
    burrow: BurrowAddress,
    state: &mut State,
) -> ContractResult<Vec<Effect>> {
    only_minter(ctx, state)?;
    state.ensure_burrow_has_no_unclaimed_slices(burrow)?;
    Ok(Vec::new())
}

fn handle_send_slice(
    ctx: &HostContext,
    contents: SliceContents,
    state: &mut State,
    logger: &mut EventLog,
) -> ContractResult<Vec<Effect>> {
    only_minter(ctx, state)?;
    let leaf = state.send_to_auction(contents)?;
    logger.log(CustomEvent::SliceQueued(SliceQueuedEvent {
        leaf,
        burrow: contents.burrow,
        tez: contents.tez,
    }));
    Ok(Vec::new())
}

fn handle_cancel_slice(
    ctx: &HostContext,
    leaf: LeafId,
    permission: Permission,
    state: &mut State,
    logger: &mut EventLog,
) -> ContractResult<Vec<Effect>> {
    only_minter(ctx, state)?;
    let contents = state.cancel_slice(leaf)?;
    logger.log(CustomEvent::SliceCancelled(SliceCancelledEvent {
        leaf,
        burrow: contents.burrow,
        tez: contents.tez,
    }));
    Ok(vec![Effect::CancelSliceLiquidation {
        minter: state.minter,
        permission,
        contents,
    }])
}

fn handle_touch_slices(
    ctx: &HostContext,
    leaves: Vec<LeafId>,
    state: &mut State,
    logger: &mut EventLog,
) -> ContractResult<Vec<Effect>> {
    only_minter(ctx, state)?;
    ensure!(
        leaves.len() <= state.parameters.touch_batch_limit as usize,
        CustomContractError::TooManySlices
    );
    let mut drained = Vec::new();
    for leaf in leaves {
        drained.push(state.touch_completed_slice(leaf)?);
    }
    Ok(settle_drained(state, logger, drained))
}

fn handle_touch_oldest_slices(
    ctx: &HostContext,
    max: u32,
    state: &mut State,
    logger: &mut EventLog,
) -> ContractResult<Vec<Effect>> {
    only_minter(ctx, state)?;
    let cap = max.min(state.parameters.slices_to_process);
    let mut drained = Vec::new();
    for _ in 0..cap {
        match state.oldest_completed_slice() {
            Some(leaf) => drained.push(state.touch_completed_slice(leaf)?),
            None => break,
        }
    }
    Ok(settle_drained(state, logger, drained))
}

/// Build the drain effects, in slice order: one collateral call per slice,
/// then the settlement batch for the minter.
fn settle_drained(
    state: &State,
    logger: &mut EventLog,
    drained: Vec<(SliceSettlement, Kit)>,
) -> Vec<Effect> {
    let mut effects = Vec::new();
    let mut settlements = Vec::new();
    let mut total_burn = Kit::zero();
    for (settlement, penalty) in drained {
        effects.push(Effect::BurrowSendSlice {
            burrow: settlement.contents.burrow,
            tez: settlement.contents.tez,
        });
        total_burn += penalty;
        settlements.push(settlement);
    }
    if settlements.is_empty() {
        return effects;
    }
    logger.log(CustomEvent::SlicesTouched(SlicesTouchedEvent {
        count: settlements.len() as u32,
        burned: total_burn,
    }));
    effects.push(Effect::SettleLiquidationSlices {
        minter: state.minter,
        settlements,
        total_burn,
    });
    effects
}

fn handle_place_bid(
    ctx: &HostContext,
    kit: Kit,
    state: &mut State,
    logger: &mut EventLog,
) -> ContractResult<Vec<Effect>> {
    let bidder = account_sender(ctx)?;
    let ticket = state.place_bid(bidder, kit, ctx.now, ctx.level)?;
    logger.log(CustomEvent::BidPlaced(BidPlacedEvent {
        auction: ticket.auction,
        bidder,
        kit,
    }));
    Ok(vec![Effect::TransferBidTicket { bidder, ticket }])
}

fn handle_reclaim_bid(
    ctx: &HostContext,
    ticket: BidTicket,
    state: &mut State,
) -> ContractResult<Vec<Effect>> {
    let claimer = account_sender(ctx)?;
    ensure!(
        claimer == ticket.bid.address,
        CustomContractError::Unauthorized
    );
    let kit = state.reclaim_losing_bid(&ticket)?;
    Ok(vec![Effect::TransferKit {
        bidder: ticket.bid.address,
        kit,
    }])
}

fn handle_reclaim_winning_bid(
    ctx: &HostContext,
    ticket: BidTicket,
    state: &mut State,
    logger: &mut EventLog,
) -> ContractResult<Vec<Effect>> {
    let claimer = account_sender(ctx)?;
    ensure!(
        claimer == ticket.bid.address,
        CustomContractError::Unauthorized
    );
    let tez = state.reclaim_winning_bid(&ticket)?;
    logger.log(CustomEvent::WinningBidReclaimed(WinningBidReclaimedEvent {
        auction: ticket.auction,
        winner: ticket.bid.address,
        tez,
    }));
    Ok(vec![Effect::TransferTez {
        address: ticket.bid.address,
        tez,
    }])
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use crate::arena::NodeId;
    use core::fmt::Debug;

    const MINTER: AccountAddress = AccountAddress([0u8; 32]);
    const BURROW_1: AccountAddress = AccountAddress([1u8; 32]);
    const BURROW_2: AccountAddress = AccountAddress([2u8; 32]);
    const ALICE: AccountAddress = AccountAddress([3u8; 32]);
    const BOB: AccountAddress = AccountAddress([4u8; 32]);

    fn new_state() -> State {
        State::new(test_parameters(), Address::Account(MINTER))
    }

    fn contents(burrow: AccountAddress, tez: u64, min_kit: u64) -> SliceContents {
        SliceContents {
            burrow,
            tez: Tez::from_tez(tez),
            min_kit_for_unwarranted: Kit::from_kit(min_kit),
        }
    }

    fn ts(secs: u64) -> Timestamp {
        Timestamp::from_timestamp_millis(secs * 1000)
    }

    fn ctx_at(sender: AccountAddress, now_secs: u64, level: u64) -> HostContext {
        HostContext {
            now: ts(now_secs),
            level,
            sender: Address::Account(sender),
            self_address: ContractAddress {
                index: 42,
                subindex: 0,
            },
            amount: Tez::zero(),
        }
    }

    fn minter_ctx(now_secs: u64, level: u64) -> HostContext {
        ctx_at(MINTER, now_secs, level)
    }

    fn expect_error<T: Debug>(
        result: ContractResult<T>,
        expected: CustomContractError,
        msg: &str,
    ) {
        let actual = result.expect_err(msg);
        claim_eq!(actual, expected);
    }

    /// Touch from the minter and return the logged events.
    fn touch(state: &mut State, price: Ratio, now_secs: u64, level: u64) -> Vec<CustomEvent> {
        let mut logger = EventLog::new();
        let effects = invoke(
            &minter_ctx(now_secs, level),
            AuctionMessage::Touch { price },
            state,
            &mut logger,
        )
        .expect("touch failed");
        claim!(effects.is_empty());
        logger.events().to_vec()
    }

    /// Bid through the dispatcher and return the issued ticket.
    fn place_bid(
        state: &mut State,
        bidder: AccountAddress,
        micro_kit: u64,
        now_secs: u64,
        level: u64,
    ) -> BidTicket {
        let mut logger = EventLog::new();
        let effects = invoke(
            &ctx_at(bidder, now_secs, level),
            AuctionMessage::PlaceBid {
                kit: Kit::from_micro_kit(micro_kit),
            },
            state,
            &mut logger,
        )
        .expect("bid rejected");
        match &effects[..] {
            [Effect::TransferBidTicket { ticket, .. }] => *ticket,
            other => fail!("unexpected bid effects: {:?}", other),
        }
    }

    #[concordium_test]
    /// Queue one slice and cancel it again: the state ends up exactly where
    /// it started and the minter gets the cancel callback.
    fn test_send_then_cancel_is_a_no_op() {
        let mut state = new_state();
        let mut logger = EventLog::new();
        let nodes_before = state.arena.node_count();

        let effects = invoke(
            &minter_ctx(0, 0),
            AuctionMessage::SendSliceToAuction(contents(BURROW_1, 5, 10)),
            &mut state,
            &mut logger,
        )
        .expect("send failed");
        claim!(effects.is_empty());
        let leaf = match logger.events() {
            [CustomEvent::SliceQueued(event)] => event.leaf,
            other => fail!("unexpected events: {:?}", other),
        };
        claim_eq!(state.queued_tez(), Tez::from_tez(5));

        let effects = invoke(
            &minter_ctx(1, 1),
            AuctionMessage::CancelLiquidationOfSlice {
                leaf,
                permission: Permission(vec![7]),
            },
            &mut state,
            &mut logger,
        )
        .expect("cancel failed");
        claim_eq!(
            effects,
            vec![Effect::CancelSliceLiquidation {
                minter: Address::Account(MINTER),
                permission: Permission(vec![7]),
                contents: contents(BURROW_1, 5, 10),
            }]
        );
        claim_eq!(state.queued_tez(), Tez::zero());
        claim!(state.burrow_slices.is_empty());
        claim_eq!(state.arena.node_count(), nodes_before);
    }

    #[concordium_test]
    /// A slice that moved into the current lot can no longer be cancelled,
    /// while its requeued other half still can.
    fn test_cancel_after_lot_start_is_unwarranted() {
        let mut state = new_state();
        let mut logger = EventLog::new();
        state
            .send_to_auction(contents(BURROW_1, 12, 10))
            .expect("send failed");
        touch(&mut state, Ratio::new(1, 1), 0, 0);
        let head = *state.burrow_slices.get(&BURROW_1).expect("head is gone");

        expect_error(
            invoke(
                &minter_ctx(1, 1),
                AuctionMessage::CancelLiquidationOfSlice {
                    leaf: head.oldest,
                    permission: Permission(vec![]),
                },
                &mut state,
                &mut logger,
            ),
            CustomContractError::UnwarrantedCancellation,
            "cancelling an auctioned slice should fail",
        );

        invoke(
            &minter_ctx(1, 1),
            AuctionMessage::CancelLiquidationOfSlice {
                leaf: head.youngest,
                permission: Permission(vec![]),
            },
            &mut state,
            &mut logger,
        )
        .expect("cancelling the queued half should work");
        claim_eq!(state.queued_tez(), Tez::zero());
    }

    #[concordium_test]
    /// A 12 tez slice against a 10 tez lot size is split on lot start; both
    /// halves keep their burrow and round their minimum proceeds up.
    fn test_split_on_start() {
        let mut state = new_state();
        state
            .send_to_auction(contents(BURROW_1, 12, 10))
            .expect("send failed");
        let events = touch(&mut state, Ratio::new(1, 1), 0, 0);

        claim_eq!(state.current_auction_tez(), Some(Tez::from_tez(10)));
        claim_eq!(state.queued_tez(), Tez::from_tez(2));
        match &events[..] {
            [CustomEvent::AuctionStarted(event)] => {
                claim_eq!(event.start_value, Kit::from_kit(10));
                claim_eq!(event.lot_tez, Tez::from_tez(10));
            }
            other => fail!("unexpected events: {:?}", other),
        }

        let head = *state.burrow_slices.get(&BURROW_1).expect("head is gone");
        let auctioned = state.arena.read_leaf(head.oldest.0).value;
        let requeued = state.arena.read_leaf(head.youngest.0).value;
        claim_eq!(auctioned.contents.min_kit_for_unwarranted, Kit::from_micro_kit(8_333_334));
        claim_eq!(requeued.contents.min_kit_for_unwarranted, Kit::from_micro_kit(1_666_667));
        claim_eq!(auctioned.younger, Some(head.youngest));
        claim_eq!(requeued.older, Some(head.oldest));
    }

    #[concordium_test]
    /// The reserve price starts at the priced lot value and decays
    /// exponentially per second.
    fn test_descending_reserve_price_decays() {
        let mut state = new_state();
        state
            .send_to_auction(contents(BURROW_1, 10, 5))
            .expect("send failed");
        touch(&mut state, Ratio::new(10, 1), 0, 0);

        claim_eq!(state.current_minimum_bid(ts(0)), Ok(Kit::from_kit(100)));
        // 100 * (1 - 1/3600)^3600 is a shade under 36.79 kit
        let decayed = state.current_minimum_bid(ts(3600)).expect("no auction");
        claim!(decayed >= Kit::from_micro_kit(36_780_000));
        claim!(decayed <= Kit::from_micro_kit(36_790_000));
    }

    #[concordium_test]
    /// First bid ends the descending phase; later bids must beat the leader
    /// by the improvement factor.
    fn test_descend_then_ascend_bids() {
        let mut state = new_state();
        let mut logger = EventLog::new();
        state
            .send_to_auction(contents(BURROW_1, 10, 5))
            .expect("send failed");
        touch(&mut state, Ratio::new(10, 1), 0, 0);

        expect_error(
            invoke(
                &ctx_at(ALICE, 3600, 5),
                AuctionMessage::PlaceBid {
                    kit: Kit::from_kit(36),
                },
                &mut state,
                &mut logger,
            ),
            CustomContractError::BidTooLow,
            "bidding under the decayed reserve should fail",
        );

        let alice_ticket = place_bid(&mut state, ALICE, 40_000_000, 3600, 5);
        claim!(state.is_leading_bid(&alice_ticket));

        expect_error(
            invoke(
                &ctx_at(BOB, 3600, 5),
                AuctionMessage::PlaceBid {
                    kit: Kit::from_kit(39),
                },
                &mut state,
                &mut logger,
            ),
            CustomContractError::BidTooLow,
            "bidding under the minimum increment should fail",
        );
        claim_eq!(
            state.current_minimum_bid(ts(3600)),
            Ok(Kit::from_micro_kit(40_132_000))
        );

        let bob_ticket = place_bid(&mut state, BOB, 40_132_000, 3605, 6);
        claim!(state.is_leading_bid(&bob_ticket));
        claim!(!state.is_leading_bid(&alice_ticket));
    }

    #[concordium_test]
    fn test_bid_without_auction() {
        let mut state = new_state();
        let mut logger = EventLog::new();
        expect_error(
            invoke(
                &ctx_at(ALICE, 0, 0),
                AuctionMessage::PlaceBid {
                    kit: Kit::from_kit(1),
                },
                &mut state,
                &mut logger,
            ),
            CustomContractError::NoOpenAuction,
            "bidding with no open auction should fail",
        );
    }

    #[concordium_test]
    /// An ascending lot completes only once both the bid interval in
    /// seconds and the one in blocks have passed.
    fn test_completion_requires_both_intervals() {
        let mut state = new_state();
        state
            .send_to_auction(contents(BURROW_1, 10, 3))
            .expect("send failed");
        touch(&mut state, Ratio::new(10, 1), 0, 0);
        place_bid(&mut state, ALICE, 40_000_000, 3600, 5);

        // 1201 seconds but only 20 blocks: not yet
        let events = touch(&mut state, Ratio::new(10, 1), 4801, 25);
        claim!(events.is_empty());
        claim!(state.current.is_some());

        // one more block does it
        let events = touch(&mut state, Ratio::new(10, 1), 4801, 26);
        match &events[..] {
            [CustomEvent::AuctionCompleted(event)] => {
                claim_eq!(event.winner, ALICE);
                claim_eq!(event.kit, Kit::from_kit(40));
                claim_eq!(event.sold_tez, Tez::from_tez(10));
            }
            other => fail!("unexpected events: {:?}", other),
        }
        claim!(state.current.is_none());
        claim_eq!(state.completed_auction_count(), 1);
    }

    #[concordium_test]
    /// Draining a completed single slice lot repays the full winning bid
    /// when the liquidation was unwarranted.
    fn test_completion_and_drain() {
        let mut state = new_state();
        let mut logger = EventLog::new();
        state
            .send_to_auction(contents(BURROW_1, 10, 3))
            .expect("send failed");
        touch(&mut state, Ratio::new(10, 1), 0, 0);
        place_bid(&mut state, ALICE, 40_000_000, 3600, 5);
        touch(&mut state, Ratio::new(10, 1), 4801, 26);

        let effects = invoke(
            &minter_ctx(4802, 27),
            AuctionMessage::TouchOldestSlices { max: 5 },
            &mut state,
            &mut logger,
        )
        .expect("drain failed");
        claim_eq!(
            effects,
            vec![
                Effect::BurrowSendSlice {
                    burrow: BURROW_1,
                    tez: Tez::from_tez(10),
                },
                Effect::SettleLiquidationSlices {
                    minter: Address::Account(MINTER),
                    settlements: vec![SliceSettlement {
                        contents: contents(BURROW_1, 10, 3),
                        repay: Kit::from_kit(40),
                    }],
                    total_burn: Kit::zero(),
                },
            ]
        );
        claim!(state.completed.is_none());
        claim!(state.burrow_slices.is_empty());
    }

    #[concordium_test]
    /// The winner claims the collateral only after the lot is drained, and
    /// the lot tree is gone afterwards.
    fn test_winner_reclaim_lifecycle() {
        let mut state = new_state();
        let mut logger = EventLog::new();
        state
            .send_to_auction(contents(BURROW_1, 10, 3))
            .expect("send failed");
        touch(&mut state, Ratio::new(10, 1), 0, 0);
        let ticket = place_bid(&mut state, ALICE, 40_000_000, 3600, 5);
        touch(&mut state, Ratio::new(10, 1), 4801, 26);

        expect_error(
            invoke(
                &ctx_at(ALICE, 4802, 27),
                AuctionMessage::ReclaimWinningBid(ticket),
                &mut state,
                &mut logger,
            ),
            CustomContractError::NotAllSlicesClaimed,
            "claiming before the drain should fail",
        );

        invoke(
            &minter_ctx(4802, 27),
            AuctionMessage::TouchOldestSlices { max: 5 },
            &mut state,
            &mut logger,
        )
        .expect("drain failed");

        let effects = invoke(
            &ctx_at(ALICE, 4803, 28),
            AuctionMessage::ReclaimWinningBid(ticket),
            &mut state,
            &mut logger,
        )
        .expect("winner claim failed");
        claim_eq!(
            effects,
            vec![Effect::TransferTez {
                address: ALICE,
                tez: Tez::from_tez(10),
            }]
        );
        // only the queue root is left
        claim_eq!(state.arena.node_count(), 1);

        expect_error(
            invoke(
                &ctx_at(ALICE, 4804, 29),
                AuctionMessage::ReclaimWinningBid(ticket),
                &mut state,
                &mut logger,
            ),
            CustomContractError::NotAWinningBid,
            "claiming twice should fail",
        );
    }

    #[concordium_test]
    /// For any ticket at most one of the two reclaim paths ever succeeds.
    fn test_losing_and_winning_reclaim_exclusive() {
        let mut state = new_state();
        let mut logger = EventLog::new();
        state
            .send_to_auction(contents(BURROW_1, 10, 3))
            .expect("send failed");
        touch(&mut state, Ratio::new(10, 1), 0, 0);
        let alice_ticket = place_bid(&mut state, ALICE, 40_000_000, 3600, 5);
        let bob_ticket = place_bid(&mut state, BOB, 40_200_000, 3610, 6);

        let effects = invoke(
            &ctx_at(ALICE, 3620, 7),
            AuctionMessage::ReclaimBid(alice_ticket),
            &mut state,
            &mut logger,
        )
        .expect("losing reclaim failed");
        claim_eq!(
            effects,
            vec![Effect::TransferKit {
                bidder: ALICE,
                kit: Kit::from_kit(40),
            }]
        );

        expect_error(
            invoke(
                &ctx_at(BOB, 3620, 7),
                AuctionMessage::ReclaimBid(bob_ticket),
                &mut state,
                &mut logger,
            ),
            CustomContractError::CannotReclaimLeadingBid,
            "reclaiming the leading bid should fail",
        );

        touch(&mut state, Ratio::new(10, 1), 4811, 27);

        expect_error(
            invoke(
                &ctx_at(BOB, 4812, 28),
                AuctionMessage::ReclaimBid(bob_ticket),
                &mut state,
                &mut logger,
            ),
            CustomContractError::CannotReclaimWinningBid,
            "reclaiming a winning bid through the losing path should fail",
        );
        expect_error(
            invoke(
                &ctx_at(ALICE, 4812, 28),
                AuctionMessage::ReclaimWinningBid(alice_ticket),
                &mut state,
                &mut logger,
            ),
            CustomContractError::NotAWinningBid,
            "claiming with a losing ticket should fail",
        );
    }

    #[concordium_test]
    /// Tickets are not bearer instruments: a reclaim succeeds only for the
    /// account that placed the bid, and always pays that account.
    fn test_reclaim_pays_only_the_ticketed_bidder() {
        let mut state = new_state();
        let mut logger = EventLog::new();
        state
            .send_to_auction(contents(BURROW_1, 10, 3))
            .expect("send failed");
        touch(&mut state, Ratio::new(10, 1), 0, 0);
        let alice_ticket = place_bid(&mut state, ALICE, 40_000_000, 3600, 5);
        let bob_ticket = place_bid(&mut state, BOB, 40_200_000, 3610, 6);

        expect_error(
            invoke(
                &ctx_at(BOB, 3620, 7),
                AuctionMessage::ReclaimBid(alice_ticket),
                &mut state,
                &mut logger,
            ),
            CustomContractError::Unauthorized,
            "cashing someone else's losing ticket should fail",
        );

        touch(&mut state, Ratio::new(10, 1), 4811, 27);
        invoke(
            &minter_ctx(4812, 28),
            AuctionMessage::TouchOldestSlices { max: 5 },
            &mut state,
            &mut logger,
        )
        .expect("drain failed");

        expect_error(
            invoke(
                &ctx_at(ALICE, 4813, 29),
                AuctionMessage::ReclaimWinningBid(bob_ticket),
                &mut state,
                &mut logger,
            ),
            CustomContractError::Unauthorized,
            "claiming someone else's winnings should fail",
        );

        let effects = invoke(
            &ctx_at(BOB, 4813, 29),
            AuctionMessage::ReclaimWinningBid(bob_ticket),
            &mut state,
            &mut logger,
        )
        .expect("winner claim failed");
        claim_eq!(
            effects,
            vec![Effect::TransferTez {
                address: BOB,
                tez: Tez::from_tez(10),
            }]
        );

        let effects = invoke(
            &ctx_at(ALICE, 4814, 30),
            AuctionMessage::ReclaimBid(alice_ticket),
            &mut state,
            &mut logger,
        )
        .expect("losing reclaim failed");
        claim_eq!(
            effects,
            vec![Effect::TransferKit {
                bidder: ALICE,
                kit: Kit::from_kit(40),
            }]
        );
    }

    #[concordium_test]
    /// Proceeds under the slice minimum mark the liquidation as warranted:
    /// a tenth of the proceeds is burned.
    fn test_warranted_liquidation_burns_penalty() {
        let mut state = new_state();
        let mut logger = EventLog::new();
        state
            .send_to_auction(contents(BURROW_1, 10, 100))
            .expect("send failed");
        touch(&mut state, Ratio::new(10, 1), 0, 0);
        place_bid(&mut state, ALICE, 40_000_000, 3600, 5);
        touch(&mut state, Ratio::new(10, 1), 4801, 26);

        let effects = invoke(
            &minter_ctx(4802, 27),
            AuctionMessage::TouchOldestSlices { max: 5 },
            &mut state,
            &mut logger,
        )
        .expect("drain failed");
        claim_eq!(
            effects,
            vec![
                Effect::BurrowSendSlice {
                    burrow: BURROW_1,
                    tez: Tez::from_tez(10),
                },
                Effect::SettleLiquidationSlices {
                    minter: Address::Account(MINTER),
                    settlements: vec![SliceSettlement {
                        contents: contents(BURROW_1, 10, 100),
                        repay: Kit::from_kit(36),
                    }],
                    total_burn: Kit::from_kit(4),
                },
            ]
        );
    }

    #[concordium_test]
    /// The winning bid is apportioned over the drain so the per lot sum is
    /// exact: flooring residue lands on the last slice, and the effects
    /// come out in slice order.
    fn test_drain_apportions_the_exact_winning_bid() {
        let mut state = new_state();
        let mut logger = EventLog::new();
        let first = state.send_to_auction(contents(BURROW_1, 3, 0)).expect("send failed");
        let second = state.send_to_auction(contents(BURROW_2, 3, 0)).expect("send failed");
        let third = state.send_to_auction(contents(BURROW_1, 4, 0)).expect("send failed");
        touch(&mut state, Ratio::new(1, 1), 0, 0);
        claim_eq!(state.current_auction_tez(), Some(Tez::from_tez(10)));
        claim_eq!(state.burrow_slice_count(BURROW_1), 2);
        claim_eq!(state.burrow_slice_count(BURROW_2), 1);
        place_bid(&mut state, ALICE, 10_000_001, 3600, 5);
        touch(&mut state, Ratio::new(1, 1), 4801, 26);

        let effects = invoke(
            &minter_ctx(4802, 27),
            AuctionMessage::TouchSlices(vec![first, second, third]),
            &mut state,
            &mut logger,
        )
        .expect("drain failed");
        claim_eq!(
            effects,
            vec![
                Effect::BurrowSendSlice {
                    burrow: BURROW_1,
                    tez: Tez::from_tez(3),
                },
                Effect::BurrowSendSlice {
                    burrow: BURROW_2,
                    tez: Tez::from_tez(3),
                },
                Effect::BurrowSendSlice {
                    burrow: BURROW_1,
                    tez: Tez::from_tez(4),
                },
                Effect::SettleLiquidationSlices {
                    minter: Address::Account(MINTER),
                    settlements: vec![
                        SliceSettlement {
                            contents: contents(BURROW_1, 3, 0),
                            repay: Kit::from_micro_kit(3_000_000),
                        },
                        SliceSettlement {
                            contents: contents(BURROW_2, 3, 0),
                            repay: Kit::from_micro_kit(3_000_000),
                        },
                        SliceSettlement {
                            contents: contents(BURROW_1, 4, 0),
                            repay: Kit::from_micro_kit(4_000_001),
                        },
                    ],
                    total_burn: Kit::zero(),
                },
            ]
        );
        claim_eq!(state.burrow_slice_count(BURROW_1), 0);
        claim_eq!(state.burrow_slice_count(BURROW_2), 0);
    }

    #[concordium_test]
    fn test_touch_slices_batch_cap() {
        let mut state = new_state();
        let mut logger = EventLog::new();
        state.parameters.touch_batch_limit = 3;
        let dangling = LeafId(NodeId(999));
        expect_error(
            invoke(
                &minter_ctx(0, 0),
                AuctionMessage::TouchSlices(vec![dangling; 4]),
                &mut state,
                &mut logger,
            ),
            CustomContractError::TooManySlices,
            "over long touch lists should be rejected",
        );
    }

    #[concordium_test]
    fn test_touch_slices_rejects_non_completed() {
        let mut state = new_state();
        let mut logger = EventLog::new();
        let queued = state
            .send_to_auction(contents(BURROW_1, 5, 1))
            .expect("send failed");
        expect_error(
            invoke(
                &minter_ctx(0, 0),
                AuctionMessage::TouchSlices(vec![queued]),
                &mut state,
                &mut logger,
            ),
            CustomContractError::NotACompletedSlice,
            "touching a queued slice should fail",
        );

        let mut state = new_state();
        expect_error(
            invoke(
                &minter_ctx(0, 0),
                AuctionMessage::TouchSlices(vec![LeafId(NodeId(999))]),
                &mut state,
                &mut logger,
            ),
            CustomContractError::NotACompletedSlice,
            "touching a dangling slice id should fail",
        );
    }

    #[concordium_test]
    /// `TouchOldestSlices` processes at most the configured batch size per
    /// call, regardless of the requested maximum.
    fn test_touch_oldest_caps_at_parameter() {
        let mut state = new_state();
        let mut logger = EventLog::new();
        for _ in 0..7 {
            state
                .send_to_auction(contents(BURROW_1, 1, 0))
                .expect("send failed");
        }
        touch(&mut state, Ratio::new(1, 1), 0, 0);
        place_bid(&mut state, ALICE, 5_000_000, 3600, 5);
        touch(&mut state, Ratio::new(1, 1), 4801, 26);

        let effects = invoke(
            &minter_ctx(4802, 27),
            AuctionMessage::TouchOldestSlices { max: 50 },
            &mut state,
            &mut logger,
        )
        .expect("drain failed");
        // five collateral calls plus the settlement batch
        claim_eq!(effects.len(), 6);
        claim_eq!(state.completed_auction_count(), 1);

        let effects = invoke(
            &minter_ctx(4803, 28),
            AuctionMessage::TouchOldestSlices { max: 50 },
            &mut state,
            &mut logger,
        )
        .expect("drain failed");
        claim_eq!(effects.len(), 3);
        claim_eq!(state.completed_auction_count(), 0);
        claim!(state.completed.is_none());
    }

    #[concordium_test]
    /// Two lots complete one after the other; the drain consumes them
    /// oldest lot first.
    fn test_two_lots_drain_fifo() {
        let mut state = new_state();
        let mut logger = EventLog::new();
        state
            .send_to_auction(contents(BURROW_1, 10, 1))
            .expect("send failed");
        state
            .send_to_auction(contents(BURROW_2, 10, 1))
            .expect("send failed");

        touch(&mut state, Ratio::new(1, 1), 0, 0);
        place_bid(&mut state, ALICE, 10_000_000, 10, 1);
        let events = touch(&mut state, Ratio::new(1, 1), 1211, 22);
        claim_eq!(events.len(), 2); // completes the first lot, starts the second
        place_bid(&mut state, BOB, 10_000_000, 1211, 22);
        touch(&mut state, Ratio::new(1, 1), 2412, 43);
        claim_eq!(state.completed_auction_count(), 2);

        let effects = invoke(
            &minter_ctx(2413, 44),
            AuctionMessage::TouchOldestSlices { max: 1 },
            &mut state,
            &mut logger,
        )
        .expect("drain failed");
        claim_eq!(
            effects[0],
            Effect::BurrowSendSlice {
                burrow: BURROW_1,
                tez: Tez::from_tez(10),
            }
        );
        claim_eq!(state.completed_auction_count(), 1);

        let effects = invoke(
            &minter_ctx(2414, 45),
            AuctionMessage::TouchOldestSlices { max: 5 },
            &mut state,
            &mut logger,
        )
        .expect("drain failed");
        claim_eq!(
            effects[0],
            Effect::BurrowSendSlice {
                burrow: BURROW_2,
                tez: Tez::from_tez(10),
            }
        );
        claim_eq!(state.completed_auction_count(), 0);
    }

    #[concordium_test]
    /// The guard trips exactly while the burrow has an untouched slice in a
    /// completed lot.
    fn test_ensure_no_unclaimed_slices_guard() {
        let mut state = new_state();
        let mut logger = EventLog::new();
        let guard = AuctionMessage::EnsureNoUnclaimedSlices { burrow: BURROW_1 };

        state
            .send_to_auction(contents(BURROW_1, 5, 1))
            .expect("send failed");
        invoke(&minter_ctx(0, 0), guard.clone(), &mut state, &mut logger)
            .expect("queued slices are fine");

        touch(&mut state, Ratio::new(1, 1), 0, 0);
        invoke(&minter_ctx(1, 1), guard.clone(), &mut state, &mut logger)
            .expect("slices in the current lot are fine");

        place_bid(&mut state, ALICE, 2_000_000, 3600, 5);
        touch(&mut state, Ratio::new(1, 1), 4801, 26);
        expect_error(
            invoke(&minter_ctx(4802, 27), guard.clone(), &mut state, &mut logger),
            CustomContractError::BurrowHasCompletedLiquidation,
            "untouched completed slices should trip the guard",
        );

        invoke(
            &minter_ctx(4802, 27),
            AuctionMessage::TouchOldestSlices { max: 5 },
            &mut state,
            &mut logger,
        )
        .expect("drain failed");
        invoke(&minter_ctx(4803, 28), guard, &mut state, &mut logger)
            .expect("drained burrows are fine");
    }

    #[concordium_test]
    fn test_minter_only_entrypoints() {
        let mut state = new_state();
        let mut logger = EventLog::new();
        expect_error(
            invoke(
                &ctx_at(ALICE, 0, 0),
                AuctionMessage::SendSliceToAuction(contents(BURROW_1, 1, 1)),
                &mut state,
                &mut logger,
            ),
            CustomContractError::Unauthorized,
            "only the minter may queue slices",
        );
        expect_error(
            invoke(
                &ctx_at(ALICE, 0, 0),
                AuctionMessage::Touch {
                    price: Ratio::new(1, 1),
                },
                &mut state,
                &mut logger,
            ),
            CustomContractError::Unauthorized,
            "only the minter may touch",
        );
        expect_error(
            invoke(
                &ctx_at(ALICE, 0, 0),
                AuctionMessage::CancelLiquidationOfSlice {
                    leaf: LeafId(NodeId(0)),
                    permission: Permission(vec![]),
                },
                &mut state,
                &mut logger,
            ),
            CustomContractError::Unauthorized,
            "only the minter may cancel",
        );
        expect_error(
            invoke(
                &ctx_at(ALICE, 0, 0),
                AuctionMessage::EnsureNoUnclaimedSlices { burrow: BURROW_1 },
                &mut state,
                &mut logger,
            ),
            CustomContractError::Unauthorized,
            "only the minter may run the guard",
        );
        expect_error(
            invoke(
                &ctx_at(ALICE, 0, 0),
                AuctionMessage::TouchSlices(vec![LeafId(NodeId(0))]),
                &mut state,
                &mut logger,
            ),
            CustomContractError::Unauthorized,
            "only the minter may drain listed slices",
        );
        expect_error(
            invoke(
                &ctx_at(ALICE, 0, 0),
                AuctionMessage::TouchOldestSlices { max: 1 },
                &mut state,
                &mut logger,
            ),
            CustomContractError::Unauthorized,
            "only the minter may drain the oldest slices",
        );
    }

    #[concordium_test]
    fn test_attached_value_is_rejected() {
        let mut state = new_state();
        let mut logger = EventLog::new();
        let mut ctx = minter_ctx(0, 0);
        ctx.amount = Tez::from_micro_tez(1);
        expect_error(
            invoke(
                &ctx,
                AuctionMessage::Touch {
                    price: Ratio::new(1, 1),
                },
                &mut state,
                &mut logger,
            ),
            CustomContractError::UnwantedValueAttached,
            "no entrypoint is payable",
        );
    }

    #[concordium_test]
    fn test_contract_sender_cannot_bid() {
        let mut state = new_state();
        let mut logger = EventLog::new();
        let ctx = HostContext {
            now: ts(0),
            level: 0,
            sender: Address::Contract(ContractAddress {
                index: 9,
                subindex: 0,
            }),
            self_address: ContractAddress {
                index: 42,
                subindex: 0,
            },
            amount: Tez::zero(),
        };
        expect_error(
            invoke(
                &ctx,
                AuctionMessage::PlaceBid {
                    kit: Kit::from_kit(1),
                },
                &mut state,
                &mut logger,
            ),
            CustomContractError::OnlyAccountAddress,
            "contracts cannot bid",
        );
    }

    #[concordium_test]
    /// Touching with nothing due neither logs nor changes anything.
    fn test_touch_without_work_is_idempotent() {
        let mut state = new_state();
        claim!(touch(&mut state, Ratio::new(1, 1), 0, 0).is_empty());
        claim!(state.current.is_none());

        state
            .send_to_auction(contents(BURROW_1, 5, 1))
            .expect("send failed");
        let events = touch(&mut state, Ratio::new(1, 1), 1, 1);
        claim_eq!(events.len(), 1);
        let tree = state.current.expect("no auction started").tree;

        // a descending lot never completes on its own
        claim!(touch(&mut state, Ratio::new(1, 1), 100_000, 1000).is_empty());
        claim_eq!(state.current.expect("auction vanished").tree, tree);
    }
}
