use super::*;

use crate::arena::{Arena, Node};
use crate::avl::{self, End, LeafId, TreeId};
use crate::external::{BidTicket, Parameters};

/// What the minter sends to the auction house: a chunk of collateral from a
/// liquidated burrow, together with the kit proceeds above which the
/// liquidation would have been unnecessary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SchemaType)]
pub struct SliceContents {
    pub burrow: BurrowAddress,
    pub tez: Tez,
    pub min_kit_for_unwarranted: Kit,
}

/// A queued or auctioned slice, linked to the rest of its burrow's slices.
/// `older` and `younger` only ever point at slices of the same burrow, and
/// the links are kept mutually consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slice {
    pub contents: SliceContents,
    pub older: Option<LeafId>,
    pub younger: Option<LeafId>,
}

/// Endpoints of one burrow's slice chain. Present iff the burrow has at
/// least one live slice anywhere in the auction house.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BurrowSlices {
    pub oldest: LeafId,
    pub youngest: LeafId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SchemaType)]
pub struct Bid {
    pub address: AccountAddress,
    pub kit: Kit,
}

/// Bidding state of the current lot. The descending reserve decays until
/// the first bid; from then on the lot is an ascending English auction and
/// the phase never goes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuctionPhase {
    Descending {
        start_value: Kit,
        start_time: Timestamp,
    },
    Ascending {
        leading: Bid,
        bid_time: Timestamp,
        bid_level: BlockHeight,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurrentAuction {
    pub tree: TreeId,
    pub phase: AuctionPhase,
}

/// Root data of a completed lot. `younger_auction` and `older_auction`
/// chain the completed lots in completion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AuctionOutcome {
    pub winning_bid: Bid,
    pub sold_tez: Tez,
    pub younger_auction: Option<TreeId>,
    pub older_auction: Option<TreeId>,
}

/// Endpoints of the completed lot chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompletedAuctions {
    pub youngest: TreeId,
    pub oldest: TreeId,
}

/// Settlement of one touched slice, forwarded to the minter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SchemaType)]
pub struct SliceSettlement {
    pub contents: SliceContents,
    pub repay: Kit,
}

/// The full auction house state, a single owned value passed through every
/// entrypoint.
#[derive(Debug, Clone, Serialize)]
pub struct State {
    pub arena: Arena,
    pub queued: TreeId,
    pub current: Option<CurrentAuction>,
    pub completed: Option<CompletedAuctions>,
    pub burrow_slices: BTreeMap<BurrowAddress, BurrowSlices>,
    pub parameters: Parameters,
    pub minter: Address,
}

impl State {
    pub fn new(parameters: Parameters, minter: Address) -> Self {
        let mut arena = Arena::new();
        let queued = avl::mk_empty(&mut arena, None);
        State {
            arena,
            queued,
            current: None,
            completed: None,
            burrow_slices: BTreeMap::new(),
            parameters,
            minter,
        }
    }

    /// Append a fresh slice to the queue as the youngest of its burrow.
    pub fn send_to_auction(&mut self, contents: SliceContents) -> ContractResult<LeafId> {
        ensure!(
            avl::height(&self.arena, self.queued) < self.parameters.max_queue_height,
            CustomContractError::QueueTooLong
        );
        let head = self.burrow_slices.get(&contents.burrow).copied();
        let slice = Slice {
            contents,
            older: head.map(|head| head.youngest),
            younger: None,
        };
        let leaf = avl::push(&mut self.arena, self.queued, slice, End::Back);
        match head {
            Some(mut head) => {
                avl::update_leaf(&mut self.arena, head.youngest, |mut value| {
                    value.younger = Some(leaf);
                    value
                });
                head.youngest = leaf;
                self.burrow_slices.insert(contents.burrow, head);
            }
            None => {
                self.burrow_slices.insert(
                    contents.burrow,
                    BurrowSlices {
                        oldest: leaf,
                        youngest: leaf,
                    },
                );
            }
        }
        Ok(leaf)
    }

    /// Remove a leaf from whichever tree holds it and splice it out of its
    /// burrow chain. Returns the slice and the tree it was removed from.
    fn pop_slice(&mut self, leaf: LeafId) -> (Slice, TreeId) {
        let slice = self.arena.read_leaf(leaf.0).value;
        let root = avl::del(&mut self.arena, leaf);
        let burrow = slice.contents.burrow;
        match (slice.older, slice.younger) {
            (None, None) => {
                self.burrow_slices.remove(&burrow);
            }
            (Some(older), None) => {
                avl::update_leaf(&mut self.arena, older, |mut value| {
                    value.younger = None;
                    value
                });
                let mut head = self.burrow_slices.get(&burrow).copied().unwrap_abort();
                head.youngest = older;
                self.burrow_slices.insert(burrow, head);
            }
            (None, Some(younger)) => {
                avl::update_leaf(&mut self.arena, younger, |mut value| {
                    value.older = None;
                    value
                });
                let mut head = self.burrow_slices.get(&burrow).copied().unwrap_abort();
                head.oldest = younger;
                self.burrow_slices.insert(burrow, head);
            }
            (Some(older), Some(younger)) => {
                avl::update_leaf(&mut self.arena, older, |mut value| {
                    value.younger = Some(younger);
                    value
                });
                avl::update_leaf(&mut self.arena, younger, |mut value| {
                    value.older = Some(older);
                    value
                });
            }
        }
        (slice, root)
    }

    /// Cancel a liquidation while the slice is still queued. The state is
    /// untouched when the slice already moved on.
    pub fn cancel_slice(&mut self, leaf: LeafId) -> ContractResult<SliceContents> {
        let is_queued = matches!(self.arena.try_read(leaf.0), Some(Node::Leaf(_)))
            && avl::find_root(&self.arena, leaf) == self.queued;
        ensure!(is_queued, CustomContractError::UnwarrantedCancellation);
        let (slice, _) = self.pop_slice(leaf);
        Ok(slice.contents)
    }

    /// Close the current lot if its ascending phase has been quiet for long
    /// enough in both wall time and blocks.
    pub fn complete_auction_if_possible(
        &mut self,
        now: Timestamp,
        level: BlockHeight,
    ) -> Option<(TreeId, Bid, Tez)> {
        let auction = self.current?;
        let (leading, bid_time, bid_level) = match auction.phase {
            AuctionPhase::Descending { .. } => return None,
            AuctionPhase::Ascending {
                leading,
                bid_time,
                bid_level,
            } => (leading, bid_time, bid_level),
        };
        let quiet_secs =
            now.timestamp_millis().saturating_sub(bid_time.timestamp_millis()) / 1000;
        if quiet_secs <= self.parameters.bid_interval_secs
            || level.saturating_sub(bid_level) <= self.parameters.bid_interval_blocks
        {
            return None;
        }
        let sold_tez = avl::weight(&self.arena, auction.tree);
        let older_auction = self.completed.map(|completed| completed.youngest);
        avl::write_root_data(
            &mut self.arena,
            auction.tree,
            Some(AuctionOutcome {
                winning_bid: leading,
                sold_tez,
                younger_auction: None,
                older_auction,
            }),
        );
        match self.completed {
            Some(mut completed) => {
                let mut previous =
                    avl::root_data(&self.arena, completed.youngest).unwrap_abort();
                previous.younger_auction = Some(auction.tree);
                avl::write_root_data(&mut self.arena, completed.youngest, Some(previous));
                completed.youngest = auction.tree;
                self.completed = Some(completed);
            }
            None => {
                self.completed = Some(CompletedAuctions {
                    youngest: auction.tree,
                    oldest: auction.tree,
                });
            }
        }
        self.current = None;
        Some((auction.tree, leading, sold_tez))
    }

    /// Start a new lot from the front of the queue if none is running.
    pub fn start_auction_if_possible(
        &mut self,
        now: Timestamp,
        price: Ratio,
    ) -> Option<(TreeId, Kit)> {
        if self.current.is_some() {
            return None;
        }
        let queued_tez = avl::weight(&self.arena, self.queued);
        if queued_tez == Tez::zero() {
            return None;
        }
        let split_threshold = self
            .parameters
            .max_lot_size
            .max(queued_tez.ratio_floor(self.parameters.min_lot_queue_fraction));
        let tree = self.take_with_splitting(split_threshold);
        let start_value = Kit::of_tez_ceil(avl::weight(&self.arena, tree), price);
        self.current = Some(CurrentAuction {
            tree,
            phase: AuctionPhase::Descending {
                start_value,
                start_time: now,
            },
        });
        Some((tree, start_value))
    }

    /// Move a prefix of the queue into a fresh lot. When the prefix of
    /// whole slices falls short of the threshold, the next slice is split:
    /// the older part fills the lot and the younger part goes back to the
    /// front of the queue, both re-linked in place of the original.
    fn take_with_splitting(&mut self, threshold: Tez) -> TreeId {
        let new_tree = avl::take(&mut self.arena, self.queued, threshold, None);
        let taken = avl::weight(&self.arena, new_tree);
        if taken >= threshold {
            return new_tree;
        }
        let needed = threshold - taken;
        let (leaf, slice) = match avl::peek_front(&self.arena, self.queued) {
            Some(front) => front,
            None => return new_tree,
        };
        avl::del(&mut self.arena, leaf);
        let (auctioned, requeued) = split_slice_contents(slice.contents, needed);
        let auctioned_leaf = avl::push(
            &mut self.arena,
            new_tree,
            Slice {
                contents: auctioned,
                older: slice.older,
                younger: None,
            },
            End::Back,
        );
        let requeued_leaf = avl::push(
            &mut self.arena,
            self.queued,
            Slice {
                contents: requeued,
                older: Some(auctioned_leaf),
                younger: slice.younger,
            },
            End::Front,
        );
        avl::update_leaf(&mut self.arena, auctioned_leaf, |mut value| {
            value.younger = Some(requeued_leaf);
            value
        });
        if let Some(older) = slice.older {
            avl::update_leaf(&mut self.arena, older, |mut value| {
                value.younger = Some(auctioned_leaf);
                value
            });
        }
        if let Some(younger) = slice.younger {
            avl::update_leaf(&mut self.arena, younger, |mut value| {
                value.older = Some(requeued_leaf);
                value
            });
        }
        let burrow = slice.contents.burrow;
        let mut head = self.burrow_slices.get(&burrow).copied().unwrap_abort();
        if head.oldest == leaf {
            head.oldest = auctioned_leaf;
        }
        if head.youngest == leaf {
            head.youngest = requeued_leaf;
        }
        self.burrow_slices.insert(burrow, head);
        new_tree
    }

    /// Minimum acceptable bid on the current lot.
    pub fn current_minimum_bid(&self, now: Timestamp) -> ContractResult<Kit> {
        let auction = self
            .current
            .as_ref()
            .ok_or(CustomContractError::NoOpenAuction)?;
        Ok(match auction.phase {
            AuctionPhase::Descending {
                start_value,
                start_time,
            } => {
                let elapsed_secs = now
                    .timestamp_millis()
                    .saturating_sub(start_time.timestamp_millis())
                    / 1000;
                let factor = Fixed::complement_ceil(self.parameters.auction_decay_rate)
                    .pow_ceil(elapsed_secs);
                start_value.fixed_ceil(factor)
            }
            AuctionPhase::Ascending { leading, .. } => {
                leading.kit + leading.kit.ratio_ceil(self.parameters.bid_improvement_factor)
            }
        })
    }

    /// Record a bid, switching the lot to (or keeping it in) the ascending
    /// phase. Returns the ticket the bidder reclaims the bid with.
    pub fn place_bid(
        &mut self,
        bidder: AccountAddress,
        kit: Kit,
        now: Timestamp,
        level: BlockHeight,
    ) -> ContractResult<BidTicket> {
        let minimum = self.current_minimum_bid(now)?;
        ensure!(kit >= minimum, CustomContractError::BidTooLow);
        let auction = self.current.as_mut().unwrap_abort();
        let bid = Bid {
            address: bidder,
            kit,
        };
        auction.phase = AuctionPhase::Ascending {
            leading: bid,
            bid_time: now,
            bid_level: level,
        };
        Ok(BidTicket {
            auction: auction.tree,
            bid,
        })
    }

    pub fn is_leading_bid(&self, ticket: &BidTicket) -> bool {
        match self.current {
            Some(CurrentAuction {
                tree,
                phase: AuctionPhase::Ascending { leading, .. },
            }) => tree == ticket.auction && leading == ticket.bid,
            _ => false,
        }
    }

    fn completed_outcome(&self, tree: TreeId) -> Option<AuctionOutcome> {
        match self.arena.try_read(tree.0) {
            Some(Node::Root(root)) => root.data,
            _ => None,
        }
    }

    /// Release the kit of a bid that did not win.
    pub fn reclaim_losing_bid(&self, ticket: &BidTicket) -> ContractResult<Kit> {
        ensure!(
            !self.is_leading_bid(ticket),
            CustomContractError::CannotReclaimLeadingBid
        );
        if let Some(outcome) = self.completed_outcome(ticket.auction) {
            ensure!(
                outcome.winning_bid != ticket.bid,
                CustomContractError::CannotReclaimWinningBid
            );
        }
        Ok(ticket.bid.kit)
    }

    /// Hand the winner the collateral of a fully drained lot and deallocate
    /// the lot tree.
    pub fn reclaim_winning_bid(&mut self, ticket: &BidTicket) -> ContractResult<Tez> {
        let outcome = self
            .completed_outcome(ticket.auction)
            .ok_or(CustomContractError::NotAWinningBid)?;
        ensure!(
            outcome.winning_bid == ticket.bid,
            CustomContractError::NotAWinningBid
        );
        ensure!(
            avl::is_empty(&self.arena, ticket.auction),
            CustomContractError::NotAllSlicesClaimed
        );
        avl::delete_empty_tree(&mut self.arena, ticket.auction);
        Ok(outcome.sold_tez)
    }

    /// Drain one slice of a completed lot, returning its settlement and the
    /// burned penalty. The kit of the winning bid is apportioned over the
    /// drain order so that the per-lot sum is exact despite flooring.
    pub fn touch_completed_slice(
        &mut self,
        leaf: LeafId,
    ) -> ContractResult<(SliceSettlement, Kit)> {
        ensure!(
            matches!(self.arena.try_read(leaf.0), Some(Node::Leaf(_))),
            CustomContractError::NotACompletedSlice
        );
        let root = avl::find_root(&self.arena, leaf);
        let outcome = avl::root_data(&self.arena, root)
            .ok_or(CustomContractError::NotACompletedSlice)?;
        let weight_before = avl::weight(&self.arena, root);
        let (slice, _) = self.pop_slice(leaf);
        let drained_before = outcome.sold_tez - weight_before;
        let drained_after = drained_before + slice.contents.tez;
        let corresponding_kit = outcome
            .winning_bid
            .kit
            .scale_floor(drained_after, outcome.sold_tez)
            - outcome
                .winning_bid
                .kit
                .scale_floor(drained_before, outcome.sold_tez);
        let penalty = if corresponding_kit < slice.contents.min_kit_for_unwarranted {
            corresponding_kit.ratio_ceil(self.parameters.liquidation_penalty)
        } else {
            Kit::zero()
        };
        if avl::is_empty(&self.arena, root) {
            self.pop_completed_auction(root);
        }
        Ok((
            SliceSettlement {
                contents: slice.contents,
                repay: corresponding_kit - penalty,
            },
            penalty,
        ))
    }

    /// Unlink a fully drained lot from the completed chain. The outcome
    /// stays attached to the empty tree until the winner reclaims it.
    fn pop_completed_auction(&mut self, tree: TreeId) {
        let mut completed = self.completed.unwrap_abort();
        let mut outcome = avl::root_data(&self.arena, tree).unwrap_abort();
        if let Some(older) = outcome.older_auction {
            let mut neighbour = avl::root_data(&self.arena, older).unwrap_abort();
            neighbour.younger_auction = outcome.younger_auction;
            avl::write_root_data(&mut self.arena, older, Some(neighbour));
        }
        if let Some(younger) = outcome.younger_auction {
            let mut neighbour = avl::root_data(&self.arena, younger).unwrap_abort();
            neighbour.older_auction = outcome.older_auction;
            avl::write_root_data(&mut self.arena, younger, Some(neighbour));
        }
        match (outcome.older_auction, outcome.younger_auction) {
            (None, None) => self.completed = None,
            (Some(older), None) => {
                completed.youngest = older;
                self.completed = Some(completed);
            }
            (None, Some(younger)) => {
                completed.oldest = younger;
                self.completed = Some(completed);
            }
            (Some(_), Some(_)) => {}
        }
        outcome.older_auction = None;
        outcome.younger_auction = None;
        avl::write_root_data(&mut self.arena, tree, Some(outcome));
    }

    /// Globally oldest undrained slice of any completed lot. Lots complete
    /// in queue order, so the front of the oldest completed lot is it.
    pub fn oldest_completed_slice(&self) -> Option<LeafId> {
        let completed = self.completed?;
        avl::peek_front(&self.arena, completed.oldest).map(|(leaf, _)| leaf)
    }

    /// Guard used by the minter before burrow operations: trips while the
    /// burrow still has slices sitting in completed lots. Lots consume the
    /// queue oldest first, so only the oldest slice has to be inspected.
    pub fn ensure_burrow_has_no_unclaimed_slices(
        &self,
        burrow: BurrowAddress,
    ) -> ContractResult<()> {
        if let Some(head) = self.burrow_slices.get(&burrow) {
            let root = avl::find_root(&self.arena, head.oldest);
            ensure!(
                avl::root_data(&self.arena, root).is_none(),
                CustomContractError::BurrowHasCompletedLiquidation
            );
        }
        Ok(())
    }

    pub fn queued_tez(&self) -> Tez {
        avl::weight(&self.arena, self.queued)
    }

    pub fn current_auction_tez(&self) -> Option<Tez> {
        self.current
            .map(|auction| avl::weight(&self.arena, auction.tree))
    }

    pub fn completed_auction_count(&self) -> u64 {
        let mut count = 0;
        let mut cursor = self.completed.map(|completed| completed.oldest);
        while let Some(tree) = cursor {
            count += 1;
            cursor = avl::root_data(&self.arena, tree)
                .unwrap_abort()
                .younger_auction;
        }
        count
    }

    /// Number of live slices of a burrow, walking its chain oldest to
    /// youngest.
    pub fn burrow_slice_count(&self, burrow: BurrowAddress) -> u64 {
        let mut count = 0;
        let mut cursor = self
            .burrow_slices
            .get(&burrow)
            .map(|head| head.oldest);
        while let Some(leaf) = cursor {
            count += 1;
            cursor = self.arena.read_leaf(leaf.0).value.younger;
        }
        count
    }
}

/// Split slice contents at `amount` tez. Both halves round their minimum
/// proceeds up, so together they never demand less than the original.
fn split_slice_contents(
    contents: SliceContents,
    amount: Tez,
) -> (SliceContents, SliceContents) {
    let remainder = contents.tez - amount;
    (
        SliceContents {
            burrow: contents.burrow,
            tez: amount,
            min_kit_for_unwarranted: contents
                .min_kit_for_unwarranted
                .scale_ceil(amount, contents.tez),
        },
        SliceContents {
            burrow: contents.burrow,
            tez: remainder,
            min_kit_for_unwarranted: contents
                .min_kit_for_unwarranted
                .scale_ceil(remainder, contents.tez),
        },
    )
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use crate::external::test_parameters;

    const MINTER: AccountAddress = AccountAddress([0u8; 32]);
    const BURROW_1: AccountAddress = AccountAddress([1u8; 32]);
    const BURROW_2: AccountAddress = AccountAddress([2u8; 32]);

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

    /// Walk a burrow chain oldest to youngest and check both link
    /// directions against each other.
    fn audit_chain(state: &State, burrow: AccountAddress) -> Vec<LeafId> {
        let mut leaves = Vec::new();
        let head = match state.burrow_slices.get(&burrow) {
            Some(head) => *head,
            None => return leaves,
        };
        let mut cursor = Some(head.oldest);
        let mut previous = None;
        while let Some(leaf) = cursor {
            let slice = state.arena.read_leaf(leaf.0).value;
            claim_eq!(slice.contents.burrow, burrow);
            claim_eq!(slice.older, previous);
            leaves.push(leaf);
            previous = Some(leaf);
            cursor = slice.younger;
        }
        claim_eq!(head.youngest, *leaves.last().expect("chain is empty"));
        leaves
    }

    #[concordium_test]
    fn test_send_links_slices_per_burrow() {
        let mut state = new_state();
        state.send_to_auction(contents(BURROW_1, 1, 1)).expect("send failed");
        state.send_to_auction(contents(BURROW_2, 2, 1)).expect("send failed");
        state.send_to_auction(contents(BURROW_1, 3, 1)).expect("send failed");
        state.send_to_auction(contents(BURROW_1, 4, 1)).expect("send failed");
        claim_eq!(audit_chain(&state, BURROW_1).len(), 3);
        claim_eq!(audit_chain(&state, BURROW_2).len(), 1);
        claim_eq!(state.queued_tez(), Tez::from_tez(10));
    }

    #[concordium_test]
    fn test_pop_slice_link_fixups() {
        let mut state = new_state();
        let first = state.send_to_auction(contents(BURROW_1, 1, 1)).expect("send failed");
        let second = state.send_to_auction(contents(BURROW_1, 2, 1)).expect("send failed");
        let third = state.send_to_auction(contents(BURROW_1, 3, 1)).expect("send failed");

        // middle: both neighbours re-linked, head untouched
        state.pop_slice(second);
        claim_eq!(audit_chain(&state, BURROW_1), [first, third]);

        // oldest: head moves forward
        state.pop_slice(first);
        claim_eq!(audit_chain(&state, BURROW_1), [third]);

        // last one: head entry disappears
        state.pop_slice(third);
        claim!(state.burrow_slices.get(&BURROW_1).is_none());
    }

    #[concordium_test]
    fn test_pop_youngest_slice_moves_head_back() {
        let mut state = new_state();
        let first = state.send_to_auction(contents(BURROW_1, 1, 1)).expect("send failed");
        let second = state.send_to_auction(contents(BURROW_1, 2, 1)).expect("send failed");
        state.pop_slice(second);
        claim_eq!(audit_chain(&state, BURROW_1), [first]);
        claim_eq!(
            state.burrow_slices.get(&BURROW_1).expect("head is gone").youngest,
            first
        );
    }

    #[concordium_test]
    fn test_split_rounds_min_kit_up_on_both_halves() {
        let original = contents(BURROW_1, 12, 10);
        let (left, right) = split_slice_contents(original, Tez::from_tez(10));
        claim_eq!(left.tez, Tez::from_tez(10));
        claim_eq!(right.tez, Tez::from_tez(2));
        claim_eq!(left.min_kit_for_unwarranted, Kit::from_micro_kit(8_333_334));
        claim_eq!(right.min_kit_for_unwarranted, Kit::from_micro_kit(1_666_667));
        claim!(
            left.min_kit_for_unwarranted + right.min_kit_for_unwarranted
                >= original.min_kit_for_unwarranted
        );
    }

    #[concordium_test]
    fn test_queue_height_limit() {
        let mut state = new_state();
        state.parameters.max_queue_height = 3;
        claim!(state.send_to_auction(contents(BURROW_1, 1, 1)).is_ok());
        claim!(state.send_to_auction(contents(BURROW_1, 1, 1)).is_ok());
        claim!(state.send_to_auction(contents(BURROW_1, 1, 1)).is_ok());
        claim_eq!(
            state.send_to_auction(contents(BURROW_1, 1, 1)),
            Err(CustomContractError::QueueTooLong)
        );
    }

    #[concordium_test]
    fn test_take_with_splitting_relinks_the_chain() {
        let mut state = new_state();
        state.send_to_auction(contents(BURROW_1, 4, 4)).expect("send failed");
        state.send_to_auction(contents(BURROW_1, 12, 12)).expect("send failed");
        state.send_to_auction(contents(BURROW_1, 5, 5)).expect("send failed");

        // 4 whole tez fit; 6 of the 12 are split off, 6 go back
        let lot = state.take_with_splitting(Tez::from_tez(10));
        claim_eq!(avl::weight(&state.arena, lot), Tez::from_tez(10));
        claim_eq!(state.queued_tez(), Tez::from_tez(11));

        let chain = audit_chain(&state, BURROW_1);
        claim_eq!(chain.len(), 4);
        let in_lot = chain
            .iter()
            .filter(|leaf| avl::find_root(&state.arena, **leaf) == lot)
            .count();
        claim_eq!(in_lot, 2);
    }
}
