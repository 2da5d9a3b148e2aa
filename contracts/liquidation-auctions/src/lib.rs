//! # Implementation of a collateral liquidation auction house
//!
//! Undercollateralized positions (burrows) are chopped by the minter into
//! slices of collateral and sent here to be sold for kit in batched lots.
//! Slices wait in a FIFO queue; a touch moves a prefix of the queue into a
//! new lot, splitting the slice on the boundary when needed. Each lot is
//! sold in a descending phase, where the reserve price decays until the
//! first bid, followed by an ascending English phase with a minimum
//! relative increment. Once an ascending lot has seen neither a bid nor a
//! block for long enough, the next touch completes it; the slices of a
//! completed lot are then touched one by one, returning the proceeds to
//! their burrows, and the winner claims the collateral once the lot is
//! fully drained.
//!
//! The whole auction house is a deterministic state transition: the host
//! ledger passes a message together with the context of the invocation and
//! receives a list of effect descriptors to interpret. Every queued,
//! current and completed collection of slices lives in one AVL tree arena,
//! so a slice can be cancelled, moved and settled in logarithmic time
//! while staying linked to its burrow.
#![cfg_attr(not(feature = "std"), no_std)]
use commons::*;
use concordium_std::{collections::BTreeMap, *};

pub mod arena;
pub mod avl;
pub mod contract;
pub mod events;
pub mod external;
pub mod state;
