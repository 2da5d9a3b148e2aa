//! It exposes all common structs and types of the liquidation auction house.
#![cfg_attr(not(feature = "std"), no_std)]
pub use crate::{constants::*, errors::*, structs::*, types::*};
use concordium_std::*;

mod constants;
mod errors;
mod structs;
mod types;
