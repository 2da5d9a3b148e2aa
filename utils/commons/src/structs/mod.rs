use super::*;

pub use self::{kit::*, ratio::*, tez::*};

mod kit;
mod ratio;
mod tez;
