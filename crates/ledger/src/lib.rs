// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod accumulator;
mod batch;
mod clock;
mod decryption;
mod error;
mod guard;
mod ledger;
mod messages;
mod ports;
mod repo;
mod state;

pub use accumulator::*;
pub use batch::*;
pub use clock::*;
pub use decryption::*;
pub use error::*;
pub use guard::*;
pub use ledger::*;
pub use messages::*;
pub use ports::*;
pub use repo::*;
pub use state::*;
