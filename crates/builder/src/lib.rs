// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod ledger_node;
mod ledger_node_builder;

pub use ledger_node::*;
pub use ledger_node_builder::*;
