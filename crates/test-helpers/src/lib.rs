// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod fixtures;
mod test_node;
mod utils;

pub use fixtures::*;
pub use test_node::*;
pub use utils::*;
