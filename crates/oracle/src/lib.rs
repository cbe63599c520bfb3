// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod client;
mod local;
mod proof;
mod repo;
mod signer_file;
mod verifier;

pub use client::*;
pub use local::*;
pub use proof::*;
pub use repo::*;
pub use signer_file::*;
pub use verifier::*;
