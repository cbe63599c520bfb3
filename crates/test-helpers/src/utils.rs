// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use tracing::subscriber::DefaultGuard;
use tracing_subscriber::{fmt, EnvFilter};

/// Route logs to the test writer for the lifetime of the returned guard
pub fn trace_to_test_writer(filter: &str) -> DefaultGuard {
    let subscriber = fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_test_writer()
        .finish();
    tracing::subscriber::set_default(subscriber)
}
