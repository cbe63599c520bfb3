// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use core::fmt;

/// Hex formatter for byte blobs. Ciphertexts are large so long values are elided.
pub fn hexf(data: &[u8], f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", truncate(hex_string(data)))
}

pub fn hex_string(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Keep short hex strings intact and summarise the rest as `<bytes(n):0xhead..tail>`
pub fn truncate(s: String) -> String {
    let threshold = 100;
    let limit = 50;
    let cutoff = limit / 2;
    if s.len() <= threshold {
        return format!("0x{}", s);
    }
    let start = &s[..cutoff];
    let end = &s[s.len() - (limit - cutoff)..];
    format!("<bytes({}):0x{}..{}>", s.len() / 2, start, end)
}
