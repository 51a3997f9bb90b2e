// SPDX-License-Identifier: PMPL-1.0
#![no_main]

use libfuzzer_sys::fuzz_target;

use paperglass::extract::{parse_amount, parse_date};

// The free-text parsers must be total: any input reduces to a number or
// None, never a panic.
fuzz_target!(|data: &str| {
    let _ = parse_amount(data);
    let _ = parse_date(data);
});
