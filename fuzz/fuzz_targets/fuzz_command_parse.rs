//! Fuzz target: `parse_command`
//!
//! Feeds arbitrary broker frames to the command decoder and asserts it is
//! total: any input yields Ok(Some), Ok(None), or a typed error — never a
//! panic — and a recognized command always produces a non-empty directive.
//!
//! cargo fuzz run fuzz_command_parse

#![no_main]

use agrinode::node::commands::parse_command;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(Some(cmd)) = parse_command(data, 30.0) {
        assert!(
            !cmd.to_directive().is_empty(),
            "a recognized command must carry a directive"
        );
    }
});
