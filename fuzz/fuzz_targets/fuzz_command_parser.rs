//! Fuzz target: `Command::parse_bytes`
//!
//! Arbitrary characteristic writes must parse or fail cleanly, and every
//! parsed download or upload must carry the filename it was given.
//!
//! cargo fuzz run fuzz_command_parser

#![no_main]

use gattfs::app::commands::Command;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(cmd) = Command::parse_bytes(data) {
        if let Some(name) = cmd.filename() {
            let text = std::str::from_utf8(data).expect("parsed input is UTF-8");
            assert!(text.contains(name), "filename not taken from input");
        }
    }
});
