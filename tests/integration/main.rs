//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters or a temporary directory.

mod client_tests;
mod gatt_tests;
mod mock_store;
mod stream_tests;
