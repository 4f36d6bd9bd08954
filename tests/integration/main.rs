//! CLI integration tests.

mod helpers;

mod cli_test;
mod probe_test;
