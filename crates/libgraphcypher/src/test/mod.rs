pub(crate) mod fixtures;
mod snapshot_tests;
