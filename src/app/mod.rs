//! Binary-local orchestration: context setup, command dispatch, exit codes.

pub(crate) mod entry;
