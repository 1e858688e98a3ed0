//! Exit codes for the CLI

/// Success
#[allow(dead_code)]
pub const SUCCESS: i32 = 0;

/// General error (failed publish, transport failure, vendor rejection)
pub const ERROR: i32 = 1;
