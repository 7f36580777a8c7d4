//! Standard exit codes (BSD sysexits.h compatible)

/// Data format error (malformed tree expression)
pub const DATAERR: i32 = 65;

/// Internal software error
pub const SOFTWARE: i32 = 70;

/// Configuration error
pub const CONFIG: i32 = 78;
