//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                          |
//! |------|--------------------------------------------------|
//! | 0    | Success                                          |
//! | 1    | General error (e.g. unknown history step)        |
//! | 2    | Usage error (bad index, session already exists)  |
//! | 3    | Cell draft rejected by the draft grammar         |
//! | 4    | Session file unreadable, malformed or too new    |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments the parser could not catch.
pub const EXIT_USAGE: u8 = 2;

/// The cell text is not a decimal or fraction in progress.
/// The session file is left untouched.
pub const EXIT_DRAFT_REJECTED: u8 = 3;

/// Reading, parsing or writing the session file failed.
pub const EXIT_SESSION_FILE: u8 = 4;
