//! CLI Exit Code Registry
//!
//! Single source of truth for `datalens` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                                   |
//! |------|-----------------------------------------------------------|
//! | 0    | Success, including "not applicable" results               |
//! | 2    | Usage error (bad arguments, unreadable settings file)     |
//! | 3    | Load error (missing file, unsupported type, malformed)    |
//! | 4    | Render error (chart backend failure)                      |
//! | 5    | Output error (cannot write result or chart file)          |
//!
//! A chart or statistic that does not apply to the data (unknown column,
//! nothing numeric) is a result, not an error: it exits 0.

/// Success - command completed. Unavailable results count as success.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments or settings. Also what clap exits with.
pub const EXIT_USAGE: u8 = 2;

/// The dataset could not be loaded. No analysis was run.
pub const EXIT_LOAD: u8 = 3;

/// A chart failed to render.
pub const EXIT_RENDER: u8 = 4;

/// Writing to stdout or the `--output` file failed.
pub const EXIT_OUTPUT: u8 = 5;
