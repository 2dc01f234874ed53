// Verification constants (no magic values in services)
use std::time::Duration;

/// Pause after issuing a disruptive command before polling starts (2s)
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Fixed wait for a full boot cycle after reboot (3 minutes)
pub const DEFAULT_BOOT_DELAY: Duration = Duration::from_secs(180);

/// Bounded-retry window after a soft network reset (15s)
pub const DEFAULT_RESET_POLL_TIMEOUT: Duration = Duration::from_secs(15);

/// Spacing between reachability probes while polling (3s)
pub const DEFAULT_RESET_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Lower bound on the polling interval so the loop always yields
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

pub const DEFAULT_REBOOT_COMMAND: &str = "reboot &";
pub const DEFAULT_RESET_COMMAND: &str = "/etc/init.d/network reload &";
pub const DEFAULT_LOG_COMMAND: &str = "show monitor logs devicelog all";

/// Device log section header (matched case-insensitively, whitespace-trimmed)
pub const DEFAULT_LOG_HEADER: &str = "Device Log";

/// Recovery marker expected in the log window after a clean reinit
pub const DEFAULT_SUCCESS_MARKER: &str = "Device Init, Success";

/// Lines skipped after the header line: the header itself plus a separator.
/// Assumes a single fixed-width separator line; other log layouts will shift
/// the window.
pub const DEFAULT_WINDOW_OFFSET: usize = 2;

/// Lines of log text kept after the offset
pub const DEFAULT_WINDOW_LENGTH: usize = 3;
