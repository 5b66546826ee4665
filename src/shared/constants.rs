/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Version tag written into every persisted collection
pub const PERSISTED_FORMAT_VERSION: u32 = 1;

// =============================================================================
// CUSTOM REPORT DEFAULTS
// =============================================================================

pub const CUSTOM_REPORT_LABEL: &str = "Custom Problem";
pub const CUSTOM_REPORT_ICON: &str = "exclamationmark.triangle.fill";
pub const CUSTOM_REPORT_COLOR: &str = "gray";
pub const CUSTOM_REPORT_SEVERITY: u8 = 1;
