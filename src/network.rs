//! Network URL constants for the partner API.

/// Default REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.mch.weixin.qq.com";

/// Backup API domain, for callers that fail over manually.
pub const BACKUP_API_URL: &str = "https://api2.mch.weixin.qq.com";
