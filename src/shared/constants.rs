/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Maximum accepted upload size for artifact files (bytes)
pub const MAX_UPLOAD_SIZE: usize = 50 * 1024 * 1024; // 50MB
