pub mod form_lock_handler;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
