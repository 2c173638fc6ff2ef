pub mod record;

pub use record::{timestamp_format, CheckRecord, CheckStatus};
