pub mod entry;
pub mod hook;
pub mod message;

pub use entry::LedgerEntry;
pub use hook::HookJson;
pub use message::{MessageUsage, TranscriptLine, UsageRecord};
