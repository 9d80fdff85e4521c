pub mod orchestrator;
pub mod report;

pub use orchestrator::PlaylistSync;
pub use report::{FailedTrack, PlaylistStatus, SyncReport, print_summary};
