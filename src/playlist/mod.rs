pub mod orchestrator;
pub mod report;

pub use orchestrator::{PlaylistMaker, truncate_description};
pub use report::{ArtistOutcome, ArtistReport, RunReport};
