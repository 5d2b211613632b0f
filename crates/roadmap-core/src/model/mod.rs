pub mod record;

pub use record::{ParseStatusError, RoadmapRecord, Status};
