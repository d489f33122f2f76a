mod home;
pub mod observations;

pub use home::welcome_handler;
pub use observations::{precipitation, start_end_stats, start_stats, station, tobs};
