mod camera;
mod component;
mod config;
mod error;
mod marker;
mod neighbors;
mod normalize;
mod render;
mod scene;
mod scheduler;
mod selection;
mod shell;
mod state;
mod types;

pub use config::VisualizerConfig;
pub use error::ThoughtError;
pub use shell::ThoughtCloud;
pub use types::{ThoughtRecord, parse_thoughts};
