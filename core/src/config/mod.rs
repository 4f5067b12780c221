mod load;
mod merge;
mod paths;
mod types;

pub use load::{load, CONFIG_FILE};
pub use merge::{effective_tools, EffectiveToolSet};
pub use paths::expand_sources;
pub use types::{AppConfig, ToolOverride};
