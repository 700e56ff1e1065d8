mod manager;
mod spawner;

pub use manager::{Assignment, CellPreview, ContentLifecycleManager, LoadEvent};
pub use spawner::{spawn_load, Instantiate, LoadTask};
