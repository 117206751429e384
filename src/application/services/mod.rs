pub mod editor;
pub mod save;
pub mod store;

pub use editor::ListEditor;
pub use save::{SaveCoordinator, SaveState};
pub use store::TreeStore;
