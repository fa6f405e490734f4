pub mod bulk_edit;
pub mod data_model;
pub mod debounce;
pub mod error;
pub mod events;
pub mod grid_state;
pub mod navigation;
pub mod row_store;
pub mod selection;
pub mod virtual_window;
pub mod visibility;

pub use error::LoadError;
pub use grid_state::GridState;
