pub mod event;
pub mod save_to_file;

use super::{Detector, Real};
pub use event::EventFilter;
pub use save_to_file::SaveToFileFilter;
