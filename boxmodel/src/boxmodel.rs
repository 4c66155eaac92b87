mod api;
mod build;
mod compress;
mod cursor;
mod types;

pub use api::BoxModel;
pub use compress::{Compressor, CompressorStats};
pub use cursor::Cursor;
pub use types::{Counts, Node, Slot, Tag};
