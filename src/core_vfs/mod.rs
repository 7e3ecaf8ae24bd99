// The synthetic filesystem served to clients
pub mod generator;
pub mod node;
pub mod path;

pub use node::{FsNode, Vfs};
