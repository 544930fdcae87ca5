pub mod node;
pub mod raw;

pub use node::*;
pub use raw::*;
