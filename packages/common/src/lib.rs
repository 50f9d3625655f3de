pub mod search;
pub mod validate;
pub mod visitor;

pub use search::*;
pub use validate::*;
pub use visitor::*;
