pub mod output;
pub mod parser;
pub mod types;

pub use output::*;
pub use parser::*;
pub use types::*;
