pub use errors::*;

mod errors;
pub mod macros;
