pub mod error;
pub mod reader;

pub use error::ParseError;
pub use reader::read_dataset;
