pub mod error;
pub mod value;

pub use error::{ProxyError, Result};
pub use value::{DataType, Identifier, Value, describe_identifier};
