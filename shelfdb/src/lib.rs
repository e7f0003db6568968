pub mod config;
pub mod document;
pub mod error;
pub mod locks;
pub mod logger;
pub mod path;
pub mod store;

pub use config::{Consistency, Format, Options};
pub use error::{CodecError, Result, ShelfError};
pub use logger::{ConsoleLogger, FacadeLogger, Logger, NullLogger};
pub use store::Store;
