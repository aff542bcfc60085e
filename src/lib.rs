pub mod config;
pub mod document;
pub mod error;
pub mod escape;
pub mod file;
pub mod line_ending;
pub mod options;
pub mod parser;
pub mod serializer;
pub mod store;
pub mod traits;
pub mod value;

pub use config::Config;
pub use document::{Document, Entry, Line, LineContent, LineKind};
pub use error::ConfigError;
pub use line_ending::LineEnding;
pub use options::Options;
pub use store::{Store, Values};
pub use traits::ConfigSource;
pub use value::{FromConfigValue, ToConfigValue};
