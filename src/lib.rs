pub mod boundary;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod palette;
pub mod parser;
pub mod raster;
pub mod release;
pub mod ui;

pub use domain::MapData;
pub use error::{MapError, Result};
pub use parser::RoborockMapParser;
