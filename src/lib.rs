//! receipt printer configuration and driver selection
//!
//! reads a yaml config file describing a receipt/label printer, validates
//! the declared type against the driver registry and lazily constructs a
//! single cached driver instance with the remaining keys as parameters.

mod config;
pub mod driver;

pub use config::{Config, ConfigError};
pub use driver::{DriverError, PrinterDriver};
