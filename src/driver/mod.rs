mod dummy;
mod file;
mod network;
mod serial;
mod usb;

pub use dummy::Dummy;
pub use file::{File, FileParams};
pub use network::{Network, NetworkParams};
pub use serial::{Serial, SerialParams};
pub use usb::{Usb, UsbParams};

use std::any::Any;
use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};

/// errors raised by driver constructors and device I/O
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// the forwarded parameters do not match the driver's constructor
    #[error("invalid parameters for {driver} driver: {source}")]
    Params {
        driver: &'static str,
        #[source]
        source: serde_yaml::Error,
    },
    /// no driver with this name in the registry
    #[error("printer type \"{0}\" is not registered")]
    Unknown(String),
    /// device I/O attempted before open()
    #[error("printer device is not open")]
    NotOpen,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// a printer endpoint that accepts raw bytes
pub trait PrinterDriver: Send {
    /// registry name of the driver variant
    fn kind(&self) -> &'static str;

    /// acquire the underlying device
    fn open(&mut self) -> Result<(), DriverError>;

    /// send raw bytes to the device
    fn write_raw(&mut self, data: &[u8]) -> Result<(), DriverError>;

    /// flush and release the device
    fn close(&mut self) -> Result<(), DriverError>;

    /// downcast support for callers that need the concrete driver
    fn as_any(&self) -> &dyn Any;
}

/// driver constructor, receives the parameter mapping from the config file
pub type Factory = fn(Mapping) -> Result<Box<dyn PrinterDriver>, DriverError>;

lazy_static::lazy_static! {
    /// driver constructors keyed by title-cased type name
    static ref REGISTRY: HashMap<&'static str, Factory> = {
        let mut m: HashMap<&'static str, Factory> = HashMap::new();
        m.insert("Network", Network::from_params as Factory);
        m.insert("Serial", Serial::from_params as Factory);
        m.insert("Usb", Usb::from_params as Factory);
        m.insert("File", File::from_params as Factory);
        m.insert("Dummy", Dummy::from_params as Factory);
        m
    };
}

/// whether a driver with this name exists in the registry
pub fn is_registered(name: &str) -> bool {
    REGISTRY.contains_key(name)
}

/// construct a driver by registry name
pub fn construct(name: &str, params: Mapping) -> Result<Box<dyn PrinterDriver>, DriverError> {
    match REGISTRY.get(name) {
        Some(factory) => factory(params),
        None => Err(DriverError::Unknown(name.to_string())),
    }
}

/// deserialize the forwarded mapping into a driver's typed params.
///
/// unknown keys are rejected, the same way an unexpected named argument
/// would be rejected by a constructor.
fn parse_params<T: DeserializeOwned>(
    driver: &'static str,
    params: Mapping,
) -> Result<T, DriverError> {
    serde_yaml::from_value(Value::Mapping(params))
        .map_err(|source| DriverError::Params { driver, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_knows_all_variants() {
        for name in ["Network", "Serial", "Usb", "File", "Dummy"] {
            assert!(is_registered(name), "{} missing from registry", name);
        }
        assert!(!is_registered("network"));
        assert!(!is_registered("Quantum"));
    }

    #[test]
    fn construct_unknown_name_is_typed_error() {
        let re = construct("Quantum", Mapping::new());
        assert!(matches!(re, Err(DriverError::Unknown(name)) if name == "Quantum"));
    }

    #[test]
    fn construct_rejects_unknown_parameter() {
        let mut params = Mapping::new();
        params.insert("speed".into(), 9600.into());

        let re = construct("Dummy", params);
        assert!(matches!(re, Err(DriverError::Params { driver: "Dummy", .. })));
    }
}
