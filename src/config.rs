use std::io::Read;
use std::path::{Path, PathBuf};

use convert_case::{Case, Casing};
use serde_yaml::{Mapping, Value};

use crate::driver;
use crate::driver::{DriverError, PrinterDriver};

/// directory name under the platform user config dir
const APP_NAME: &str = "tillprint";
/// config file name inside the app directory
const CONFIG_FILE: &str = "config.yaml";

/// errors raised while loading a printer config
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// the config file is missing or unreadable
    #[error("couldn't read config at {}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// the file contents are not well formed yaml
    #[error("error parsing yaml")]
    Syntax(#[source] serde_yaml::Error),
    /// the printer section is not a mapping with a string "type" key
    #[error("\"printer\" section must be a mapping with a \"type\" key")]
    BadPrinterSection,
    /// the declared type is empty or not in the driver registry
    #[error("printer type \"{0}\" is invalid")]
    InvalidPrinterType(String),
    /// printer() was called but no printer section was ever loaded
    #[error("no printer is configured")]
    NoPrinterConfigured,
    /// construction errors from the driver pass through unchanged
    #[error(transparent)]
    Driver(#[from] DriverError),
}

/// loads a printer config and hands out the printer defined in it.
///
/// the driver instance is constructed on first access and cached for the
/// lifetime of the loader.
#[derive(Default)]
pub struct Config {
    has_loaded: bool,
    printer_name: Option<String>,
    printer_params: Option<Mapping>,
    printer: Option<Box<dyn PrinterDriver>>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// default config location, `<user-config-dir>/tillprint/config.yaml`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_default()
            .join(APP_NAME)
            .join(CONFIG_FILE)
    }

    /// load the config from the default platform location
    pub fn load(&mut self) -> Result<(), ConfigError> {
        self.load_path(Self::default_path())
    }

    /// load the config from a file path
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        log::debug!("loading printer config from {}", path.display());

        // read fully and release the file before parsing
        let bytes = std::fs::read(path).map_err(|source| ConfigError::NotFound {
            path: path.to_path_buf(),
            source,
        })?;

        self.load_bytes(&bytes)
    }

    /// load the config from an already open readable handle
    pub fn load_reader<R: Read>(&mut self, mut reader: R) -> Result<(), ConfigError> {
        let mut bytes = Vec::new();

        reader
            .read_to_end(&mut bytes)
            .map_err(|source| ConfigError::NotFound {
                path: PathBuf::from("<reader>"),
                source,
            })?;

        self.load_bytes(&bytes)
    }

    /// parse and validate raw config contents
    pub(crate) fn load_bytes(&mut self, bytes: &[u8]) -> Result<(), ConfigError> {
        let doc: Value = serde_yaml::from_slice(bytes).map_err(ConfigError::Syntax)?;

        // a read or parse failure above leaves prior state intact; from here
        // on the loader is reset so a failed validation never keeps stale
        // fields or a stale cached instance
        self.has_loaded = false;
        self.printer_name = None;
        self.printer_params = None;
        self.printer = None;

        if let Some(printer) = doc.get("printer") {
            let mut params = match printer.as_mapping() {
                Some(m) => m.clone(),
                None => return Err(ConfigError::BadPrinterSection),
            };

            let ty = match params.remove("type") {
                Some(Value::String(s)) => s,
                Some(_) | None => return Err(ConfigError::BadPrinterSection),
            };

            // user configs say "network", the registry says "Network"
            let name = ty.to_case(Case::Title);

            if name.is_empty() || !driver::is_registered(&name) {
                return Err(ConfigError::InvalidPrinterType(name));
            }

            self.printer_name = Some(name);
            self.printer_params = Some(params);
        } else {
            log::warn!("config has no printer section");
        }

        self.has_loaded = true;

        return Ok(());
    }

    /// whether a config has been loaded
    pub fn has_loaded(&self) -> bool {
        self.has_loaded
    }

    /// title-cased name of the configured printer type
    pub fn printer_name(&self) -> Option<&str> {
        self.printer_name.as_deref()
    }

    /// parameters forwarded to the driver constructor, without the type key
    pub fn printer_params(&self) -> Option<&Mapping> {
        self.printer_params.as_ref()
    }

    /// the printer defined in the config.
    ///
    /// loads the default config first if none has been loaded. the driver
    /// is constructed once and the cached instance returned afterwards; a
    /// failed construction leaves the cache empty so the next call retries.
    pub fn printer(&mut self) -> Result<&mut dyn PrinterDriver, ConfigError> {
        if !self.has_loaded {
            self.load()?;
        }

        if let Some(ref mut printer) = self.printer {
            return Ok(printer.as_mut());
        }

        let name = self
            .printer_name
            .as_deref()
            .ok_or(ConfigError::NoPrinterConfigured)?;
        let params = self.printer_params.clone().unwrap_or_default();

        log::debug!("constructing {} printer driver", name);

        // driver constructor errors are passed through, not reclassified
        let instance = driver::construct(name, params)?;

        return Ok(self.printer.insert(instance).as_mut());
    }
}
