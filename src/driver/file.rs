use std::any::Any;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use serde::Deserialize;
use serde_yaml::Mapping;

use super::{DriverError, PrinterDriver};

fn default_devfile() -> PathBuf {
    PathBuf::from("/dev/usb/lp0")
}

fn default_auto_flush() -> bool {
    true
}

/// parameters accepted by the file driver
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileParams {
    /// device node or plain file to write to
    #[serde(default = "default_devfile")]
    pub devfile: PathBuf,
    /// flush after every write
    #[serde(default = "default_auto_flush")]
    pub auto_flush: bool,
}

/// driver that writes directly to a device node or file
pub struct File {
    params: FileParams,
    handle: Option<fs::File>,
}

impl File {
    pub fn from_params(params: Mapping) -> Result<Box<dyn PrinterDriver>, DriverError> {
        let params = super::parse_params::<FileParams>("File", params)?;

        Ok(Box::new(File {
            params,
            handle: None,
        }))
    }

    pub fn params(&self) -> &FileParams {
        &self.params
    }
}

impl PrinterDriver for File {
    fn kind(&self) -> &'static str {
        "File"
    }

    fn open(&mut self) -> Result<(), DriverError> {
        let handle = fs::OpenOptions::new()
            .write(true)
            .open(&self.params.devfile)?;

        log::debug!("opened printer device {}", self.params.devfile.display());
        self.handle = Some(handle);

        return Ok(());
    }

    fn write_raw(&mut self, data: &[u8]) -> Result<(), DriverError> {
        match self.handle {
            Some(ref mut handle) => {
                handle.write_all(data)?;
                if self.params.auto_flush {
                    handle.flush()?;
                }
                Ok(())
            }
            None => Err(DriverError::NotOpen),
        }
    }

    fn close(&mut self) -> Result<(), DriverError> {
        if let Some(mut handle) = self.handle.take() {
            handle.flush()?;
        }

        return Ok(());
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn devfile_defaults_to_usblp() {
        let driver = File::from_params(Mapping::new()).unwrap();
        let file = driver.as_any().downcast_ref::<File>().unwrap();

        assert_eq!(file.params().devfile, PathBuf::from("/dev/usb/lp0"));
        assert!(file.params().auto_flush);
    }

    #[test]
    fn open_missing_device_fails() {
        let mut params = Mapping::new();
        params.insert("devfile".into(), "/nonexistent/printer".into());

        let mut driver = File::from_params(params).unwrap();
        assert!(matches!(driver.open(), Err(DriverError::Io(_))));
    }
}
