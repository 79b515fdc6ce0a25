use std::any::Any;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use serde::Deserialize;
use serde_yaml::Mapping;

use super::{DriverError, PrinterDriver};

fn default_devfile() -> PathBuf {
    PathBuf::from("/dev/ttyS0")
}

fn default_baudrate() -> u32 {
    9600
}

fn default_bytesize() -> u8 {
    8
}

/// parameters accepted by the serial driver
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SerialParams {
    /// serial device node
    #[serde(default = "default_devfile")]
    pub devfile: PathBuf,
    /// expected line speed of the device
    #[serde(default = "default_baudrate")]
    pub baudrate: u32,
    /// data bits per character
    #[serde(default = "default_bytesize")]
    pub bytesize: u8,
    /// write timeout in seconds
    #[serde(default)]
    pub timeout: Option<f64>,
}

/// driver for printers attached to a serial port.
///
/// the tty is written to as-is; line speed and framing are expected to be
/// configured on the device beforehand (stty or udev rule).
pub struct Serial {
    params: SerialParams,
    handle: Option<fs::File>,
}

impl Serial {
    pub fn from_params(params: Mapping) -> Result<Box<dyn PrinterDriver>, DriverError> {
        let params = super::parse_params::<SerialParams>("Serial", params)?;

        Ok(Box::new(Serial {
            params,
            handle: None,
        }))
    }

    pub fn params(&self) -> &SerialParams {
        &self.params
    }
}

impl PrinterDriver for Serial {
    fn kind(&self) -> &'static str {
        "Serial"
    }

    fn open(&mut self) -> Result<(), DriverError> {
        let handle = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.params.devfile)?;

        log::debug!(
            "opened serial printer {} (expects {} baud)",
            self.params.devfile.display(),
            self.params.baudrate
        );
        self.handle = Some(handle);

        return Ok(());
    }

    fn write_raw(&mut self, data: &[u8]) -> Result<(), DriverError> {
        match self.handle {
            Some(ref mut handle) => {
                handle.write_all(data)?;
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
    fn defaults_match_common_wiring() {
        let driver = Serial::from_params(Mapping::new()).unwrap();
        let serial = driver.as_any().downcast_ref::<Serial>().unwrap();

        assert_eq!(serial.params().devfile, PathBuf::from("/dev/ttyS0"));
        assert_eq!(serial.params().baudrate, 9600);
        assert_eq!(serial.params().bytesize, 8);
    }

    #[test]
    fn overrides_are_applied() {
        let mut params = Mapping::new();
        params.insert("devfile".into(), "/dev/ttyUSB3".into());
        params.insert("baudrate".into(), 115200.into());

        let driver = Serial::from_params(params).unwrap();
        let serial = driver.as_any().downcast_ref::<Serial>().unwrap();

        assert_eq!(serial.params().devfile, PathBuf::from("/dev/ttyUSB3"));
        assert_eq!(serial.params().baudrate, 115200);
    }
}
