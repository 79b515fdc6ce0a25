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

/// parameters accepted by the usb driver
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UsbParams {
    /// usb vendor id of the printer
    pub vendor_id: u16,
    /// usb product id of the printer
    pub product_id: u16,
    /// usblp device node the kernel bound the printer to
    #[serde(default = "default_devfile")]
    pub devfile: PathBuf,
}

/// driver for usb printers, writing through the kernel usblp node
pub struct Usb {
    params: UsbParams,
    handle: Option<fs::File>,
}

impl Usb {
    pub fn from_params(params: Mapping) -> Result<Box<dyn PrinterDriver>, DriverError> {
        let params = super::parse_params::<UsbParams>("Usb", params)?;

        Ok(Box::new(Usb {
            params,
            handle: None,
        }))
    }

    pub fn params(&self) -> &UsbParams {
        &self.params
    }
}

impl PrinterDriver for Usb {
    fn kind(&self) -> &'static str {
        "Usb"
    }

    fn open(&mut self) -> Result<(), DriverError> {
        let handle = fs::OpenOptions::new()
            .write(true)
            .open(&self.params.devfile)?;

        log::debug!(
            "opened usb printer {:04x}:{:04x} at {}",
            self.params.vendor_id,
            self.params.product_id,
            self.params.devfile.display()
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
    fn vendor_and_product_ids_are_required() {
        let re = Usb::from_params(Mapping::new());
        assert!(matches!(re, Err(DriverError::Params { driver: "Usb", .. })));
    }

    #[test]
    fn hex_ids_from_yaml() {
        // yaml integers may be written in hex in config files
        let mut params = Mapping::new();
        params.insert("vendor_id".into(), 0x04b8.into());
        params.insert("product_id".into(), 0x0202.into());

        let driver = Usb::from_params(params).unwrap();
        let usb = driver.as_any().downcast_ref::<Usb>().unwrap();

        assert_eq!(usb.params().vendor_id, 0x04b8);
        assert_eq!(usb.params().product_id, 0x0202);
        assert_eq!(usb.params().devfile, PathBuf::from("/dev/usb/lp0"));
    }
}
