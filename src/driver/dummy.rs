use std::any::Any;

use serde::Deserialize;
use serde_yaml::Mapping;

use super::{DriverError, PrinterDriver};

/// the dummy driver takes no parameters
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DummyParams {}

/// driver that collects output in memory, for tests and dry runs
#[derive(Default)]
pub struct Dummy {
    buf: Vec<u8>,
}

impl Dummy {
    pub fn from_params(params: Mapping) -> Result<Box<dyn PrinterDriver>, DriverError> {
        let DummyParams {} = super::parse_params("Dummy", params)?;

        Ok(Box::new(Dummy::default()))
    }

    /// everything written so far
    pub fn output(&self) -> &[u8] {
        &self.buf
    }

    /// discard collected output
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

impl PrinterDriver for Dummy {
    fn kind(&self) -> &'static str {
        "Dummy"
    }

    fn open(&mut self) -> Result<(), DriverError> {
        Ok(())
    }

    fn write_raw(&mut self, data: &[u8]) -> Result<(), DriverError> {
        self.buf.extend_from_slice(data);
        Ok(())
    }

    fn close(&mut self) -> Result<(), DriverError> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_written_bytes() {
        let mut dummy = Dummy::default();

        dummy.open().unwrap();
        dummy.write_raw(b"TOTAL ").unwrap();
        dummy.write_raw(b"12.50\n").unwrap();
        dummy.close().unwrap();

        assert_eq!(dummy.output(), b"TOTAL 12.50\n");

        dummy.clear();
        assert!(dummy.output().is_empty());
    }

    #[test]
    fn rejects_any_parameter() {
        let mut params = Mapping::new();
        params.insert("host".into(), "10.0.0.7".into());

        let re = Dummy::from_params(params);
        assert!(matches!(
            re,
            Err(DriverError::Params { driver: "Dummy", .. })
        ));
    }
}
