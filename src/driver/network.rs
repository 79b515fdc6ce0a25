use std::any::Any;
use std::io::Write;
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use serde::Deserialize;
use serde_yaml::Mapping;

use super::{DriverError, PrinterDriver};

fn default_port() -> u16 {
    9100
}

/// parameters accepted by the network driver
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkParams {
    /// hostname or address of the printer
    pub host: String,
    /// jetdirect-style raw socket port
    #[serde(default = "default_port")]
    pub port: u16,
    /// connect timeout in seconds
    #[serde(default)]
    pub timeout: Option<f64>,
}

/// driver for printers listening on a raw tcp socket
pub struct Network {
    params: NetworkParams,
    stream: Option<TcpStream>,
}

impl Network {
    pub fn from_params(params: Mapping) -> Result<Box<dyn PrinterDriver>, DriverError> {
        let params = super::parse_params::<NetworkParams>("Network", params)?;

        Ok(Box::new(Network {
            params,
            stream: None,
        }))
    }

    pub fn params(&self) -> &NetworkParams {
        &self.params
    }
}

impl PrinterDriver for Network {
    fn kind(&self) -> &'static str {
        "Network"
    }

    fn open(&mut self) -> Result<(), DriverError> {
        let addr = (self.params.host.as_str(), self.params.port);

        let stream = match self.params.timeout {
            Some(secs) => {
                // connect_timeout needs a resolved address
                let addr = addr.to_socket_addrs()?.next().ok_or_else(|| {
                    DriverError::Io(std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        format!("no address found for host {}", self.params.host),
                    ))
                })?;
                TcpStream::connect_timeout(&addr, Duration::from_secs_f64(secs))?
            }
            None => TcpStream::connect(addr)?,
        };

        log::debug!(
            "connected to printer at {}:{}",
            self.params.host,
            self.params.port
        );
        self.stream = Some(stream);

        return Ok(());
    }

    fn write_raw(&mut self, data: &[u8]) -> Result<(), DriverError> {
        match self.stream {
            Some(ref mut stream) => {
                stream.write_all(data)?;
                Ok(())
            }
            None => Err(DriverError::NotOpen),
        }
    }

    fn close(&mut self) -> Result<(), DriverError> {
        if let Some(stream) = self.stream.take() {
            stream.shutdown(Shutdown::Both)?;
        }

        return Ok(());
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
