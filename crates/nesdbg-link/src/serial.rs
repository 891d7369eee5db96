//! Serial transport for the FPGA board's UART.

use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::{debug, info};

use crate::{config::LinkConfig, error::LinkError, link::Link};

/// Open `path` as 8N1 without flow control, using the link's baud rate and
/// read timeout. Stale bytes in both directions are discarded.
pub fn open(path: &str, config: &LinkConfig) -> Result<Box<dyn SerialPort>, LinkError> {
    let port = serialport::new(path, config.baud_rate)
        .timeout(config.read_timeout)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .open()?;

    port.clear(ClearBuffer::All)?;
    info!("Opened {} at {} baud", path, config.baud_rate);
    Ok(port)
}

/// Open `path` and wrap it in a [`Link`].
pub fn connect(path: &str, config: LinkConfig) -> Result<Link<Box<dyn SerialPort>>, LinkError> {
    let port = open(path, &config)?;
    Ok(Link::with_config(port, config))
}

/// Names of the serial ports present on this machine.
pub fn available_ports() -> Result<Vec<String>, LinkError> {
    let ports = serialport::available_ports()?;
    debug!(count = ports.len(), "enumerated serial ports");
    Ok(ports.into_iter().map(|p| p.port_name).collect())
}
