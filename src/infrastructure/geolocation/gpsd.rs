//! gpsd-backed position source.
//!
//! Speaks the gpsd JSON protocol over TCP: enable a watch with `?WATCH`,
//! then read newline-delimited report objects until a usable `TPV` fix
//! arrives.

use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::domain::{CaptureOptions, GeolocationError, Position, PositionSource};

/// Command enabling JSON watch reports on the gpsd socket.
const WATCH_COMMAND: &[u8] = b"?WATCH={\"enable\":true,\"json\":true};\n";

/// Fix modes from TPV reports (0/1 = no fix, 2 = 2D, 3 = 3D).
const MODE_2D: u8 = 2;
const MODE_3D: u8 = 3;

/// gpsd report, as far as this client cares.
#[derive(Debug, Deserialize)]
struct GpsdReport {
    class: String,
    #[serde(default)]
    mode: u8,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

impl GpsdReport {
    /// Extract the position if this report is a usable fix.
    fn fix(&self, required_mode: u8) -> Option<Position> {
        if self.class != "TPV" || self.mode < required_mode {
            return None;
        }
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Position::new(lat, lon)),
            _ => None,
        }
    }
}

/// Position source backed by a local gpsd daemon.
pub struct GpsdSource {
    addr: String,
}

impl GpsdSource {
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }

    /// Wait for the first usable fix on a fresh watch.
    ///
    /// A new watch is opened per capture, so a fix cached from an earlier
    /// request is never served. High accuracy requires a 3D fix; otherwise
    /// a 2D fix is accepted.
    async fn fresh_fix(&self, options: &CaptureOptions) -> Result<Position, GeolocationError> {
        let stream = TcpStream::connect(&self.addr)
            .await
            .map_err(|_| GeolocationError::Unavailable(self.addr.clone()))?;
        let (reader, mut writer) = stream.into_split();
        writer.write_all(WATCH_COMMAND).await?;

        let required_mode = if options.high_accuracy { MODE_3D } else { MODE_2D };
        let mut lines = BufReader::new(reader).lines();
        while let Some(line) = lines.next_line().await? {
            let report: GpsdReport = match serde_json::from_str(&line) {
                Ok(report) => report,
                Err(error) => {
                    tracing::trace!(error = %error, "Skipping unparseable gpsd line");
                    continue;
                }
            };

            if let Some(position) = report.fix(required_mode) {
                return Ok(position);
            }
        }

        // Watch stream ended without a usable fix.
        Err(GeolocationError::NoFix)
    }
}

#[async_trait]
impl PositionSource for GpsdSource {
    async fn current_position(
        &self,
        options: &CaptureOptions,
    ) -> Result<Position, GeolocationError> {
        match timeout(options.timeout, self.fresh_fix(options)).await {
            Ok(result) => result,
            Err(_) => Err(GeolocationError::Timeout(options.timeout)),
        }
    }
}
