//! Capture a picture and save it as a JPEG file
//!
//! Configured with `CAMERA_*` environment variables:
//!
//! ```text
//! CAMERA_PORT=/dev/ttyUSB0 CAMERA_RESOLUTION=640x480 CAMERA_OUTPUT=snap.jpg \
//!     cargo run --example capture
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use linkcam::{Camera, CameraConfig, ErrorKind};
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let config = CameraConfig::from_env().context("invalid CAMERA_* setting")?;

    let default_level = if config.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let mut camera = Camera::from_config(&config)
        .with_context(|| format!("failed to open {}", config.port))?;

    let banner = camera.reset().context("camera did not finish its reset")?;
    if config.verbose {
        println!("{}", banner.trim_end());
    }

    if config.transfer_baud_rate != config.baud_rate {
        camera
            .negotiate_baud(config.transfer_baud_rate)
            .context("failed to switch line speed")?;
    }

    if let Some(resolution) = config.resolution {
        camera
            .set_resolution(resolution)
            .context("failed to set resolution")?;
    }

    if let Some(ratio) = config.compression {
        match camera.set_compression(ratio) {
            Err(e) if e.kind() == ErrorKind::UnsupportedParameter => {
                warn!("Compression ratio {} ignored: {}", ratio, e);
            }
            result => result.context("failed to set compression ratio")?,
        }
    }

    let secs = config.countdown.as_secs();
    for remaining in (1..=secs).rev() {
        println!("{}...", remaining);
        thread::sleep(Duration::from_secs(1));
    }

    camera.capture().context("capture failed")?;

    let file = File::create(&config.output)
        .with_context(|| format!("failed to create {}", config.output.display()))?;
    let mut sink = BufWriter::new(file);

    let stats = camera
        .read_image_with_progress(&mut sink, |progress| {
            print!("\r{}", progress);
            let _ = io::stdout().flush();
        })
        .context("image transfer failed")?;
    println!();

    if !stats.is_clean() {
        warn!("Transfer finished with frame noise: {}", stats);
    }
    println!("Saved {} bytes to {}", stats.bytes, config.output.display());

    // Leave the camera at the speed the next run expects
    if config.transfer_baud_rate != config.baud_rate {
        camera
            .negotiate_baud(config.baud_rate)
            .context("failed to restore line speed")?;
    }

    Ok(())
}
