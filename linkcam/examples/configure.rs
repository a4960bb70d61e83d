//! Interactive camera settings
//!
//! Resets the camera on `CAMERA_PORT` at `CAMERA_BAUD`, then changes the
//! resolution or line speed from a menu.

use std::io::{self, BufRead, Write};

use anyhow::Context;
use linkcam::{BaudRate, Camera, CameraConfig, Resolution, SerialTransport};
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
    println!("{}", banner.trim_end());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        println!();
        println!("Line speed: {} baud", camera.line_speed());
        println!("  1) Set resolution");
        println!("  2) Set baud rate");
        println!("  q) Quit");

        let Some(choice) = prompt(&mut lines, "> ")? else {
            break;
        };

        match choice.as_str() {
            "1" => change_resolution(&mut camera, &mut lines)?,
            "2" => change_baud_rate(&mut camera, &mut lines)?,
            "q" | "Q" => break,
            other => println!("Unknown choice '{}'", other),
        }
    }

    println!(
        "Camera left at {} baud, use CAMERA_BAUD={} next time",
        camera.line_speed(),
        camera.line_speed()
    );
    Ok(())
}

fn change_resolution<L>(camera: &mut Camera<SerialTransport>, lines: &mut L) -> anyhow::Result<()>
where
    L: Iterator<Item = io::Result<String>>,
{
    let options: Vec<String> = Resolution::ALL.iter().map(ToString::to_string).collect();
    let Some(answer) = prompt(lines, &format!("Resolution ({}): ", options.join(", ")))? else {
        return Ok(());
    };

    match answer.parse::<Resolution>() {
        Ok(resolution) => {
            camera
                .set_resolution(resolution)
                .context("failed to set resolution")?;
            println!("Resolution set to {}", resolution);
        }
        Err(e) => println!("{}", e),
    }
    Ok(())
}

fn change_baud_rate<L>(camera: &mut Camera<SerialTransport>, lines: &mut L) -> anyhow::Result<()>
where
    L: Iterator<Item = io::Result<String>>,
{
    let options: Vec<String> = BaudRate::ALL.iter().map(ToString::to_string).collect();
    let Some(answer) = prompt(lines, &format!("Baud rate ({}): ", options.join(", ")))? else {
        return Ok(());
    };

    match answer.parse::<BaudRate>() {
        Ok(rate) => {
            camera
                .negotiate_baud(rate)
                .context("failed to switch line speed")?;
            println!("Line speed switched to {}", rate);
        }
        Err(e) => println!("{}", e),
    }
    Ok(())
}

/// Print `text` and read one trimmed line; `None` on end of input
fn prompt<L>(lines: &mut L, text: &str) -> anyhow::Result<Option<String>>
where
    L: Iterator<Item = io::Result<String>>,
{
    print!("{}", text);
    io::stdout().flush()?;

    match lines.next() {
        Some(line) => Ok(Some(line?.trim().to_string())),
        None => Ok(None),
    }
}
