//! In-memory camera emulator for integration tests

#![allow(dead_code)]

use std::collections::{BTreeSet, VecDeque};

use bytes::Bytes;
use linkcam::{BaudRate, Transport};
use linkcam_transport::{Error, Result};

pub const BANNER: &[u8] =
    b"VC0703 1.00\r\nCtrl infr exist\r\nUser-defined sensor\r\n625\r\nInit end\r\n";

const FRAME: [u8; 5] = [0x76, 0x00, 0x32, 0x00, 0x00];

/// Emulates the camera's side of the serial line
///
/// Commands written at a line speed the camera is not running at are
/// ignored, so a host that switches speed too early sees read timeouts.
pub struct Emulator {
    pub host_speed: u32,
    pub device_speed: u32,
    pub memory: Vec<u8>,
    pub advertised_size: u16,
    pub reject_baud: bool,
    pub reject_capture: bool,
    pub corrupt_headers: BTreeSet<usize>,
    pub corrupt_footers: BTreeSet<usize>,
    /// Chunk whose reply stops halfway through the payload
    pub truncated_chunk: Option<usize>,
    pub chunk_addresses: Vec<u16>,
    pub writes: Vec<Bytes>,
    pub captured: bool,
    pub resolution_code: Option<u8>,
    open: bool,
    pending: VecDeque<u8>,
}

impl Emulator {
    /// Camera at 38400 baud holding `image` followed by junk
    pub fn new(image: &[u8]) -> Self {
        let mut memory = image.to_vec();
        memory.extend_from_slice(&[0xFF, 0xD8, 0xAB, 0xCD]);

        Self {
            host_speed: 38400,
            device_speed: 38400,
            memory,
            advertised_size: image.len() as u16,
            reject_baud: false,
            reject_capture: false,
            corrupt_headers: BTreeSet::new(),
            corrupt_footers: BTreeSet::new(),
            truncated_chunk: None,
            chunk_addresses: Vec::new(),
            writes: Vec::new(),
            captured: false,
            resolution_code: None,
            open: true,
            pending: VecDeque::new(),
        }
    }

    fn respond(&mut self, bytes: &[u8]) {
        self.pending.extend(bytes.iter().copied());
    }

    fn handle(&mut self, data: &[u8]) {
        match data {
            [0x56, 0x00, 0x26, 0x00] => {
                self.respond(BANNER);
            }
            [0x56, 0x00, 0x24, 0x03, 0x01, hi, lo] => {
                if self.reject_baud {
                    self.respond(&[0x76, 0x00, 0x24, 0x01, 0x00]);
                    return;
                }
                let speed = BaudRate::ALL
                    .into_iter()
                    .find(|rate| {
                        linkcam::Command::SetBaudRate(*rate).encode()[5..] == [*hi, *lo]
                    })
                    .map(|rate| rate.bits_per_second());
                if let Some(speed) = speed {
                    self.respond(&[0x76, 0x00, 0x24, 0x00, 0x00]);
                    self.device_speed = speed;
                }
            }
            [0x56, 0x00, 0x31, 0x05, 0x04, 0x01, 0x00, 0x19, code] => {
                self.resolution_code = Some(*code);
                self.respond(&[0x76, 0x00, 0x31, 0x00, 0x00]);
            }
            [0x56, 0x00, 0x36, 0x01, 0x00] => {
                if self.reject_capture {
                    self.respond(&[0x76, 0x00, 0x36, 0x03, 0x00]);
                } else {
                    self.captured = true;
                    self.respond(&[0x76, 0x00, 0x36, 0x00, 0x00]);
                }
            }
            [0x56, 0x00, 0x34, 0x01, 0x00] => {
                let [hi, lo] = self.advertised_size.to_be_bytes();
                self.respond(&[0x76, 0x00, 0x34, 0x00, 0x04, 0x00, 0x00, hi, lo]);
            }
            [
                0x56, 0x00, 0x32, 0x0C, 0x00, 0x0A, 0x00, 0x00, m_hi, m_lo, 0x00, 0x00, k_hi, k_lo,
                0x00, 0x0A,
            ] => {
                let address = u16::from_be_bytes([*m_hi, *m_lo]);
                let len = usize::from(u16::from_be_bytes([*k_hi, *k_lo]));
                let index = self.chunk_addresses.len();
                self.chunk_addresses.push(address);

                let start = usize::from(address);
                let mut payload: Vec<u8> =
                    self.memory.iter().skip(start).take(len).copied().collect();
                payload.resize(len, 0x00);

                let header = if self.corrupt_headers.contains(&index) {
                    [0x76, 0x00, 0x32, 0x01, 0x00]
                } else {
                    FRAME
                };
                let footer = if self.corrupt_footers.contains(&index) {
                    [0x00, 0x00, 0x00, 0x00, 0x00]
                } else {
                    FRAME
                };

                self.respond(&header);
                if self.truncated_chunk == Some(index) {
                    self.respond(&payload[..len / 2]);
                    return;
                }
                self.respond(&payload);
                self.respond(&footer);
            }
            _ => {}
        }
    }
}

impl Transport for Emulator {
    fn write(&mut self, data: &[u8]) -> Result<()> {
        if !self.open {
            return Err(Error::NotOpen);
        }

        self.writes.push(Bytes::copy_from_slice(data));
        if self.host_speed == self.device_speed {
            self.handle(data);
        }
        Ok(())
    }

    fn read_exact(&mut self, len: usize) -> Result<Bytes> {
        if !self.open {
            return Err(Error::NotOpen);
        }

        if self.pending.len() < len {
            let received = self.pending.len();
            self.pending.clear();
            return Err(Error::ReadTimeout {
                expected: len,
                received,
            });
        }

        Ok(self.pending.drain(..len).collect::<Vec<u8>>().into())
    }

    fn set_line_speed(&mut self, baud_rate: u32) -> Result<()> {
        if !self.open {
            return Err(Error::NotOpen);
        }
        self.host_speed = baud_rate;
        Ok(())
    }

    fn line_speed(&self) -> u32 {
        self.host_speed
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn close(&mut self) -> Result<()> {
        self.open = false;
        self.pending.clear();
        Ok(())
    }

    fn port_name(&self) -> String {
        "emulator".to_string()
    }
}

/// Synthetic JPEG of `len` bytes: SOI, body without 0xFF, EOI
pub fn synthetic_jpeg(len: usize) -> Vec<u8> {
    assert!(len >= 4);
    let mut image = vec![0xFF, 0xD8];
    image.extend((0..len - 4).map(|i| (i % 0xFE) as u8));
    image.extend_from_slice(&[0xFF, 0xD9]);
    image
}
