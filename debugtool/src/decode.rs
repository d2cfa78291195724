// -*- coding: utf-8 -*-

use std::fmt;

/// Value slot names, in firmware id order.
const NAMES: [&str; 5] = ["setpoint", "measured", "pid_y", "applied_y", "state"];

/// Id of the system state slot. It carries a raw enum value
/// instead of a Q8.8 percentage.
const STATE_ID: u8 = 4;

const STATE_NAMES: [&str; 3] = ["idle", "normal", "overload"];

#[derive(Debug, PartialEq, Eq)]
pub struct Frame {
    pub id: u8,
    pub value: u16,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = NAMES[self.id as usize];
        if self.id == STATE_ID {
            let state = STATE_NAMES
                .get(self.value as usize)
                .copied()
                .unwrap_or("invalid");
            write!(f, "{name} = {state}")
        } else {
            // Q8.8 percentage.
            write!(f, "{name} = {:.2}", self.value as f32 / 256.0)
        }
    }
}

/// Decoder for the 3 byte (id, low, high) frame stream.
///
/// The stream has no delimiters. Synchronization comes from the
/// fact that only a handful of id values are valid: anything else
/// at a frame start is discarded until an id byte lines up.
pub struct Decoder {
    buf: [u8; 3],
    len: usize,
}

impl Decoder {
    pub fn new() -> Self {
        Self {
            buf: [0; 3],
            len: 0,
        }
    }

    pub fn push(&mut self, byte: u8) -> Option<Frame> {
        if self.len == 0 && byte as usize >= NAMES.len() {
            // Not a valid id: still hunting for frame alignment.
            return None;
        }
        self.buf[self.len] = byte;
        self.len += 1;
        if self.len < self.buf.len() {
            return None;
        }
        self.len = 0;
        Some(Frame {
            id: self.buf[0],
            value: u16::from_le_bytes([self.buf[1], self.buf[2]]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_clean_stream() {
        let mut dec = Decoder::new();
        let stream = [0, 0x34, 0x12, 2, 0xFF, 0x00];
        let frames: Vec<Frame> = stream.iter().filter_map(|&b| dec.push(b)).collect();
        assert_eq!(
            frames,
            vec![
                Frame {
                    id: 0,
                    value: 0x1234
                },
                Frame {
                    id: 2,
                    value: 0x00FF
                },
            ]
        );
    }

    #[test]
    fn resyncs_after_garbage() {
        let mut dec = Decoder::new();
        // Garbage that can never be an id, then a valid frame.
        let stream = [0xAA, 0xBB, 0xCC, 1, 0x00, 0x01];
        let frames: Vec<Frame> = stream.iter().filter_map(|&b| dec.push(b)).collect();
        assert_eq!(
            frames,
            vec![Frame {
                id: 1,
                value: 0x0100
            }]
        );
    }

    #[test]
    fn value_bytes_are_little_endian() {
        let mut dec = Decoder::new();
        assert_eq!(dec.push(3), None);
        assert_eq!(dec.push(0x01), None);
        let frame = dec.push(0x02).unwrap();
        assert_eq!(frame.value, 0x0201);
    }

    #[test]
    fn percentage_display() {
        let frame = Frame {
            id: 0,
            value: 50 * 256 + 128,
        };
        assert_eq!(frame.to_string(), "setpoint = 50.50");
    }

    #[test]
    fn state_display() {
        let frame = Frame { id: 4, value: 2 };
        assert_eq!(frame.to_string(), "state = overload");
        let frame = Frame { id: 4, value: 7 };
        assert_eq!(frame.to_string(), "state = invalid");
    }
}

// vim: ts=4 sw=4 expandtab
