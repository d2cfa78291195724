// -*- coding: utf-8 -*-

use crate::decode::Decoder;
use anyhow::{self as ah, Context as _};
use std::{io::Read as _, time::Duration};

const BAUD: u32 = 19_200;

pub fn run_serial(port: &Option<String>) -> ah::Result<()> {
    let port = port.as_deref().unwrap_or("/dev/ttyUSB0");
    let mut serial = serialport::new(port, BAUD)
        .data_bits(serialport::DataBits::Eight)
        .parity(serialport::Parity::None)
        .flow_control(serialport::FlowControl::None)
        .stop_bits(serialport::StopBits::One)
        .timeout(Duration::from_millis(500))
        .open()
        .context("Open serial port")?;

    let mut decoder = Decoder::new();
    let mut buf = [0_u8; 64];
    loop {
        let len = match serial.read(&mut buf) {
            Ok(len) => len,
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => continue,
            Err(e) => return Err(e).context("Serial port read"),
        };
        for &byte in &buf[..len] {
            if let Some(frame) = decoder.push(byte) {
                println!("{frame}");
            }
        }
    }
}

// vim: ts=4 sw=4 expandtab
