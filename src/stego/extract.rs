// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! BPCS extraction from one carrier unit.
//!
//! Mirrors [`embed_stream`](crate::stego::embed::embed_stream): the same
//! [`ScanOrder`] is walked, every complex block yields one byte, and the bytes
//! are fed to a [`ByteCollector`] until it recognizes a complete message.

use log::debug;

use crate::raster::bitplane::decompose;
use crate::raster::Carrier;
use crate::stego::config::BpcsConfig;
use crate::stego::error::{FramingError, StegoError};
use crate::stego::layout::{group_to_byte, read_group};
use crate::stego::scan::{complex_mask, ScanOrder};

/// Incremental consumer of extracted bytes.
///
/// `push` returns `Ok(Some(_))` once the bytes seen so far form a complete
/// message, and an error as soon as they cannot.
pub trait ByteCollector {
    type Output;

    fn push(&mut self, byte: u8) -> Result<Option<Self::Output>, FramingError>;
}

/// Walk `carrier` and feed every carried byte to `collector`.
///
/// Planes are decomposed lazily, so a message near the start of the scan
/// costs only the planes it touches.
///
/// # Errors
/// - [`StegoError::InvalidConfig`] if `config` fails validation.
/// - [`StegoError::MarkerNotFound`] if the collector rejects the bytes or
///   the carrier is exhausted before it completes.
pub fn extract_with<C: ByteCollector>(
    carrier: &Carrier,
    config: &BpcsConfig,
    collector: &mut C,
) -> Result<C::Output, StegoError> {
    config.validate()?;

    let order = ScanOrder::for_carrier(carrier, config);
    let positions: Vec<_> = order.positions().collect();
    let mut bytes_read = 0usize;

    for channel in 0..order.channels() {
        let planes = decompose(carrier.channel(channel));
        for plane in order.planes() {
            let bit_plane = &planes[plane as usize];
            let mask = complex_mask(bit_plane, &positions, order.block_size(), config.complexity_threshold);

            for (&pos, _) in positions.iter().zip(&mask).filter(|(_, c)| **c) {
                let byte = group_to_byte(&read_group(&bit_plane.block(pos, order.block_size())));
                bytes_read += 1;
                match collector.push(byte) {
                    Ok(Some(out)) => {
                        debug!("message complete after {bytes_read} bytes (channel {channel}, plane {plane})");
                        return Ok(out);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        debug!("collector rejected byte {bytes_read}: {e}");
                        return Err(StegoError::MarkerNotFound);
                    }
                }
            }
        }
    }

    debug!("carrier exhausted after {bytes_read} bytes");
    Err(StegoError::MarkerNotFound)
}
