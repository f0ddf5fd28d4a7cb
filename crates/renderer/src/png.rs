//! PNG encoding for rendered frames and legend bars.
//!
//! Frames built from colour ramps usually carry far fewer than 256 distinct
//! colours, so [`encode_rgba`] first tries an indexed image (colour type 3)
//! and falls back to truecolour RGBA (colour type 6) when the palette
//! overflows.

use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::io::Write;
use tiny_skia::Pixmap;

use crate::RenderError;

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Maximum colors for indexed PNG (PNG8)
const MAX_PALETTE_SIZE: usize = 256;

/// Minimum pixels to benefit from parallel palette extraction
const PARALLEL_THRESHOLD: usize = 4096;

/// Indexed form of an RGBA buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    pub palette: Vec<[u8; 4]>,
    pub indices: Vec<u8>,
}

#[inline(always)]
fn pack(px: &[u8]) -> u32 {
    u32::from_le_bytes([px[0], px[1], px[2], px[3]])
}

/// Build a palette of at most 256 entries, or `None` if the buffer has more
/// distinct colours. Palette order follows first appearance for small
/// buffers.
pub fn extract_palette(pixels: &[u8]) -> Option<IndexedImage> {
    if pixels.len() / 4 >= PARALLEL_THRESHOLD {
        extract_palette_parallel(pixels)
    } else {
        extract_palette_sequential(pixels)
    }
}

fn extract_palette_sequential(pixels: &[u8]) -> Option<IndexedImage> {
    let mut lookup: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette = Vec::with_capacity(MAX_PALETTE_SIZE);
    let mut indices = Vec::with_capacity(pixels.len() / 4);

    for px in pixels.chunks_exact(4) {
        let key = pack(px);
        let index = match lookup.get(&key) {
            Some(&idx) => idx,
            None => {
                if palette.len() >= MAX_PALETTE_SIZE {
                    return None;
                }
                let idx = palette.len() as u8;
                palette.push([px[0], px[1], px[2], px[3]]);
                lookup.insert(key, idx);
                idx
            }
        };
        indices.push(index);
    }

    Some(IndexedImage { palette, indices })
}

fn extract_palette_parallel(pixels: &[u8]) -> Option<IndexedImage> {
    let chunk_px = (pixels.len() / 4 / rayon::current_num_threads()).max(256);

    // Per-chunk colours in first-appearance order; a chunk stops early once
    // it alone overflows. Chunks come back in buffer order, so the merged
    // palette matches the sequential one.
    let local_colors: Vec<Vec<u32>> = pixels
        .par_chunks(chunk_px * 4)
        .map(|chunk| {
            let mut seen = HashSet::with_capacity(MAX_PALETTE_SIZE);
            let mut order = Vec::with_capacity(MAX_PALETTE_SIZE);
            for px in chunk.chunks_exact(4) {
                let key = pack(px);
                if seen.insert(key) {
                    order.push(key);
                    if order.len() > MAX_PALETTE_SIZE {
                        break;
                    }
                }
            }
            order
        })
        .collect();

    let mut lookup: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette = Vec::with_capacity(MAX_PALETTE_SIZE);
    for key in local_colors.into_iter().flatten() {
        if lookup.contains_key(&key) {
            continue;
        }
        if palette.len() >= MAX_PALETTE_SIZE {
            return None;
        }
        lookup.insert(key, palette.len() as u8);
        palette.push(key.to_le_bytes());
    }

    let indices = pixels
        .par_chunks_exact(4)
        .map(|px| lookup.get(&pack(px)).copied().unwrap_or(0))
        .collect();

    Some(IndexedImage { palette, indices })
}

/// Encode straight (non-premultiplied) RGBA, choosing indexed when possible.
pub fn encode_rgba(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
    check_len(pixels.len(), width, height, 4)?;
    match extract_palette(pixels) {
        Some(indexed) => encode_indexed(&indexed, width, height),
        None => encode_truecolor(pixels, width, height),
    }
}

/// Encode a tiny-skia pixmap; its premultiplied pixels are demultiplied first.
pub fn encode_pixmap(pixmap: &Pixmap) -> Result<Vec<u8>, RenderError> {
    let straight: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    encode_rgba(&straight, pixmap.width(), pixmap.height())
}

/// Colour type 3 with a `tRNS` chunk when any palette entry is translucent.
pub fn encode_indexed(
    image: &IndexedImage,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, RenderError> {
    check_len(image.indices.len(), width, height, 1)?;
    if image.palette.is_empty() || image.palette.len() > MAX_PALETTE_SIZE {
        return Err(RenderError::Encode(format!(
            "palette must hold 1..={} entries, got {}",
            MAX_PALETTE_SIZE,
            image.palette.len()
        )));
    }

    let mut png = PNG_SIGNATURE.to_vec();
    write_chunk(&mut png, b"IHDR", &header(width, height, 3));

    let plte: Vec<u8> = image.palette.iter().flat_map(|c| [c[0], c[1], c[2]]).collect();
    write_chunk(&mut png, b"PLTE", &plte);

    if image.palette.iter().any(|c| c[3] < 255) {
        let trns: Vec<u8> = image.palette.iter().map(|c| c[3]).collect();
        write_chunk(&mut png, b"tRNS", &trns);
    }

    let idat = deflate_scanlines(&image.indices, width as usize, height as usize)?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

/// Colour type 6, 8 bits per channel.
pub fn encode_truecolor(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
    check_len(pixels.len(), width, height, 4)?;

    let mut png = PNG_SIGNATURE.to_vec();
    write_chunk(&mut png, b"IHDR", &header(width, height, 6));
    let idat = deflate_scanlines(pixels, width as usize * 4, height as usize)?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

fn check_len(len: usize, width: u32, height: u32, bpp: usize) -> Result<(), RenderError> {
    let expected = width as usize * height as usize * bpp;
    if width == 0 || height == 0 || len != expected {
        return Err(RenderError::Encode(format!(
            "{} bytes do not describe a {}x{} image ({} bytes per pixel)",
            len, width, height, bpp
        )));
    }
    Ok(())
}

fn header(width: u32, height: u32, color_type: u8) -> Vec<u8> {
    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&width.to_be_bytes());
    ihdr.extend_from_slice(&height.to_be_bytes());
    ihdr.push(8); // bit depth
    ihdr.push(color_type);
    ihdr.push(0); // compression
    ihdr.push(0); // filter
    ihdr.push(0); // interlace
    ihdr
}

/// Prefix each row with filter type 0 and zlib-compress.
fn deflate_scanlines(data: &[u8], row_bytes: usize, rows: usize) -> Result<Vec<u8>, RenderError> {
    let mut raw = Vec::with_capacity(rows * (row_bytes + 1));
    for row in data.chunks_exact(row_bytes).take(rows) {
        raw.push(0);
        raw.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    let idat_err = |e: std::io::Error| RenderError::Encode(format!("IDAT compression failed: {}", e));
    encoder.write_all(&raw).map_err(idat_err)?;
    encoder.finish().map_err(idat_err)
}

fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}
