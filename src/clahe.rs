//! Contrast Limited Adaptive Histogram Equalization of an 8-bit plane
//!
//! The plane is cut into a grid of tiles. Each tile gets its own
//! equalization lookup table built from a clipped histogram, and every
//! output pixel blends the tables of the four nearest tile centres
//! bilinearly so no tile seams show.

use std::borrow::Cow;

use image::{GrayImage, Luma, SubImage};
use imageproc::stats::{histogram, ChannelHistogram};
use log::{debug, trace};

use crate::config::ContrastConfig;
use crate::constants::HISTOGRAM_BINS;
use crate::error::{EnhanceError, Result};

type LookupTable = [u8; HISTOGRAM_BINS];

/// Clip limit and tile grid of one CLAHE run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClaheParams {
    /// Bin cap as a multiple of the flat-histogram height; 0 disables clipping
    pub clip_limit: f32,
    pub tiles_hz: u32,
    pub tiles_vt: u32,
}

impl Default for ClaheParams {
    fn default() -> Self {
        Self::from(&ContrastConfig::default())
    }
}

impl From<&ContrastConfig> for ClaheParams {
    fn from(config: &ContrastConfig) -> Self {
        Self {
            clip_limit: config.clip_limit,
            tiles_hz: config.tiles_x,
            tiles_vt: config.tiles_y,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct TileCoordinate {
    pub x: u32,
    pub y: u32,
}

/// Equalize `input` tile by tile with a clipped histogram
pub fn clahe(input: &GrayImage, params: &ClaheParams) -> Result<GrayImage> {
    let (width, height) = input.dimensions();
    if width == 0 || height == 0 {
        return Err(EnhanceError::invalid_image(format!(
            "plane has zero area ({}x{})",
            width, height
        )));
    }
    if !params.clip_limit.is_finite() || params.clip_limit < 0.0 {
        return Err(EnhanceError::invalid_parameter("clip_limit", params.clip_limit));
    }
    if params.tiles_hz == 0 || params.tiles_vt == 0 {
        return Err(EnhanceError::invalid_parameter(
            "tile_grid",
            format!("{}x{}", params.tiles_hz, params.tiles_vt),
        ));
    }

    let tiles_hz = params.tiles_hz;
    let tiles_vt = params.tiles_vt;
    let padded_width = width.div_ceil(tiles_hz) * tiles_hz;
    let padded_height = height.div_ceil(tiles_vt) * tiles_vt;
    let padded = if (padded_width, padded_height) == (width, height) {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(pad_reflect_101(input, padded_width, padded_height))
    };

    let tile_width = padded_width / tiles_hz;
    let tile_height = padded_height / tiles_vt;
    let tile_area = tile_width * tile_height;
    let clip = clip_count(params.clip_limit, tile_area);
    debug!(
        "clahe {}x{} (padded {}x{}), {}x{} tiles of {}x{}, clip {:?}",
        width, height, padded_width, padded_height, tiles_hz, tiles_vt, tile_width, tile_height, clip
    );

    let mut lookup_tables = vec![vec![[0u8; HISTOGRAM_BINS]; tiles_hz as usize]; tiles_vt as usize];

    for (row_idx, row) in lookup_tables.iter_mut().enumerate() {
        for (col_idx, table) in row.iter_mut().enumerate() {
            let tile = SubImage::new(
                &*padded,
                tile_width * col_idx as u32,
                tile_height * row_idx as u32,
                tile_width,
                tile_height,
            );
            let tile_hist = histogram(&tile.to_image());

            if is_single_level(&tile_hist) {
                trace!("tile ({}, {}) is flat, identity mapping", col_idx, row_idx);
                identity_mapping(table);
                continue;
            }

            let tile_hist = match clip {
                Some(limit) => clip_histogram(tile_hist, limit),
                None => tile_hist,
            };
            perform_gray_level_mapping(&tile_hist, tile_area, table);
        }
    }

    let mut output = GrayImage::new(width, height);
    for (x, y, val) in input.enumerate_pixels() {
        let (tiles, x_weight, y_weight) = get_neighbor_tiles(
            x,
            y,
            tiles_hz,
            tiles_vt,
            tile_width,
            tile_height,
        );

        let level = val.0[0] as usize;
        let [top_left, top_right, bottom_right, bottom_left] = tiles
            .map(|tile| lookup_tables[tile.y as usize][tile.x as usize][level] as f32);

        let top = top_left * (1.0 - x_weight) + top_right * x_weight;
        let bottom = bottom_left * (1.0 - x_weight) + bottom_right * x_weight;
        let blended = top * (1.0 - y_weight) + bottom * y_weight;

        output.put_pixel(x, y, Luma([blended.round().clamp(0.0, 255.0) as u8]));
    }

    Ok(output)
}

/// Absolute per-bin cap for a tile, `None` when clipping is disabled
fn clip_count(clip_limit: f32, tile_area: u32) -> Option<u32> {
    if clip_limit > 0.0 {
        let limit = (clip_limit * tile_area as f32 / HISTOGRAM_BINS as f32) as u32;
        Some(limit.max(1))
    } else {
        None
    }
}

fn is_single_level(histogram: &ChannelHistogram) -> bool {
    histogram.channels[0].iter().filter(|&&count| count > 0).count() == 1
}

fn clip_histogram(mut histogram: ChannelHistogram, limit: u32) -> ChannelHistogram {
    let bins = &mut histogram.channels[0];
    let mut num_pixels_over_limit: u32 = 0;

    for count in bins.iter_mut() {
        if *count > limit {
            num_pixels_over_limit += *count - limit;
            *count = limit;
        }
    }

    let excess_pixels_per_bin = num_pixels_over_limit / HISTOGRAM_BINS as u32;
    let mut residual = num_pixels_over_limit - excess_pixels_per_bin * HISTOGRAM_BINS as u32;

    for count in bins.iter_mut() {
        *count += excess_pixels_per_bin;
    }

    if residual > 0 {
        let step = (HISTOGRAM_BINS as u32 / residual).max(1) as usize;
        for count in bins.iter_mut().step_by(step) {
            if residual == 0 {
                break;
            }
            *count += 1;
            residual -= 1;
        }
    }

    histogram
}

fn perform_gray_level_mapping(
    histogram: &ChannelHistogram,
    num_pixels: u32,
    lookup_table: &mut LookupTable,
) {
    let lut_scale = 255.0 / num_pixels as f32;

    let mut num_pixels_seen: u32 = 0;
    for (entry, count) in lookup_table.iter_mut().zip(histogram.channels[0].iter()) {
        num_pixels_seen += count;
        *entry = (num_pixels_seen as f32 * lut_scale).round().min(255.0) as u8;
    }
}

fn identity_mapping(lookup_table: &mut LookupTable) {
    for (level, entry) in lookup_table.iter_mut().enumerate() {
        *entry = level as u8;
    }
}

/// Lower/upper neighbouring tile index along one axis and the weight of the upper one
fn axis_neighbors(pos: u32, tile_size: u32, tiles: u32) -> (u32, u32, f32) {
    let from_first_center = pos as f32 / tile_size as f32 - 0.5;
    let lower = from_first_center.floor();
    let weight = from_first_center - lower;
    let lower = lower as i64;
    let upper = (lower + 1).min(tiles as i64 - 1);
    (lower.max(0) as u32, upper as u32, weight)
}

/// Four tiles surrounding `(x, y)` (clockwise from top-left) plus x and y weights
fn get_neighbor_tiles(
    x: u32,
    y: u32,
    tiles_hz: u32,
    tiles_vt: u32,
    tile_width: u32,
    tile_height: u32,
) -> ([TileCoordinate; 4], f32, f32) {
    let (left_x, right_x, x_weight) = axis_neighbors(x, tile_width, tiles_hz);
    let (top_y, bottom_y, y_weight) = axis_neighbors(y, tile_height, tiles_vt);

    (
        [
            TileCoordinate { x: left_x, y: top_y },
            TileCoordinate { x: right_x, y: top_y },
            TileCoordinate {
                x: right_x,
                y: bottom_y,
            },
            TileCoordinate {
                x: left_x,
                y: bottom_y,
            },
        ],
        x_weight,
        y_weight,
    )
}

/// Mirror index into `[0, len)` without repeating the edge sample
fn reflect_101(pos: u32, len: u32) -> u32 {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len - 1);
    let pos = pos % period;
    if pos < len {
        pos
    } else {
        period - pos
    }
}

fn pad_reflect_101(input: &GrayImage, width: u32, height: u32) -> GrayImage {
    let (src_width, src_height) = input.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        *input.get_pixel(reflect_101(x, src_width), reflect_101(y, src_height))
    })
}
