//! Map view of the forward data.
//!
//! The plot is drawn with `plotters` into an RGB buffer and encoded with
//! `image`. Axes are offsets from the mesh anchor in metres.

use std::path::Path;
use std::sync::OnceLock;

use glam::DVec2;
use image::RgbImage;
use plotters::prelude::*;
use plotters::style::{FontStyle, register_font};

use crate::survey::ReceiverSet;
use crate::types::{ForwardError, Rect};

static SANS: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");

/// Width in pixels of the colour bar panel on the right.
const COLORBAR_AREA: u32 = 120;
const CAPTION_SIZE: u32 = 22;
const MARGIN: u32 = 12;

/// A single colour stop along the normalised `[0, 1]` domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub v: f64,
    pub rgb: [u8; 3],
}

/// Piecewise-linear colour ramp with strictly increasing stops over `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    stops: Vec<ColorStop>,
}

impl Palette {
    pub fn new(stops: Vec<ColorStop>) -> Result<Self, ForwardError> {
        if stops.len() < 2 {
            return Err(ForwardError::InvalidConfig(
                "palette needs at least two stops".to_string(),
            ));
        }
        if stops.windows(2).any(|w| w[1].v <= w[0].v) {
            return Err(ForwardError::InvalidConfig(
                "palette stops must be strictly increasing".to_string(),
            ));
        }
        Ok(Self { stops })
    }

    /// Five-stop approximation of matplotlib's viridis.
    pub fn viridis() -> Self {
        let rgb = [
            [0x44, 0x01, 0x54],
            [0x3b, 0x52, 0x8b],
            [0x21, 0x91, 0x8c],
            [0x5e, 0xc9, 0x62],
            [0xfd, 0xe7, 0x25],
        ];
        let stops = rgb
            .iter()
            .enumerate()
            .map(|(i, &rgb)| ColorStop {
                v: i as f64 / 4.0,
                rgb,
            })
            .collect();
        Self { stops }
    }

    /// Colour at `t`, clamped to the palette range.
    pub fn sample(&self, t: f64) -> [u8; 3] {
        let first = self.stops[0];
        let last = self.stops[self.stops.len() - 1];
        let t = if t.is_nan() { first.v } else { t.clamp(first.v, last.v) };
        let i = self
            .stops
            .partition_point(|s| s.v <= t)
            .clamp(1, self.stops.len() - 1);
        let (a, b) = (self.stops[i - 1], self.stops[i]);
        let f = (t - a.v) / (b.v - a.v);
        std::array::from_fn(|c| {
            let (ca, cb) = (a.rgb[c] as f64, b.rgb[c] as f64);
            (ca + f * (cb - ca)).round().clamp(0.0, 255.0) as u8
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotOptions {
    /// Image size in pixels.
    pub size: (u32, u32),
    pub levels: u32,
    /// Interpolation cells along each axis of the map.
    pub cells: u32,
    /// World position of the axis origin.
    pub anchor: DVec2,
    /// Half-width of a square window about the anchor. The receiver footprint
    /// is used when unset.
    pub half_width: Option<f64>,
    pub palette: Palette,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            size: (800, 640),
            levels: 40,
            cells: 200,
            anchor: DVec2::ZERO,
            half_width: None,
            palette: Palette::viridis(),
        }
    }
}

fn register_fonts() -> Result<(), ForwardError> {
    static REGISTERED: OnceLock<bool> = OnceLock::new();
    let ok = *REGISTERED
        .get_or_init(|| register_font("sans-serif", FontStyle::Normal, SANS).is_ok());
    if ok {
        Ok(())
    } else {
        Err(ForwardError::Plot("embedded font failed to load".to_string()))
    }
}

/// Plotted extent relative to the anchor.
pub fn plot_extent(receivers: &ReceiverSet, options: &PlotOptions) -> Result<Rect, ForwardError> {
    let mut extent = match options.half_width {
        Some(half) if half.is_finite() && half > 0.0 => Rect {
            min: DVec2::splat(-half),
            max: DVec2::splat(half),
        },
        Some(half) => {
            return Err(ForwardError::InvalidConfig(format!(
                "plot half-width must be positive, got {half}"
            )));
        }
        None => {
            let footprint = receivers.footprint();
            if footprint.is_empty() {
                return Err(ForwardError::EmptyInput("nothing to plot".to_string()));
            }
            Rect {
                min: footprint.min - options.anchor,
                max: footprint.max - options.anchor,
            }
        }
    };
    // A single row or column of receivers still gets a visible strip.
    if extent.size().x <= 0.0 {
        extent.min.x -= 1.0;
        extent.max.x += 1.0;
    }
    if extent.size().y <= 0.0 {
        extent.min.y -= 1.0;
        extent.max.y += 1.0;
    }
    Ok(extent)
}

/// Render the receiver data as a filled-contour map titled "Gz (mGal)", with a
/// colour bar on the right.
///
/// Values between receivers are interpolated bilinearly over the lattice and
/// quantised into `levels` bands.
pub fn render_data_map(
    receivers: &ReceiverSet,
    values: &[f64],
    options: &PlotOptions,
) -> Result<RgbImage, ForwardError> {
    ForwardError::check_len("plotted data", receivers.len(), values.len())?;
    if receivers.is_empty() {
        return Err(ForwardError::EmptyInput("nothing to plot".to_string()));
    }
    let (width, height) = options.size;
    let too_small = width <= COLORBAR_AREA * 2 || height <= COLORBAR_AREA;
    if too_small || options.levels == 0 || options.cells == 0 {
        return Err(ForwardError::InvalidConfig(format!(
            "plot of {width}x{height} px with {} levels over {} cells is too small",
            options.levels, options.cells
        )));
    }
    register_fonts()?;
    let extent = plot_extent(receivers, options)?;

    let (vmin, vmax) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let (vmin, span) = if vmax > vmin {
        (vmin, vmax - vmin)
    } else if vmin.is_finite() {
        (vmin - 0.5, 1.0)
    } else {
        (0.0, 1.0)
    };
    let levels = options.levels;
    let band_of = |v: f64| -> u32 {
        let t = ((v - vmin) / span).clamp(0.0, 1.0);
        ((t * levels as f64) as u32).min(levels - 1)
    };
    let color_of = |band: u32| -> RGBColor {
        let [r, g, b] = options.palette.sample((band as f64 + 0.5) / levels as f64);
        RGBColor(r, g, b)
    };

    let mut buf = vec![255u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
        root.fill(&WHITE)?;
        let (map_area, bar_area) = root.split_horizontally(width - COLORBAR_AREA);

        let mut map = ChartBuilder::on(&map_area)
            .caption("Gz (mGal)", ("sans-serif", CAPTION_SIZE))
            .margin(MARGIN)
            .x_label_area_size(48)
            .y_label_area_size(72)
            .build_cartesian_2d(extent.min.x..extent.max.x, extent.min.y..extent.max.y)?;
        map.configure_mesh()
            .disable_mesh()
            .x_desc("Easting (m)")
            .y_desc("Northing (m)")
            .x_label_formatter(&|x| format!("{x:.0}"))
            .y_label_formatter(&|y| format!("{y:.0}"))
            .draw()?;

        let step = extent.size() / options.cells as f64;
        let cells = (0..options.cells).flat_map(|j| (0..options.cells).map(move |i| (i, j)));
        map.draw_series(cells.filter_map(|(i, j)| {
            let lo = extent.min + DVec2::new(i as f64, j as f64) * step;
            let hi = lo + step;
            let v = bilinear(receivers, values, options.anchor + (lo + hi) * 0.5)?;
            Some(Rectangle::new(
                [(lo.x, lo.y), (hi.x, hi.y)],
                color_of(band_of(v)).filled(),
            ))
        }))?;

        map.draw_series(
            receivers
                .locations()
                .iter()
                .map(|p| p.truncate() - options.anchor)
                .filter(|p| {
                    p.x >= extent.min.x
                        && p.x <= extent.max.x
                        && p.y >= extent.min.y
                        && p.y <= extent.max.y
                })
                .map(|p| Circle::new((p.x, p.y), 2, BLACK.filled())),
        )?;

        let mut bar = ChartBuilder::on(&bar_area)
            .margin(MARGIN)
            .margin_top(MARGIN + CAPTION_SIZE + 8)
            .x_label_area_size(48)
            .set_label_area_size(LabelAreaPosition::Right, 64)
            .build_cartesian_2d(0.0..1.0, vmin..vmin + span)?;
        bar.configure_mesh()
            .disable_mesh()
            .disable_x_axis()
            .y_label_formatter(&|v| format!("{v:.3}"))
            .draw()?;
        bar.draw_series((0..levels).map(|band| {
            let lo = vmin + span * band as f64 / levels as f64;
            let hi = vmin + span * (band + 1) as f64 / levels as f64;
            Rectangle::new([(0.0, lo), (1.0, hi)], color_of(band).filled())
        }))?;

        root.present()?;
    }

    RgbImage::from_raw(width, height, buf)
        .ok_or_else(|| ForwardError::Plot("plot buffer does not match its size".to_string()))
}

pub fn save_data_map(
    path: impl AsRef<Path>,
    receivers: &ReceiverSet,
    values: &[f64],
    options: &PlotOptions,
) -> Result<(), ForwardError> {
    render_data_map(receivers, values, options)?.save(path.as_ref())?;
    Ok(())
}

/// Lower bracketing index and fraction of `x` on a sorted axis; `None` outside it.
fn bracket(axis: &[f64], x: f64) -> Option<(usize, f64)> {
    let (first, last) = (*axis.first()?, *axis.last()?);
    if x < first || x > last {
        return None;
    }
    if axis.len() == 1 {
        return Some((0, 0.0));
    }
    let i = axis.partition_point(|&a| a <= x).clamp(1, axis.len() - 1) - 1;
    let t = (x - axis[i]) / (axis[i + 1] - axis[i]);
    Some((i, t))
}

fn bilinear(receivers: &ReceiverSet, values: &[f64], p: DVec2) -> Option<f64> {
    let (ne, nn) = receivers.shape();
    let (i, tx) = bracket(receivers.eastings(), p.x)?;
    let (j, ty) = bracket(receivers.northings(), p.y)?;
    let i1 = (i + 1).min(ne - 1);
    let j1 = (j + 1).min(nn - 1);
    let at = |i: usize, j: usize| values[i + ne * j];
    let south = at(i, j) + tx * (at(i1, j) - at(i, j));
    let north = at(i, j1) + tx * (at(i1, j1) - at(i, j1));
    Some(south + ty * (north - south))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lattice() -> ReceiverSet {
        ReceiverSet::from_lattice(
            vec![0.0, 10.0, 20.0],
            vec![0.0, 10.0],
            vec![0.0; 6],
        )
        .unwrap()
    }

    fn options() -> PlotOptions {
        PlotOptions {
            size: (400, 320),
            cells: 60,
            ..PlotOptions::default()
        }
    }

    /// Pixels left of the colour bar panel.
    fn map_pixels(img: &RgbImage) -> impl Iterator<Item = [u8; 3]> + '_ {
        let map_width = img.width() - COLORBAR_AREA;
        img.enumerate_pixels()
            .filter(move |(x, _, _)| *x < map_width)
            .map(|(_, _, p)| p.0)
    }

    #[test]
    fn viridis_endpoints_match_stops() {
        let p = Palette::viridis();
        assert_eq!(p.sample(0.0), [0x44, 0x01, 0x54]);
        assert_eq!(p.sample(1.0), [0xfd, 0xe7, 0x25]);
        assert_eq!(p.sample(0.5), [0x21, 0x91, 0x8c]);
        assert_eq!(p.sample(-3.0), p.sample(0.0));
    }

    #[test]
    fn palette_rejects_unordered_stops() {
        let stops = vec![
            ColorStop { v: 0.5, rgb: [0; 3] },
            ColorStop { v: 0.5, rgb: [255; 3] },
        ];
        assert!(Palette::new(stops).is_err());
    }

    #[test]
    fn bilinear_reproduces_a_plane() {
        let rx = lattice();
        let values: Vec<f64> = rx.locations().iter().map(|p| 2.0 * p.x - p.y).collect();
        let v = bilinear(&rx, &values, DVec2::new(13.0, 4.0)).unwrap();
        assert!((v - 22.0).abs() < 1e-12);
        assert!(bilinear(&rx, &values, DVec2::new(21.0, 4.0)).is_none());
    }

    #[test]
    fn extent_is_relative_to_the_anchor() {
        let rx = lattice();
        let mut options = options();
        options.anchor = DVec2::new(10.0, 5.0);
        let extent = plot_extent(&rx, &options).unwrap();
        assert_eq!(extent.min, DVec2::new(-10.0, -5.0));
        assert_eq!(extent.max, DVec2::new(10.0, 5.0));

        options.half_width = Some(50.0);
        let extent = plot_extent(&rx, &options).unwrap();
        assert_eq!(extent.min, DVec2::splat(-50.0));
        assert_eq!(extent.max, DVec2::splat(50.0));

        options.half_width = Some(0.0);
        assert!(plot_extent(&rx, &options).is_err());
    }

    #[test]
    fn map_shows_every_band_extreme_and_labels() {
        let rx = lattice();
        let values: Vec<f64> = rx.locations().iter().map(|p| p.y).collect();
        let img = render_data_map(&rx, &values, &options()).unwrap();
        assert_eq!(img.dimensions(), (400, 320));

        let palette = Palette::viridis();
        let top_band = palette.sample(39.5 / 40.0);
        let bottom_band = palette.sample(0.5 / 40.0);
        assert!(map_pixels(&img).any(|p| p == top_band));
        assert!(map_pixels(&img).any(|p| p == bottom_band));

        // Tick labels and the northing title sit in the left label strip.
        let dark = img
            .enumerate_pixels()
            .filter(|(x, _, p)| *x < 50 && p.0.iter().all(|&c| c < 128))
            .count();
        assert!(dark > 10, "expected text in the label strip, found {dark} dark pixels");
    }

    #[test]
    fn north_is_up() {
        let rx = lattice();
        let values: Vec<f64> = rx.locations().iter().map(|p| p.y).collect();
        let img = render_data_map(&rx, &values, &options()).unwrap();

        let palette = Palette::viridis();
        let top_band = palette.sample(39.5 / 40.0);
        let bottom_band = palette.sample(0.5 / 40.0);
        let rows = |band: [u8; 3]| -> Vec<u32> {
            img.enumerate_pixels()
                .filter(|(x, _, p)| *x < img.width() - COLORBAR_AREA && p.0 == band)
                .map(|(_, y, _)| y)
                .collect()
        };
        let top_rows = rows(top_band);
        let bottom_rows = rows(bottom_band);
        assert!(!top_rows.is_empty() && !bottom_rows.is_empty());
        assert!(top_rows.iter().max() < bottom_rows.iter().min());
    }

    #[test]
    fn window_outside_lattice_has_no_data() {
        let rx = lattice();
        let palette = Palette::viridis();
        let bands: Vec<[u8; 3]> = (0..40)
            .map(|b| palette.sample((b as f64 + 0.5) / 40.0))
            .collect();
        let options = PlotOptions {
            anchor: DVec2::new(500.0, 500.0),
            half_width: Some(10.0),
            ..options()
        };
        let img = render_data_map(&rx, &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0], &options).unwrap();
        assert!(map_pixels(&img).all(|p| !bands.contains(&p)));
    }

    #[test]
    fn tiny_images_are_rejected() {
        let rx = lattice();
        let options = PlotOptions {
            size: (100, 80),
            ..options()
        };
        assert!(render_data_map(&rx, &[0.0; 6], &options).is_err());
    }
}
