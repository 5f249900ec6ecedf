//! Skew estimation over a Hough line transform.
//!
//! Angles are the orientation of a line's normal in degrees, sampled over
//! [-90, 90) in 1 degree steps. Horizontal text lines therefore peak at -90.

use image::{imageops, GrayImage, Luma};
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};

/// Lowest sampled angle in degrees.
const MIN_ANGLE: i32 = -90;

/// Number of sampled angles.
const ANGLE_STEPS: usize = 180;

/// Peaks closer than this (in distance units) to a stronger peak are suppressed.
const PEAK_MIN_DISTANCE: usize = 9;

/// Peaks closer than this (in degrees) to a stronger peak are suppressed.
const PEAK_MIN_ANGLE: usize = 10;

/// Peaks need at least this fraction of the strongest cell's votes.
const PEAK_THRESHOLD_RATIO: f32 = 0.5;

const CANNY_LOW: f32 = 20.0;
const CANNY_HIGH: f32 = 50.0;

/// Rotations smaller than this are not applied.
const MIN_ROTATION: f32 = 0.05;

/// Hough accumulator for straight lines.
#[derive(Debug, Clone)]
pub struct HoughAccumulator {
    votes: Vec<u32>,
    distances: usize,
}

impl HoughAccumulator {
    /// Accumulate votes for every non-zero pixel of an edge map.
    pub fn from_edges(edges: &GrayImage) -> Self {
        let (width, height) = edges.dimensions();
        let diagonal = ((width as f32).hypot(height as f32)).ceil();
        let distances = 2 * diagonal as usize + 1;
        let mut votes = vec![0u32; distances * ANGLE_STEPS];

        let trig: Vec<(f32, f32)> = (0..ANGLE_STEPS)
            .map(|i| {
                let theta = ((MIN_ANGLE + i as i32) as f32).to_radians();
                (theta.cos(), theta.sin())
            })
            .collect();

        for (x, y, pixel) in edges.enumerate_pixels() {
            if pixel[0] == 0 {
                continue;
            }
            for (i, (cos, sin)) in trig.iter().enumerate() {
                let rho = x as f32 * cos + y as f32 * sin;
                let bin = (rho + diagonal).round() as usize;
                votes[bin * ANGLE_STEPS + i] += 1;
            }
        }

        Self { votes, distances }
    }

    fn at(&self, distance: usize, angle: usize) -> u32 {
        self.votes[distance * ANGLE_STEPS + angle]
    }

    /// Strongest line angles in degrees, strongest first.
    ///
    /// Cells below half the maximum vote are ignored; a cell within
    /// the suppression window of an already selected peak is skipped.
    pub fn peaks(&self, max_peaks: usize) -> Vec<i32> {
        let max_votes = self.votes.iter().copied().max().unwrap_or(0);
        if max_votes == 0 {
            return Vec::new();
        }
        let threshold = (max_votes as f32 * PEAK_THRESHOLD_RATIO).ceil() as u32;

        let mut candidates = Vec::new();
        for distance in 0..self.distances {
            for angle in 0..ANGLE_STEPS {
                let votes = self.at(distance, angle);
                if votes >= threshold {
                    candidates.push((votes, distance, angle));
                }
            }
        }
        candidates.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));

        let mut selected: Vec<(usize, usize)> = Vec::new();
        for (_, distance, angle) in candidates {
            if selected.len() >= max_peaks {
                break;
            }
            let suppressed = selected.iter().any(|&(d, a)| {
                d.abs_diff(distance) <= PEAK_MIN_DISTANCE && a.abs_diff(angle) <= PEAK_MIN_ANGLE
            });
            if !suppressed {
                selected.push((distance, angle));
            }
        }

        let angles: Vec<i32> = selected
            .into_iter()
            .map(|(_, angle)| MIN_ANGLE + angle as i32)
            .collect();
        log::debug!("Hough peaks: {:?}", angles);
        angles
    }
}

/// Dominant line angles of a grayscale page.
pub fn line_angles(image: &GrayImage, sigma: f32, max_peaks: usize) -> Vec<i32> {
    let smoothed = gaussian_blur_f32(image, sigma);
    let edges = canny(&smoothed, CANNY_LOW, CANNY_HIGH);
    HoughAccumulator::from_edges(&edges).peaks(max_peaks)
}

/// Reduce Hough peak angles to one representative skew angle.
///
/// Peaks are binned by how close they sit to the 45 degree diagonals after
/// adding the mean deviation; the most populated bin wins and its most
/// frequent angle (tied angles averaged) is returned. Without any binned
/// peak the most frequent angle overall is used. `None` when there are no
/// peaks at all.
pub fn representative_angle(peaks: &[i32]) -> Option<f32> {
    if peaks.is_empty() {
        return None;
    }

    let average_deviation = peaks
        .iter()
        .map(|&ang| (45.0 - (ang as f32).abs()).abs())
        .sum::<f32>()
        / peaks.len() as f32;

    let near_diagonal = |value: f32| (44..=46).contains(&(value as i32));

    // [0..45, 45..90, 0..-45, -45..-90]
    let mut bins: [Vec<i32>; 4] = Default::default();
    for &ang in peaks {
        let a = ang as f32;
        if near_diagonal(90.0 - a + average_deviation) {
            bins[1].push(ang);
        } else if near_diagonal(a + average_deviation) {
            bins[0].push(ang);
        } else if near_diagonal(-a + average_deviation) {
            bins[2].push(ang);
        } else if near_diagonal(90.0 + a + average_deviation) {
            bins[3].push(ang);
        }
    }

    let mut winner: Option<&Vec<i32>> = None;
    for bin in &bins {
        if bin.len() > winner.map_or(0, |w| w.len()) {
            winner = Some(bin);
        }
    }

    Some(match winner {
        Some(bin) => mean_of_modes(bin),
        None => mean_of_modes(peaks),
    })
}

fn mean_of_modes(values: &[i32]) -> f32 {
    let mut counts: Vec<(i32, usize)> = Vec::new();
    for &value in values {
        match counts.iter_mut().find(|(v, _)| *v == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }
    let max_count = counts.iter().map(|&(_, c)| c).max().unwrap_or(0);
    let modes: Vec<i32> = counts
        .into_iter()
        .filter(|&(_, c)| c == max_count)
        .map(|(v, _)| v)
        .collect();
    modes.iter().sum::<i32>() as f32 / modes.len().max(1) as f32
}

/// Counter-clockwise rotation in degrees that corrects a representative angle.
pub fn rotation_for(angle: f32) -> f32 {
    if (0.0..=90.0).contains(&angle) || (-45.0..0.0).contains(&angle) {
        angle - 90.0
    } else if (-90.0..-45.0).contains(&angle) {
        90.0 + angle
    } else {
        0.0
    }
}

/// Estimate the counter-clockwise rotation that deskews a page.
///
/// Zero when no lines are found.
pub fn estimate_rotation(image: &GrayImage, sigma: f32, max_peaks: usize) -> f32 {
    let peaks = line_angles(image, sigma, max_peaks);
    match representative_angle(&peaks) {
        Some(angle) => {
            let rotation = rotation_for(angle);
            log::debug!("Skew angle {:.2}, rotation {:.2}", angle, rotation);
            rotation
        }
        None => {
            log::debug!("No lines found, skipping rotation");
            0.0
        }
    }
}

/// Rotate counter-clockwise by `degrees` onto an enlarged white canvas so no
/// content is clipped.
pub fn rotate_expanded(image: &GrayImage, degrees: f32) -> GrayImage {
    if degrees.abs() < MIN_ROTATION {
        return image.clone();
    }

    let (width, height) = image.dimensions();
    let theta = degrees.to_radians();
    let (sin, cos) = (theta.sin().abs(), theta.cos().abs());
    let rotated_width = extent(width as f32 * cos + height as f32 * sin);
    let rotated_height = extent(width as f32 * sin + height as f32 * cos);

    let canvas_width = rotated_width.max(width);
    let canvas_height = rotated_height.max(height);
    let mut canvas = GrayImage::from_pixel(canvas_width, canvas_height, Luma([255]));
    imageops::overlay(
        &mut canvas,
        image,
        ((canvas_width - width) / 2) as i64,
        ((canvas_height - height) / 2) as i64,
    );

    // rotate_about_center turns clockwise for positive angles
    let rotated = rotate_about_center(&canvas, -theta, Interpolation::Bilinear, Luma([255]));

    let left = (canvas_width - rotated_width) / 2;
    let top = (canvas_height - rotated_height) / 2;
    imageops::crop_imm(&rotated, left, top, rotated_width, rotated_height).to_image()
}

// Round up, tolerating float noise from sin/cos at right angles.
fn extent(value: f32) -> u32 {
    (value - 1e-3).ceil().max(1.0) as u32
}
