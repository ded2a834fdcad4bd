//! Plate eigenmodes and nodal-line detection.
//!
//! A [`Mode`] maps a plate shape, boundary condition, and a pair of mode
//! indices `(m, n)` to an eigenfrequency and a displacement field `z(x, y)`.
//! Nodal lines (the zero locus of `z`, where particles accumulate) are
//! located approximately by sampling `z` on a grid and flagging sign changes
//! between neighboring samples; the grid resolution is configurable because
//! the fidelity of the particle-attraction behavior depends on it.
//!
//! Coordinates are plate-local: the origin sits at the lower-left corner of
//! the shape's bounding box.

use serde::{Deserialize, Serialize};

use crate::bessel::{bessel_j, bessel_zero};
use crate::error::ParameterError;

/// Largest supported index per axis for rectangular and stadium plates.
pub const MAX_RECT_INDEX: u32 = 16;
/// Largest supported angular order for circular plates.
pub const MAX_ANGULAR_ORDER: u32 = 8;
/// Largest supported radial order for circular plates.
pub const MAX_RADIAL_ORDER: u32 = 8;
/// Smallest usable nodal-sampling resolution.
pub const MIN_GRID_RESOLUTION: usize = 8;

/// Plate outline and physical dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlateShape {
    /// Axis-aligned rectangle
    Rectangle {
        /// Extent along x (m)
        width: f64,
        /// Extent along y (m)
        height: f64,
    },
    /// Circle (the classic Chladni plate)
    Circle {
        /// Radius (m)
        radius: f64,
    },
    /// Stadium outline: a rectangle of the given straight length capped by
    /// two semicircles of the given radius
    Stadium {
        /// Length of the straight section (m)
        length: f64,
        /// Cap radius, also the half-height (m)
        radius: f64,
    },
}

impl PlateShape {
    /// Validate that every dimension is finite and strictly positive.
    pub fn validate(&self) -> Result<(), ParameterError> {
        fn check(name: &'static str, value: f64) -> Result<(), ParameterError> {
            if !value.is_finite() {
                Err(ParameterError::NonFinite { name, value })
            } else if value <= 0.0 {
                Err(ParameterError::NonPositiveDimension { name, value })
            } else {
                Ok(())
            }
        }
        match *self {
            PlateShape::Rectangle { width, height } => {
                check("plate width", width)?;
                check("plate height", height)
            }
            PlateShape::Circle { radius } => check("plate radius", radius),
            PlateShape::Stadium { length, radius } => {
                check("stadium length", length)?;
                check("stadium cap radius", radius)
            }
        }
    }

    /// Bounding-box extents `(width, height)`, origin at the lower left.
    pub fn bounds(&self) -> (f64, f64) {
        match *self {
            PlateShape::Rectangle { width, height } => (width, height),
            PlateShape::Circle { radius } => (2.0 * radius, 2.0 * radius),
            PlateShape::Stadium { length, radius } => (length + 2.0 * radius, 2.0 * radius),
        }
    }

    /// Whether `(x, y)` lies inside the plate outline.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        match *self {
            PlateShape::Rectangle { width, height } => {
                x >= 0.0 && x <= width && y >= 0.0 && y <= height
            }
            PlateShape::Circle { radius } => {
                let dx = x - radius;
                let dy = y - radius;
                dx * dx + dy * dy <= radius * radius
            }
            PlateShape::Stadium { length, radius } => {
                if y < 0.0 || y > 2.0 * radius {
                    return false;
                }
                if x >= radius && x <= radius + length {
                    return true;
                }
                // Cap centers at (radius, radius) and (radius + length, radius)
                let cap_x = if x < radius { radius } else { radius + length };
                let dx = x - cap_x;
                let dy = y - radius;
                dx * dx + dy * dy <= radius * radius
            }
        }
    }
}

/// Edge condition of the plate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryMode {
    /// Clamped edge: displacement vanishes on the boundary
    Fixed,
    /// Free edge: displacement anti-nodes on the boundary
    Free,
}

/// Everything the control layer supplies to describe the plate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlateConfig {
    /// Plate outline and dimensions
    pub shape: PlateShape,
    /// Edge condition
    pub boundary: BoundaryMode,
    /// Transverse wave speed of the plate material (m/s); scales every
    /// eigenfrequency linearly
    pub wave_speed: f64,
    /// Samples per axis for nodal-line detection grids
    pub grid_resolution: usize,
}

impl Default for PlateConfig {
    fn default() -> Self {
        Self {
            shape: PlateShape::Rectangle {
                width: 1.0,
                height: 1.0,
            },
            boundary: BoundaryMode::Fixed,
            wave_speed: 1.0,
            grid_resolution: 64,
        }
    }
}

impl PlateConfig {
    /// Validate the shape, wave speed, and grid resolution.
    pub fn validate(&self) -> Result<(), ParameterError> {
        self.shape.validate()?;
        if !self.wave_speed.is_finite() {
            return Err(ParameterError::NonFinite {
                name: "wave speed",
                value: self.wave_speed,
            });
        }
        if self.wave_speed <= 0.0 {
            return Err(ParameterError::NonPositiveDimension {
                name: "wave speed",
                value: self.wave_speed,
            });
        }
        if self.grid_resolution < MIN_GRID_RESOLUTION {
            return Err(ParameterError::GridTooCoarse {
                resolution: self.grid_resolution,
            });
        }
        Ok(())
    }
}

/// A validated plate eigenmode: indices, eigenfrequency, and the
/// displacement field `z(x, y)`.
///
/// Immutable once constructed; selecting different indices or geometry
/// builds a new `Mode`.
#[derive(Debug, Clone)]
pub struct Mode {
    shape: PlateShape,
    boundary: BoundaryMode,
    m: u32,
    n: u32,
    wave_speed: f64,
    grid_resolution: usize,
    /// `j_{m,n}` for circular plates, 0 otherwise
    bessel_zero: f64,
}

impl Mode {
    /// Build mode `(m, n)` for the given plate.
    ///
    /// Index conventions: rectangle/stadium use half-wave counts per axis
    /// (`>= 1` clamped, `>= 0` free, not both zero); circle uses
    /// `m` = angular order (diametral node count) and `n` = radial order
    /// (`>= 1`). Free circular edges are unsupported.
    pub fn new(config: &PlateConfig, m: u32, n: u32) -> Result<Self, ParameterError> {
        config.validate()?;

        let mut zero = 0.0;
        match config.shape {
            PlateShape::Rectangle { .. } | PlateShape::Stadium { .. } => match config.boundary {
                BoundaryMode::Fixed => {
                    if m == 0 || n == 0 || m > MAX_RECT_INDEX || n > MAX_RECT_INDEX {
                        return Err(ParameterError::UnsupportedMode {
                            m,
                            n,
                            reason: "clamped rectangular indices must lie in 1..=16",
                        });
                    }
                }
                BoundaryMode::Free => {
                    if m > MAX_RECT_INDEX || n > MAX_RECT_INDEX {
                        return Err(ParameterError::UnsupportedMode {
                            m,
                            n,
                            reason: "free rectangular indices must lie in 0..=16",
                        });
                    }
                    if m == 0 && n == 0 {
                        return Err(ParameterError::UnsupportedMode {
                            m,
                            n,
                            reason: "mode (0, 0) is rigid-body motion",
                        });
                    }
                }
            },
            PlateShape::Circle { .. } => {
                if config.boundary == BoundaryMode::Free {
                    return Err(ParameterError::UnsupportedMode {
                        m,
                        n,
                        reason: "free boundary is unsupported for circular plates",
                    });
                }
                if m > MAX_ANGULAR_ORDER || n == 0 || n > MAX_RADIAL_ORDER {
                    return Err(ParameterError::UnsupportedMode {
                        m,
                        n,
                        reason: "circular indices: angular order 0..=8, radial order 1..=8",
                    });
                }
                zero = bessel_zero(m, n);
            }
        }

        Ok(Self {
            shape: config.shape,
            boundary: config.boundary,
            m,
            n,
            wave_speed: config.wave_speed,
            grid_resolution: config.grid_resolution,
            bessel_zero: zero,
        })
    }

    /// Mode indices `(m, n)`.
    pub fn indices(&self) -> (u32, u32) {
        (self.m, self.n)
    }

    /// Plate outline this mode belongs to.
    pub fn shape(&self) -> &PlateShape {
        &self.shape
    }

    /// Edge condition this mode was built for.
    pub fn boundary(&self) -> BoundaryMode {
        self.boundary
    }

    /// Configured nodal-sampling resolution.
    pub fn grid_resolution(&self) -> usize {
        self.grid_resolution
    }

    /// Eigenfrequency of this mode (rad/s).
    ///
    /// Rectangle/stadium: `v·π·sqrt((m/Lx)² + (n/Ly)²)` over the bounding
    /// box. Circle: `v·j_{m,n}/R`. The stadium value is the bounding-box
    /// approximation; its true eigenproblem has no closed form.
    pub fn eigenfrequency(&self) -> f64 {
        match self.shape {
            PlateShape::Rectangle { .. } | PlateShape::Stadium { .. } => {
                let (lx, ly) = self.shape.bounds();
                let kx = self.m as f64 / lx;
                let ky = self.n as f64 / ly;
                self.wave_speed * std::f64::consts::PI * (kx * kx + ky * ky).sqrt()
            }
            PlateShape::Circle { radius } => self.wave_speed * self.bessel_zero / radius,
        }
    }

    /// Displacement `z(x, y)`, zero outside the plate outline.
    pub fn displacement(&self, x: f64, y: f64) -> f64 {
        if !self.shape.contains(x, y) {
            return 0.0;
        }
        match self.shape {
            PlateShape::Rectangle { .. } | PlateShape::Stadium { .. } => {
                let (lx, ly) = self.shape.bounds();
                let ax = self.m as f64 * std::f64::consts::PI * x / lx;
                let ay = self.n as f64 * std::f64::consts::PI * y / ly;
                match self.boundary {
                    BoundaryMode::Fixed => ax.sin() * ay.sin(),
                    BoundaryMode::Free => ax.cos() * ay.cos(),
                }
            }
            PlateShape::Circle { radius } => {
                let dx = x - radius;
                let dy = y - radius;
                let r = (dx * dx + dy * dy).sqrt();
                let radial = bessel_j(self.m, self.bessel_zero * r / radius);
                if self.m == 0 {
                    radial
                } else {
                    radial * (self.m as f64 * dy.atan2(dx)).cos()
                }
            }
        }
    }

    /// Sample the field at the configured resolution.
    pub fn grid(&self) -> FieldGrid {
        self.grid_with(self.grid_resolution)
    }

    /// Sample the field on a `resolution × resolution` grid of cell centers
    /// over the bounding box.
    ///
    /// Resolutions below [`MIN_GRID_RESOLUTION`] are clamped up to it, so
    /// the returned grid always has enough samples for sign-change
    /// detection.
    pub fn grid_with(&self, resolution: usize) -> FieldGrid {
        let (width, height) = self.shape.bounds();
        let nx = resolution.max(MIN_GRID_RESOLUTION);
        let ny = nx;
        let mut values = Vec::with_capacity(nx * ny);
        for iy in 0..ny {
            let y = (iy as f64 + 0.5) * height / ny as f64;
            for ix in 0..nx {
                let x = (ix as f64 + 0.5) * width / nx as f64;
                values.push(self.displacement(x, y));
            }
        }
        FieldGrid {
            nx,
            ny,
            width,
            height,
            values,
        }
    }
}

/// Displacement samples on a regular grid of cell centers, with sign-change
/// nodal detection.
///
/// Sampling at cell centers (never on the bounding-box edge) keeps clamped
/// boundary zeros out of the sample set, so sign changes mark interior
/// nodal lines only.
#[derive(Debug, Clone)]
pub struct FieldGrid {
    nx: usize,
    ny: usize,
    width: f64,
    height: f64,
    /// Row-major, `ny` rows of `nx` samples
    values: Vec<f64>,
}

impl FieldGrid {
    /// Samples per row.
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Number of rows.
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Sampled displacement at cell `(ix, iy)`.
    pub fn value(&self, ix: usize, iy: usize) -> f64 {
        self.values[iy * self.nx + ix]
    }

    /// World coordinates of the cell center `(ix, iy)`.
    pub fn cell_center(&self, ix: usize, iy: usize) -> [f64; 2] {
        [
            (ix as f64 + 0.5) * self.width / self.nx as f64,
            (iy as f64 + 0.5) * self.height / self.ny as f64,
        ]
    }

    /// Count sign changes between horizontal neighbors in row `iy`.
    ///
    /// For a clamped rectangular mode `(m, n)` any row off the nodal lines
    /// counts exactly `m − 1` changes.
    pub fn sign_changes_in_row(&self, iy: usize) -> usize {
        (0..self.nx - 1)
            .filter(|&ix| self.value(ix, iy) * self.value(ix + 1, iy) < 0.0)
            .count()
    }

    /// Count sign changes between vertical neighbors in column `ix`.
    pub fn sign_changes_in_column(&self, ix: usize) -> usize {
        (0..self.ny - 1)
            .filter(|&iy| self.value(ix, iy) * self.value(ix, iy + 1) < 0.0)
            .count()
    }

    /// Approximate nodal-line point cloud: midpoints of every neighboring
    /// sample pair whose values straddle zero.
    pub fn nodal_points(&self) -> Vec<[f64; 2]> {
        let mut points = Vec::new();
        for iy in 0..self.ny {
            for ix in 0..self.nx {
                let v = self.value(ix, iy);
                if ix + 1 < self.nx && v * self.value(ix + 1, iy) < 0.0 {
                    let a = self.cell_center(ix, iy);
                    let b = self.cell_center(ix + 1, iy);
                    points.push([0.5 * (a[0] + b[0]), a[1]]);
                }
                if iy + 1 < self.ny && v * self.value(ix, iy + 1) < 0.0 {
                    let a = self.cell_center(ix, iy);
                    let b = self.cell_center(ix, iy + 1);
                    points.push([a[0], 0.5 * (a[1] + b[1])]);
                }
            }
        }
        points
    }

    /// Distance from `(x, y)` to the nearest detected nodal point, or
    /// `None` when the mode has no interior nodal line (e.g. the clamped
    /// fundamental).
    pub fn nearest_nodal_distance(&self, x: f64, y: f64) -> Option<f64> {
        let mut best: Option<f64> = None;
        for p in self.nodal_points() {
            let d2 = (p[0] - x) * (p[0] - x) + (p[1] - y) * (p[1] - y);
            best = Some(match best {
                Some(b) if b <= d2 => b,
                _ => d2,
            });
        }
        best.map(f64::sqrt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_config(boundary: BoundaryMode) -> PlateConfig {
        PlateConfig {
            shape: PlateShape::Rectangle {
                width: 1.0,
                height: 1.0,
            },
            boundary,
            wave_speed: 1.0,
            grid_resolution: 64,
        }
    }

    fn circle_config() -> PlateConfig {
        PlateConfig {
            shape: PlateShape::Circle { radius: 1.0 },
            boundary: BoundaryMode::Fixed,
            wave_speed: 1.0,
            grid_resolution: 64,
        }
    }

    #[test]
    fn construction_validates_indices() {
        let cfg = rect_config(BoundaryMode::Fixed);
        assert!(Mode::new(&cfg, 0, 1).is_err());
        assert!(Mode::new(&cfg, 1, 17).is_err());
        assert!(Mode::new(&cfg, 1, 1).is_ok());

        let free = rect_config(BoundaryMode::Free);
        assert!(Mode::new(&free, 0, 0).is_err());
        assert!(Mode::new(&free, 0, 1).is_ok());

        let circ = circle_config();
        assert!(Mode::new(&circ, 9, 1).is_err());
        assert!(Mode::new(&circ, 0, 0).is_err());
        assert!(Mode::new(&circ, 2, 1).is_ok());

        let free_circle = PlateConfig {
            boundary: BoundaryMode::Free,
            ..circle_config()
        };
        assert!(Mode::new(&free_circle, 0, 1).is_err());
    }

    #[test]
    fn construction_validates_geometry() {
        let cfg = PlateConfig {
            shape: PlateShape::Rectangle {
                width: -1.0,
                height: 1.0,
            },
            ..rect_config(BoundaryMode::Fixed)
        };
        assert!(matches!(
            Mode::new(&cfg, 1, 1),
            Err(ParameterError::NonPositiveDimension { .. })
        ));

        let coarse = PlateConfig {
            grid_resolution: 4,
            ..rect_config(BoundaryMode::Fixed)
        };
        assert!(matches!(
            Mode::new(&coarse, 1, 1),
            Err(ParameterError::GridTooCoarse { .. })
        ));
    }

    #[test]
    fn clamped_rectangle_nodal_line_counts() {
        // Mode (m, n) has m-1 interior nodal lines across x and n-1 across y
        for &(m, n) in &[(1u32, 1u32), (2, 1), (3, 2), (4, 4), (5, 3)] {
            let mode = Mode::new(&rect_config(BoundaryMode::Fixed), m, n).unwrap();
            let grid = mode.grid();
            for iy in [0, 17, 40] {
                assert_eq!(
                    grid.sign_changes_in_row(iy),
                    (m - 1) as usize,
                    "mode ({}, {}), row {}",
                    m,
                    n,
                    iy
                );
            }
            for ix in [3, 29, 60] {
                assert_eq!(
                    grid.sign_changes_in_column(ix),
                    (n - 1) as usize,
                    "mode ({}, {}), column {}",
                    m,
                    n,
                    ix
                );
            }
        }
    }

    #[test]
    fn clamped_field_vanishes_on_boundary_and_outside() {
        let mode = Mode::new(&rect_config(BoundaryMode::Fixed), 2, 3).unwrap();
        assert_eq!(mode.displacement(0.0, 0.4), 0.0);
        assert!(mode.displacement(1.0, 0.4).abs() < 1e-15);
        assert_eq!(mode.displacement(-0.1, 0.5), 0.0);
        assert_eq!(mode.displacement(0.5, 1.7), 0.0);
    }

    #[test]
    fn free_rectangle_antinodes_at_corners() {
        let mode = Mode::new(&rect_config(BoundaryMode::Free), 2, 2).unwrap();
        assert!((mode.displacement(0.0, 0.0) - 1.0).abs() < 1e-12);
        assert!((mode.displacement(1.0, 1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rectangle_eigenfrequencies_increase_with_indices() {
        let cfg = rect_config(BoundaryMode::Fixed);
        let f11 = Mode::new(&cfg, 1, 1).unwrap().eigenfrequency();
        let f21 = Mode::new(&cfg, 2, 1).unwrap().eigenfrequency();
        let f22 = Mode::new(&cfg, 2, 2).unwrap().eigenfrequency();
        assert!(f11 < f21 && f21 < f22);
        // Unit square fundamental: ω = π·sqrt(2)
        assert!((f11 - std::f64::consts::PI * 2.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn circle_fundamental_has_no_interior_node() {
        let mode = Mode::new(&circle_config(), 0, 1).unwrap();
        let grid = mode.grid();
        assert!(grid.nodal_points().is_empty());
        // Eigenfrequency is v·j01/R
        assert!((mode.eigenfrequency() - 2.404_825_557_695_773).abs() < 1e-9);
    }

    #[test]
    fn circle_second_radial_mode_has_one_nodal_ring() {
        let mode = Mode::new(&circle_config(), 0, 2).unwrap();
        let grid = mode.grid();
        // The central row crosses the single nodal circle twice
        assert_eq!(grid.sign_changes_in_row(32), 2);
        assert!(!grid.nodal_points().is_empty());
    }

    #[test]
    fn circle_angular_mode_has_diametral_lines() {
        // m = 2: displacement ∝ cos(2θ), four sign changes around a ring.
        // Walk the row through the center: cos(2θ) flips sign across the
        // vertical diametral lines at θ = ±π/4, so the central row sees the
        // radial zero structure of J_2 only, plus those diametral crossings.
        let mode = Mode::new(&circle_config(), 2, 1).unwrap();
        let above = mode.displacement(1.0 + 0.5, 1.0 + 0.5); // θ = π/4: node
        assert!(above.abs() < 1e-12, "diametral node missed: {}", above);
        let right = mode.displacement(1.7, 1.0); // θ = 0: antinodal direction
        assert!(right.abs() > 1e-3);
    }

    #[test]
    fn stadium_masks_field_outside_outline() {
        let cfg = PlateConfig {
            shape: PlateShape::Stadium {
                length: 1.0,
                radius: 0.5,
            },
            boundary: BoundaryMode::Fixed,
            wave_speed: 1.0,
            grid_resolution: 64,
        };
        let mode = Mode::new(&cfg, 3, 2).unwrap();
        // Bounding box is 2.0 x 1.0; its corners fall outside the caps
        assert_eq!(mode.displacement(0.01, 0.01), 0.0);
        assert_eq!(mode.displacement(1.99, 0.99), 0.0);
        // Center of the straight section is inside
        assert!(mode.displacement(1.0, 0.3).abs() > 0.0);
    }

    #[test]
    fn wave_speed_scales_eigenfrequency_linearly() {
        let slow = rect_config(BoundaryMode::Fixed);
        let fast = PlateConfig {
            wave_speed: 3.0,
            ..slow
        };
        let f1 = Mode::new(&slow, 2, 3).unwrap().eigenfrequency();
        let f3 = Mode::new(&fast, 2, 3).unwrap().eigenfrequency();
        assert!((f3 - 3.0 * f1).abs() < 1e-12);
    }

    #[test]
    fn grid_with_clamps_coarse_resolutions() {
        let mode = Mode::new(&rect_config(BoundaryMode::Fixed), 2, 1).unwrap();
        for resolution in [0, 1, 7] {
            let grid = mode.grid_with(resolution);
            assert_eq!(grid.nx(), MIN_GRID_RESOLUTION);
            assert_eq!(grid.ny(), MIN_GRID_RESOLUTION);
            // Sign-change scans stay well-defined on the clamped grid
            assert_eq!(grid.sign_changes_in_row(0), 1);
            assert_eq!(grid.sign_changes_in_column(0), 0);
        }
    }

    #[test]
    fn nearest_nodal_distance_matches_analytic_lines() {
        // Mode (2, 1) on the unit square: single interior nodal line x = 1/2
        let mode = Mode::new(&rect_config(BoundaryMode::Fixed), 2, 1).unwrap();
        let grid = mode.grid();
        let d = grid.nearest_nodal_distance(0.25, 0.5).unwrap();
        assert!((d - 0.25).abs() < 0.02, "distance {} != 0.25", d);
    }
}
