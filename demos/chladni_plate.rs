//! Render a plate mode's nodal pattern as ASCII art, then scatter particles
//! and let them migrate onto the nodal lines.
//!
//! Run with: `cargo run --example chladni_plate`

use chladni::{BoundaryMode, Mode, ParticleConfig, ParticleManager, PlateConfig, PlateShape};

const COLS: usize = 56;
const ROWS: usize = 28;

fn render_field(mode: &Mode) {
    let (width, height) = mode.shape().bounds();
    // Rows print top-down
    for row in 0..ROWS {
        let y = (ROWS - row) as f64 * height / (ROWS + 1) as f64;
        let mut line = String::with_capacity(COLS);
        for col in 0..COLS {
            let x = (col as f64 + 0.5) * width / COLS as f64;
            if !mode.shape().contains(x, y) {
                line.push(' ');
            } else {
                let z = mode.displacement(x, y);
                line.push(if z.abs() < 0.08 {
                    '#'
                } else if z > 0.0 {
                    '+'
                } else {
                    '-'
                });
            }
        }
        println!("{}", line);
    }
}

fn render_particles(swarm: &ParticleManager) {
    let (width, height) = swarm.shape().bounds();
    let mut cells = [[0u32; COLS]; ROWS];
    for &[x, y] in swarm.positions() {
        let col = ((x / width * COLS as f64) as usize).min(COLS - 1);
        let row_up = ((y / height * ROWS as f64) as usize).min(ROWS - 1);
        cells[ROWS - 1 - row_up][col] += 1;
    }
    for row in &cells {
        let line: String = row
            .iter()
            .map(|&count| match count {
                0 => ' ',
                1 => '.',
                2 => 'o',
                _ => '@',
            })
            .collect();
        println!("{}", line);
    }
}

fn main() {
    let plate = PlateConfig {
        shape: PlateShape::Rectangle {
            width: 1.4,
            height: 1.0,
        },
        boundary: BoundaryMode::Fixed,
        wave_speed: 120.0,
        grid_resolution: 64,
    };
    let mode = Mode::new(&plate, 4, 3).expect("supported mode");

    println!(
        "mode (4, 3), eigenfrequency {:.1} rad/s ({:.1} Hz)",
        mode.eigenfrequency(),
        mode.eigenfrequency() / (2.0 * std::f64::consts::PI)
    );
    println!("displacement field ('#' marks nodal lines):");
    println!();
    render_field(&mode);

    let cfg = ParticleConfig {
        count: 900,
        sensitivity: 0.1,
        jitter: 0.01,
        ..ParticleConfig::default()
    };
    let mut swarm = ParticleManager::new(cfg, plate.shape, 2024).expect("valid swarm");
    for _ in 0..1200 {
        swarm.advance(1.0 / 60.0, &mode);
    }

    println!();
    println!("{} particles after 20 s of settling:", cfg.count);
    println!();
    render_particles(&swarm);

    let grid = mode.grid();
    println!();
    println!("detected {} nodal sample points", grid.nodal_points().len());
}
