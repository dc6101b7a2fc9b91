//! Rolling ground heightfield built from layered sine waves

use serde::{Deserialize, Serialize};

/// One sine layer of the ground: `amplitude * wave(frequency * axis)`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WaveLayer {
    pub amplitude: f32,
    pub frequency: f32,
}

/// Terrain generation configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Total size of the terrain in meters
    pub size: f32,
    /// Number of subdivisions (vertices = subdivisions + 1)
    pub subdivisions: u32,
    /// Layer along X (sine)
    pub x_wave: WaveLayer,
    /// Layer along Z (cosine)
    pub z_wave: WaveLayer,
    /// Diagonal layer along X + Z (sine)
    pub diagonal_wave: WaveLayer,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            size: 100.0,
            subdivisions: 50,
            x_wave: WaveLayer {
                amplitude: 0.5,
                frequency: 0.1,
            },
            z_wave: WaveLayer {
                amplitude: 0.5,
                frequency: 0.1,
            },
            diagonal_wave: WaveLayer {
                amplitude: 0.3,
                frequency: 0.05,
            },
        }
    }
}

impl TerrainConfig {
    /// Analytic ground height at world coordinates
    pub fn wave_height(&self, x: f32, z: f32) -> f32 {
        (x * self.x_wave.frequency).sin() * self.x_wave.amplitude
            + (z * self.z_wave.frequency).cos() * self.z_wave.amplitude
            + ((x + z) * self.diagonal_wave.frequency).sin() * self.diagonal_wave.amplitude
    }
}

/// Errors that can occur while generating terrain
#[derive(Debug, Clone, thiserror::Error)]
pub enum TerrainError {
    #[error("Terrain needs at least one subdivision")]
    NoSubdivisions,

    #[error("Invalid terrain size: {0}")]
    InvalidSize(f32),
}

/// Generated terrain data
#[derive(Clone, Debug)]
pub struct Terrain {
    /// Configuration used to generate this terrain
    pub config: TerrainConfig,
    /// Height values for each vertex (row-major, size = (subdivisions+1)^2)
    pub heights: Vec<f32>,
    /// Minimum height in the terrain
    pub min_height: f32,
    /// Maximum height in the terrain
    pub max_height: f32,
}

impl Terrain {
    /// Generate terrain from configuration
    pub fn generate(config: TerrainConfig) -> Result<Self, TerrainError> {
        if config.subdivisions == 0 {
            return Err(TerrainError::NoSubdivisions);
        }
        if !(config.size > 0.0) {
            return Err(TerrainError::InvalidSize(config.size));
        }

        let vertex_count = config.subdivisions + 1;
        let total_vertices = (vertex_count * vertex_count) as usize;

        let mut heights = Vec::with_capacity(total_vertices);
        let mut min_height = f32::MAX;
        let mut max_height = f32::MIN;

        let half_size = config.size / 2.0;
        let step = config.size / config.subdivisions as f32;

        for z in 0..vertex_count {
            for x in 0..vertex_count {
                let world_x = -half_size + x as f32 * step;
                let world_z = -half_size + z as f32 * step;
                let height = config.wave_height(world_x, world_z);

                min_height = min_height.min(height);
                max_height = max_height.max(height);
                heights.push(height);
            }
        }

        Ok(Self {
            config,
            heights,
            min_height,
            max_height,
        })
    }

    /// Get the height at world coordinates (bilinear interpolation)
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        let half_size = self.config.size / 2.0;
        let step = self.config.size / self.config.subdivisions as f32;
        let vertex_count = self.config.subdivisions + 1;

        // Clamp to the grid so edge queries sample the border
        let grid_x = ((x + half_size) / step).clamp(0.0, self.config.subdivisions as f32);
        let grid_z = ((z + half_size) / step).clamp(0.0, self.config.subdivisions as f32);

        let x0 = (grid_x.floor() as u32).min(self.config.subdivisions - 1);
        let z0 = (grid_z.floor() as u32).min(self.config.subdivisions - 1);
        let x1 = x0 + 1;
        let z1 = z0 + 1;

        let fx = grid_x - x0 as f32;
        let fz = grid_z - z0 as f32;

        let h00 = self.heights[(z0 * vertex_count + x0) as usize];
        let h10 = self.heights[(z0 * vertex_count + x1) as usize];
        let h01 = self.heights[(z1 * vertex_count + x0) as usize];
        let h11 = self.heights[(z1 * vertex_count + x1) as usize];

        let h0 = h00 + (h10 - h00) * fx;
        let h1 = h01 + (h11 - h01) * fx;
        h0 + (h1 - h0) * fz
    }

    /// Check if a point is within the terrain bounds
    pub fn contains(&self, x: f32, z: f32) -> bool {
        let half_size = self.config.size / 2.0;
        x >= -half_size && x <= half_size && z >= -half_size && z <= half_size
    }
}
