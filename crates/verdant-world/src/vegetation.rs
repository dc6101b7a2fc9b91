//! Instanced vegetation field
//!
//! Thousands of grass/shrub instances share one mesh and material and differ
//! only by transform and color. Instances live in parallel buffers addressed
//! by index; a tick walks the buffers once and applies three independent
//! effects:
//!
//! - wind sway, a pure function of elapsed time and the instance position
//! - growth while the player is within the healing radius (never shrinks)
//! - a brighten-only lightness shift toward a glow value that is stronger the
//!   closer the player stands

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;
use verdant_core::{Hsl, Transform};

/// Vegetation placement and growth configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct VegetationConfig {
    /// Number of instances in the field
    pub instance_count: usize,
    /// Instances generated around each cluster center
    pub cluster_size: usize,
    /// Half-size of the square area cluster centers are placed in
    pub field_extent: f32,
    /// Maximum offset of an instance from its cluster center
    pub cluster_radius: f32,
    /// Smallest initial height scale (also the smallest floor)
    pub min_initial_height: f32,
    /// Largest initial height scale
    pub max_initial_height: f32,
    /// Height scale instances never grow past
    pub height_cap: f32,
    /// Largest random lean on the X and Z axes, in radians
    pub max_tilt: f32,
    /// Distance from the player within which instances grow and glow
    pub healing_radius: f32,
    /// Height scale gained per tick inside the healing radius
    pub growth_rate: f32,
    /// Growth multiplier while the player meditates
    pub meditation_growth_multiplier: f32,
    /// Peak wind rotation in radians
    pub sway_amplitude: f32,
    /// Wind phase speed in radians per second
    pub sway_frequency: f32,
    /// Hue band (0-1) instances are colored from
    pub hue_range: [f32; 2],
    /// Saturation band
    pub saturation_range: [f32; 2],
    /// Lightness band
    pub lightness_range: [f32; 2],
    /// Lightness reached by an instance right under the player
    pub glow_lightness: f32,
    /// Fraction of the remaining distance to the glow target covered per tick
    pub glow_rate: f32,
    /// RNG seed for placement
    pub seed: u64,
}

impl Default for VegetationConfig {
    fn default() -> Self {
        Self {
            instance_count: 10_000,
            cluster_size: 100,
            field_extent: 45.0,
            cluster_radius: 4.0,
            min_initial_height: 0.4,
            max_initial_height: 0.8,
            height_cap: 1.6,
            max_tilt: 0.15,
            healing_radius: 5.0,
            growth_rate: 0.002,
            meditation_growth_multiplier: 2.0,
            sway_amplitude: 0.1,
            sway_frequency: 1.0,
            hue_range: [0.25, 0.36],
            saturation_range: [0.45, 0.7],
            lightness_range: [0.25, 0.4],
            glow_lightness: 0.65,
            glow_rate: 0.1,
            seed: 0x5eed,
        }
    }
}

impl VegetationConfig {
    fn validate(&self) -> Result<(), VegetationError> {
        if self.cluster_size == 0 {
            return Err(VegetationError::EmptyClusters);
        }
        if !(self.min_initial_height >= 0.0 && self.min_initial_height <= self.max_initial_height)
        {
            return Err(VegetationError::InvalidRange {
                name: "initial height",
                min: self.min_initial_height,
                max: self.max_initial_height,
            });
        }
        if !(self.height_cap >= self.max_initial_height) {
            return Err(VegetationError::CapBelowInitialHeight {
                cap: self.height_cap,
                max_initial: self.max_initial_height,
            });
        }
        if !(self.field_extent >= 0.0) {
            return Err(VegetationError::InvalidRange {
                name: "field extent",
                min: -self.field_extent,
                max: self.field_extent,
            });
        }
        if !(self.healing_radius > 0.0) {
            return Err(VegetationError::InvalidRadius(self.healing_radius));
        }

        let bands = [
            ("cluster radius", [0.0, self.cluster_radius]),
            ("tilt", [-self.max_tilt, self.max_tilt]),
            ("hue", self.hue_range),
            ("saturation", self.saturation_range),
            ("lightness", self.lightness_range),
        ];
        for (name, [min, max]) in bands {
            if !(min <= max) {
                return Err(VegetationError::InvalidRange { name, min, max });
            }
        }
        Ok(())
    }
}

/// Errors that can occur while generating a vegetation field
#[derive(Debug, Clone, thiserror::Error)]
pub enum VegetationError {
    #[error("Cluster size must be at least one instance")]
    EmptyClusters,

    #[error("Invalid {name} range: {min}..{max}")]
    InvalidRange {
        name: &'static str,
        min: f32,
        max: f32,
    },

    #[error("Height cap {cap} is below the largest initial height {max_initial}")]
    CapBelowInitialHeight { cap: f32, max_initial: f32 },

    #[error("Invalid healing radius: {0}")]
    InvalidRadius(f32),
}

/// Counts from one vegetation tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VegetationTick {
    /// Instances whose height increased
    pub grown: usize,
    /// Instances whose lightness increased
    pub brightened: usize,
}

/// Read-only view of one instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VegetationInstance {
    pub index: usize,
    pub position: Vec3,
    pub rotation: Vec3,
    pub height: f32,
    pub color: Hsl,
}

/// Structure-of-arrays store of every vegetation instance
#[derive(Clone, Debug)]
pub struct VegetationField {
    pub config: VegetationConfig,
    positions: Vec<Vec3>,
    /// Random lean and facing chosen at generation, in XYZ euler radians
    tilts: Vec<Vec3>,
    /// Tilt plus the current wind sway
    rotations: Vec<Vec3>,
    heights: Vec<f32>,
    height_floors: Vec<f32>,
    base_colors: Vec<Hsl>,
    colors: Vec<Hsl>,
}

impl VegetationField {
    /// Field with no instances; call [`Self::populate`] to fill it
    pub fn empty(config: VegetationConfig) -> Self {
        Self {
            config,
            positions: Vec::new(),
            tilts: Vec::new(),
            rotations: Vec::new(),
            heights: Vec::new(),
            height_floors: Vec::new(),
            base_colors: Vec::new(),
            colors: Vec::new(),
        }
    }

    /// Generate a clustered field, sampling ground height with `height_fn(x, z)`
    pub fn generate(
        config: VegetationConfig,
        height_fn: impl Fn(f32, f32) -> f32,
    ) -> Result<Self, VegetationError> {
        let mut field = Self::empty(config);
        field.populate(height_fn)?;
        Ok(field)
    }

    /// Replace every instance with a freshly generated clustered layout.
    ///
    /// Returns the instance count. On error the field is left unchanged.
    pub fn populate(
        &mut self,
        height_fn: impl Fn(f32, f32) -> f32,
    ) -> Result<usize, VegetationError> {
        self.config.validate()?;

        let count = self.config.instance_count;
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        self.clear_buffers(count);

        let extent = self.config.field_extent;
        let cluster_size = self.config.cluster_size;
        let cluster_count = count.div_ceil(cluster_size);

        for cluster in 0..cluster_count {
            let center = Vec2::new(
                rng.gen_range(-extent..=extent),
                rng.gen_range(-extent..=extent),
            );
            let in_cluster = cluster_size.min(count - cluster * cluster_size);

            for _ in 0..in_cluster {
                self.push_instance(&mut rng, center, &height_fn);
            }
        }

        debug!(
            instances = self.len(),
            clusters = cluster_count,
            "Generated vegetation field"
        );

        Ok(self.len())
    }

    fn clear_buffers(&mut self, capacity: usize) {
        *self = Self {
            config: self.config.clone(),
            positions: Vec::with_capacity(capacity),
            tilts: Vec::with_capacity(capacity),
            rotations: Vec::with_capacity(capacity),
            heights: Vec::with_capacity(capacity),
            height_floors: Vec::with_capacity(capacity),
            base_colors: Vec::with_capacity(capacity),
            colors: Vec::with_capacity(capacity),
        };
    }

    fn push_instance(
        &mut self,
        rng: &mut StdRng,
        center: Vec2,
        height_fn: &impl Fn(f32, f32) -> f32,
    ) {
        let config = &self.config;
        let extent = config.field_extent;

        let angle = rng.gen_range(0.0..TAU);
        let radius = rng.gen_range(0.0..=config.cluster_radius);
        let x = (center.x + angle.cos() * radius).clamp(-extent, extent);
        let z = (center.y + angle.sin() * radius).clamp(-extent, extent);
        let position = Vec3::new(x, height_fn(x, z), z);

        let tilt = Vec3::new(
            rng.gen_range(-config.max_tilt..=config.max_tilt),
            rng.gen_range(0.0..TAU),
            rng.gen_range(-config.max_tilt..=config.max_tilt),
        );
        let height = rng.gen_range(config.min_initial_height..=config.max_initial_height);
        let color = Hsl::new(
            rng.gen_range(config.hue_range[0]..=config.hue_range[1]),
            rng.gen_range(config.saturation_range[0]..=config.saturation_range[1]),
            rng.gen_range(config.lightness_range[0]..=config.lightness_range[1]),
        );

        self.positions.push(position);
        self.tilts.push(tilt);
        self.rotations.push(tilt);
        self.heights.push(height);
        self.height_floors.push(height);
        self.base_colors.push(color);
        self.colors.push(color);
    }

    /// Number of instances
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Wind rotation offset for an instance at `position` after `elapsed` seconds
    pub fn sway_offset(&self, elapsed: f32, position: Vec3) -> Vec3 {
        let phase = elapsed * self.config.sway_frequency;
        let amplitude = self.config.sway_amplitude;
        Vec3::new(
            (phase + position.x).sin() * amplitude,
            0.0,
            (phase + position.z).cos() * amplitude,
        )
    }

    /// Advance every instance by one tick
    pub fn tick(&mut self, elapsed: f32, player: Vec3, meditating: bool) -> VegetationTick {
        let radius = self.config.healing_radius;
        let radius_sq = radius * radius;
        let cap = self.config.height_cap;
        let glow = self.config.glow_lightness;
        let glow_rate = self.config.glow_rate.clamp(0.0, 1.0);
        let growth = if meditating {
            self.config.growth_rate * self.config.meditation_growth_multiplier
        } else {
            self.config.growth_rate
        };
        let phase = elapsed * self.config.sway_frequency;
        let amplitude = self.config.sway_amplitude;

        let mut result = VegetationTick::default();

        for i in 0..self.positions.len() {
            let position = self.positions[i];

            self.rotations[i] = self.tilts[i]
                + Vec3::new(
                    (phase + position.x).sin() * amplitude,
                    0.0,
                    (phase + position.z).cos() * amplitude,
                );

            let dx = position.x - player.x;
            let dz = position.z - player.z;
            let distance_sq = dx * dx + dz * dz;
            if distance_sq >= radius_sq {
                continue;
            }

            let height = self.heights[i];
            let grown = (height + growth).min(cap).max(height);
            if grown > height {
                self.heights[i] = grown;
                result.grown += 1;
            }

            let proximity = 1.0 - distance_sq.sqrt() / radius;
            let base = self.base_colors[i].l;
            let target = base + (glow - base) * proximity;
            let current = self.colors[i].l;
            if target > current {
                self.colors[i].l = current + (target - current) * glow_rate;
                result.brightened += 1;
            }
        }

        result
    }

    /// Read-only view of one instance
    pub fn instance(&self, index: usize) -> Option<VegetationInstance> {
        Some(VegetationInstance {
            index,
            position: *self.positions.get(index)?,
            rotation: *self.rotations.get(index)?,
            height: *self.heights.get(index)?,
            color: *self.colors.get(index)?,
        })
    }

    /// Transform handed to the renderer for one instance
    pub fn instance_transform(&self, index: usize) -> Option<Transform> {
        let instance = self.instance(index)?;
        Some(Transform::from_euler(
            instance.position,
            instance.rotation,
            Vec3::new(1.0, instance.height, 1.0),
        ))
    }

    /// Height floor of one instance (its initial height)
    pub fn height_floor(&self, index: usize) -> Option<f32> {
        self.height_floors.get(index).copied()
    }

    /// Color the instance was generated with
    pub fn base_color(&self, index: usize) -> Option<Hsl> {
        self.base_colors.get(index).copied()
    }

    /// Number of instances within `radius` of `center` on the ground plane
    pub fn count_within(&self, center: Vec3, radius: f32) -> usize {
        let radius_sq = radius * radius;
        self.positions
            .iter()
            .filter(|p| Vec2::new(p.x - center.x, p.z - center.z).length_squared() < radius_sq)
            .count()
    }

    /// Mean height scale across the field
    pub fn average_height(&self) -> f32 {
        if self.heights.is_empty() {
            return 0.0;
        }
        self.heights.iter().sum::<f32>() / self.heights.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> VegetationConfig {
        VegetationConfig {
            instance_count: 250,
            cluster_size: 100,
            field_extent: 40.0,
            ..Default::default()
        }
    }

    fn flat(_x: f32, _z: f32) -> f32 {
        0.0
    }

    /// A ground position at least `min_distance` from every instance
    fn empty_spot(field: &VegetationField, min_distance: f32) -> Vec3 {
        for step in 0..1000 {
            let candidate = Vec3::new(-200.0 + step as f32, 0.0, 300.0);
            if field.count_within(candidate, min_distance) == 0 {
                return candidate;
            }
        }
        panic!("no empty spot found");
    }

    #[test]
    fn test_generation_respects_config() {
        let config = small_config();
        let field = VegetationField::generate(config.clone(), |x, z| x * 0.01 + z * 0.01).unwrap();
        assert_eq!(field.len(), 250);

        for i in 0..field.len() {
            let instance = field.instance(i).unwrap();
            assert!(instance.position.x.abs() <= config.field_extent);
            assert!(instance.position.z.abs() <= config.field_extent);
            assert!((instance.position.y - (instance.position.x + instance.position.z) * 0.01).abs() < 1e-5);
            assert!(instance.height >= config.min_initial_height);
            assert!(instance.height <= config.max_initial_height);
            assert!(instance.color.h >= config.hue_range[0] && instance.color.h <= config.hue_range[1]);
            assert!(instance.color.l >= config.lightness_range[0] && instance.color.l <= config.lightness_range[1]);
            assert_eq!(field.height_floor(i), Some(instance.height));
        }
        assert!(field.instance(250).is_none());
    }

    #[test]
    fn test_instances_are_clustered() {
        let config = small_config();
        let field = VegetationField::generate(config.clone(), flat).unwrap();

        // Instances 0..100 share one cluster center, so no two are further
        // apart than the cluster diameter
        let max_span = config.cluster_radius * 2.0 + 1e-3;
        for a in 0..100 {
            for b in (a + 1)..100 {
                let pa = field.instance(a).unwrap().position;
                let pb = field.instance(b).unwrap().position;
                assert!(pa.distance(pb) <= max_span);
            }
        }
    }

    #[test]
    fn test_generation_is_seeded() {
        let a = VegetationField::generate(small_config(), flat).unwrap();
        let b = VegetationField::generate(small_config(), flat).unwrap();
        for i in 0..a.len() {
            assert_eq!(a.instance(i), b.instance(i));
        }
    }

    #[test]
    fn test_distant_instances_never_change() {
        let mut field = VegetationField::generate(small_config(), flat).unwrap();
        let player = empty_spot(&field, field.config.healing_radius);
        let before: Vec<_> = (0..field.len()).map(|i| field.instance(i).unwrap()).collect();

        for tick in 0..500 {
            field.tick(tick as f32 * 0.016, player, tick % 2 == 0);
        }

        let mut rotation_changed = false;
        for (i, original) in before.iter().enumerate() {
            let now = field.instance(i).unwrap();
            assert_eq!(now.height, original.height);
            assert_eq!(now.color, original.color);
            assert_eq!(field.base_color(i), Some(original.color));
            rotation_changed |= now.rotation != original.rotation;
        }
        assert!(rotation_changed);
    }

    #[test]
    fn test_static_tick_is_idempotent() {
        let mut field = VegetationField::generate(small_config(), flat).unwrap();
        let player = empty_spot(&field, field.config.healing_radius);

        field.tick(3.0, player, false);
        let first: Vec<_> = (0..field.len()).map(|i| field.instance_transform(i).unwrap()).collect();
        field.tick(3.0, player, false);
        field.tick(3.0, player, false);
        let again: Vec<_> = (0..field.len()).map(|i| field.instance_transform(i).unwrap()).collect();

        assert_eq!(first, again);
    }

    #[test]
    fn test_sway_is_pure() {
        let field = VegetationField::generate(small_config(), flat).unwrap();
        let position = Vec3::new(3.0, 0.0, -2.0);

        assert_eq!(field.sway_offset(1.5, position), field.sway_offset(1.5, position));
        assert_ne!(field.sway_offset(1.5, position), field.sway_offset(2.5, position));
        assert_ne!(
            field.sway_offset(1.5, position),
            field.sway_offset(1.5, Vec3::new(4.0, 0.0, -2.0))
        );
        assert!(field.sway_offset(9.0, position).length() <= field.config.sway_amplitude * 2f32.sqrt() + 1e-6);
    }

    #[test]
    fn test_growth_near_player_and_cap() {
        let mut field = VegetationField::generate(small_config(), flat).unwrap();
        let target = field.instance(0).unwrap();
        let rate = field.config.growth_rate;

        let stats = field.tick(0.0, target.position, false);
        assert!(stats.grown >= 1);
        let after_one = field.instance(0).unwrap().height;
        assert!((after_one - (target.height + rate)).abs() < 1e-6);

        field.tick(0.0, target.position, true);
        let after_meditation = field.instance(0).unwrap().height;
        assert!((after_meditation - (after_one + rate * 2.0)).abs() < 1e-6);

        for _ in 0..2000 {
            field.tick(0.0, target.position, true);
        }
        assert_eq!(field.instance(0).unwrap().height, field.config.height_cap);
        for i in 0..field.len() {
            assert!(field.instance(i).unwrap().height <= field.config.height_cap);
            assert!(field.instance(i).unwrap().height >= field.height_floor(i).unwrap());
        }
    }

    #[test]
    fn test_closer_instances_glow_more() {
        let config = VegetationConfig {
            instance_count: 0,
            ..small_config()
        };
        let mut field = VegetationField::generate(config, flat).unwrap();
        let base = Hsl::new(0.3, 0.5, 0.3);
        for x in [0.5f32, 4.0] {
            field.positions.push(Vec3::new(x, 0.0, 0.0));
            field.tilts.push(Vec3::ZERO);
            field.rotations.push(Vec3::ZERO);
            field.heights.push(0.5);
            field.height_floors.push(0.5);
            field.base_colors.push(base);
            field.colors.push(base);
        }

        let stats = field.tick(0.0, Vec3::ZERO, false);
        assert_eq!(stats.brightened, 2);
        let near = field.instance(0).unwrap().color.l;
        let far = field.instance(1).unwrap().color.l;
        assert!(near > far);
        assert!(far > base.l);
        assert_eq!(field.instance(0).unwrap().color.h, base.h);

        // Leaving the radius keeps the brightened color
        let away = Vec3::new(100.0, 0.0, 100.0);
        field.tick(1.0, away, false);
        assert_eq!(field.instance(0).unwrap().color.l, near);

        // Re-entering keeps brightening, never past the glow ceiling
        for _ in 0..500 {
            field.tick(0.0, Vec3::ZERO, false);
        }
        let settled = field.instance(0).unwrap().color.l;
        assert!(settled > near);
        assert!(settled <= field.config.glow_lightness);
    }

    #[test]
    fn test_vertical_offset_is_ignored() {
        let mut field = VegetationField::generate(small_config(), flat).unwrap();
        let target = field.instance(0).unwrap();
        let above = target.position + Vec3::new(0.0, 50.0, 0.0);

        let stats = field.tick(0.0, above, false);
        assert!(stats.grown >= 1);
        assert!(field.instance(0).unwrap().height > target.height);
    }

    #[test]
    fn test_instance_transform_scales_height() {
        let field = VegetationField::generate(small_config(), flat).unwrap();
        let instance = field.instance(7).unwrap();
        let transform = field.instance_transform(7).unwrap();
        assert_eq!(transform.position, instance.position);
        assert_eq!(transform.scale, Vec3::new(1.0, instance.height, 1.0));
    }

    #[test]
    fn test_invalid_config() {
        let config = VegetationConfig {
            cluster_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            VegetationField::generate(config, flat),
            Err(VegetationError::EmptyClusters)
        ));

        let config = VegetationConfig {
            height_cap: 0.5,
            ..Default::default()
        };
        assert!(matches!(
            VegetationField::generate(config, flat),
            Err(VegetationError::CapBelowInitialHeight { .. })
        ));

        let config = VegetationConfig {
            height_cap: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            VegetationField::generate(config, flat),
            Err(VegetationError::CapBelowInitialHeight { .. })
        ));

        let config = VegetationConfig {
            hue_range: [0.5, 0.1],
            ..Default::default()
        };
        assert!(matches!(
            VegetationField::generate(config, flat),
            Err(VegetationError::InvalidRange { name: "hue", .. })
        ));
    }

    #[test]
    fn test_populate_replaces_instances() {
        let mut field = VegetationField::empty(small_config());
        assert!(field.is_empty());

        assert_eq!(field.populate(flat).unwrap(), 250);
        let first = field.instance(3).unwrap();
        assert_eq!(field.populate(flat).unwrap(), 250);
        assert_eq!(field.instance(3), Some(first));

        field.config.cluster_size = 0;
        assert!(field.populate(flat).is_err());
        assert_eq!(field.len(), 250);
    }

    #[test]
    fn test_default_field_size() {
        let field = VegetationField::generate(VegetationConfig::default(), flat).unwrap();
        assert_eq!(field.len(), 10_000);
        assert!(field.average_height() > 0.0);
    }
}
