//! Level configuration types.
//!
//! A level is authored as JSON: the shared mesh, then groups of paintings.
//! [`LevelConfig::build`] validates everything, loads the textures and
//! returns a ready [`Simulation`].
//!
//! ```json
//! {
//!   "name": "castle",
//!   "mesh": { "kind": "grid", "divisions": 8 },
//!   "groups": [
//!     {
//!       "name": "inside",
//!       "paintings": [
//!         {
//!           "id": 0,
//!           "position": [-5222.4, 409.6, -153.6],
//!           "rotation": [0.0, 90.0],
//!           "textures": [{ "kind": "file", "path": "bob_top.png" }],
//!           "trigger": "proximity",
//!           "passive": { "magnitude": 20.0, "decay": 0.9608, "rate": 0.24, "dispersion": 40.0 },
//!           "entry": { "magnitude": 80.0, "decay": 0.9524, "rate": 0.14, "dispersion": 30.0 }
//!         }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec3;
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::field::RippleParams;
use crate::floor::MAX_PAINTING_ID;
use crate::group::PaintingGroup;
use crate::mesh::{BaseMesh, MeshTables, NeighborTable, MAX_GRID_DIVISIONS};
use crate::mover::MoverConfig;
use crate::painting::{Painting, RippleTrigger};
use crate::simulation::Simulation;
use crate::textures::{TextureImage, TextureKind, TextureMap};
use crate::PAINTING_SIZE;

fn default_size() -> f32 {
    PAINTING_SIZE
}

fn default_alpha() -> u8 {
    0xFF
}

fn default_passive() -> RippleParams {
    RippleParams::new(20.0, 0.9608, 0.24, 40.0)
}

fn default_entry() -> RippleParams {
    RippleParams::new(80.0, 0.9524, 0.14, 30.0)
}

/// The shared base mesh.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MeshConfig {
    /// A generated square grid with an immovable border.
    Grid { divisions: u16 },
    /// Authored flat tables. The neighbor table is derived when omitted.
    Raw {
        mesh: Vec<i16>,
        #[serde(default)]
        neighbors: Option<Vec<i16>>,
    },
}

impl Default for MeshConfig {
    fn default() -> Self {
        MeshConfig::Grid { divisions: 8 }
    }
}

impl MeshConfig {
    pub fn build(&self) -> Result<MeshTables, ConfigError> {
        match self {
            MeshConfig::Grid { divisions } => {
                if *divisions == 0 {
                    return Err(ConfigError::Invalid("grid mesh needs at least one division".into()));
                }
                if *divisions > MAX_GRID_DIVISIONS {
                    return Err(ConfigError::Invalid(format!(
                        "grid mesh of {} divisions exceeds the limit of {}",
                        divisions, MAX_GRID_DIVISIONS
                    )));
                }
                Ok(MeshTables::grid(*divisions))
            }
            MeshConfig::Raw { mesh, neighbors } => {
                let mesh = BaseMesh::from_raw(mesh)?;
                match neighbors {
                    Some(raw) => {
                        let neighbors = NeighborTable::from_raw(raw, mesh.vertex_count())?;
                        Ok(MeshTables::new(mesh, neighbors)?)
                    }
                    None => Ok(MeshTables::from_mesh(mesh)),
                }
            }
        }
    }
}

/// Where a painting image comes from.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TextureSource {
    /// An image file, relative to the config file.
    File { path: PathBuf },
    Solid { rgba: [u8; 4], width: u32, height: u32 },
    Checkerboard { colors: [[u8; 4]; 2], cell: u32, width: u32, height: u32 },
}

impl TextureSource {
    pub fn load(&self, base_dir: &Path) -> Result<TextureImage, ConfigError> {
        Ok(match self {
            TextureSource::File { path } => TextureImage::from_file(base_dir.join(path))?,
            TextureSource::Solid { rgba, width, height } => TextureImage::solid(*width, *height, *rgba)?,
            TextureSource::Checkerboard { colors, cell, width, height } => {
                TextureImage::checkerboard(*width, *height, *cell, colors[0], colors[1])?
            }
        })
    }
}

/// How images are mapped onto the mesh.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TextureMapSource {
    /// One horizontal band per image, bottom band first.
    #[default]
    Planar,
    /// Authored flat texture maps, one per image.
    Raw { maps: Vec<Vec<i16>> },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PaintingConfig {
    pub id: i16,
    #[serde(default)]
    pub position: [f32; 3],
    /// Pitch and yaw in degrees. Nonzero pitch makes a floor painting.
    #[serde(default)]
    pub rotation: [f32; 2],
    #[serde(default = "default_size")]
    pub size: f32,
    pub textures: Vec<TextureSource>,
    #[serde(default)]
    pub texture_map: TextureMapSource,
    #[serde(default)]
    pub texture_kind: TextureKind,
    #[serde(default = "default_alpha")]
    pub alpha: u8,
    #[serde(default)]
    pub normal_list: String,
    #[serde(default)]
    pub ripple_list: String,
    #[serde(default)]
    pub trigger: RippleTrigger,
    #[serde(default = "default_passive")]
    pub passive: RippleParams,
    #[serde(default = "default_entry")]
    pub entry: RippleParams,
    #[serde(default)]
    pub mover: Option<MoverConfig>,
}

impl Default for PaintingConfig {
    fn default() -> Self {
        Self {
            id: 0,
            position: [0.0; 3],
            rotation: [0.0; 2],
            size: PAINTING_SIZE,
            textures: vec![TextureSource::Solid { rgba: [200, 180, 140, 255], width: 32, height: 32 }],
            texture_map: TextureMapSource::Planar,
            texture_kind: TextureKind::Image,
            alpha: 0xFF,
            normal_list: String::new(),
            ripple_list: String::new(),
            trigger: RippleTrigger::Proximity,
            passive: default_passive(),
            entry: default_entry(),
            mover: None,
        }
    }
}

impl PaintingConfig {
    /// Check everything that can be checked without touching the filesystem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(format!("painting {}: {}", self.id, msg)));

        if !(0..=MAX_PAINTING_ID).contains(&self.id) {
            return invalid(format!("id must be within 0..={}", MAX_PAINTING_ID));
        }
        if self.size.is_nan() || self.size <= 0.0 {
            return invalid(format!("size must be positive, got {}", self.size));
        }
        if self.textures.is_empty() {
            return invalid("needs at least one texture".into());
        }
        if self.texture_kind == TextureKind::EnvMap && self.textures.len() != 1 {
            return invalid(format!("env-mapped paintings take one texture, got {}", self.textures.len()));
        }
        if let TextureMapSource::Raw { maps } = &self.texture_map {
            if maps.len() != self.textures.len() {
                return invalid(format!("{} texture maps for {} textures", maps.len(), self.textures.len()));
            }
        }
        // both presets spread with the passive dispersion
        if self.passive.dispersion <= 0.0 {
            return invalid("passive ripple dispersion must be positive".into());
        }
        Ok(())
    }

    /// Build the painting, loading textures relative to `base_dir`.
    pub fn build(&self, tables: &MeshTables, base_dir: &Path) -> Result<Painting, ConfigError> {
        self.validate()?;

        let textures = self
            .textures
            .iter()
            .map(|t| t.load(base_dir))
            .collect::<Result<Vec<_>, _>>()?;

        let maps = match &self.texture_map {
            TextureMapSource::Planar => {
                let (width, height) = textures.first().map(|t| (t.width, t.height)).unwrap_or((32, 32));
                TextureMap::planar_bands(&tables.mesh, textures.len(), width, height)
            }
            TextureMapSource::Raw { maps } => maps
                .iter()
                .map(|raw| {
                    let map = TextureMap::from_raw(raw)?;
                    map.validate(&tables.mesh)?;
                    Ok(map)
                })
                .collect::<Result<Vec<_>, ConfigError>>()?,
        };

        let mut painting = Painting::new(self.id, self.size)
            .with_position(Vec3::from(self.position))
            .with_rotation(self.rotation)
            .with_textures(textures, maps)
            .with_texture_kind(self.texture_kind)
            .with_alpha(self.alpha)
            .with_lists(self.normal_list.clone(), self.ripple_list.clone())
            .with_trigger(self.trigger)
            .with_presets(self.passive, self.entry);
        if let Some(mover) = self.mover {
            painting = painting.with_mover(mover);
        }
        Ok(painting)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct GroupConfig {
    pub name: String,
    pub paintings: Vec<PaintingConfig>,
}

impl GroupConfig {
    pub fn build(&self, tables: &MeshTables, base_dir: &Path) -> Result<PaintingGroup, ConfigError> {
        let mut seen = HashSet::new();
        let mut group = PaintingGroup::new(self.name.clone());
        for painting in &self.paintings {
            if !seen.insert(painting.id) {
                return Err(ConfigError::Invalid(format!(
                    "group '{}' has painting id {} twice",
                    self.name, painting.id
                )));
            }
            group.push(painting.build(tables, base_dir)?);
        }
        Ok(group)
    }
}

/// Complete level configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LevelConfig {
    pub name: String,
    #[serde(default)]
    pub mesh: MeshConfig,
    pub groups: Vec<GroupConfig>,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self { name: "Untitled".into(), mesh: MeshConfig::default(), groups: Vec::new() }
    }
}

impl LevelConfig {
    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate and assemble the level. Texture paths resolve against `base_dir`.
    pub fn build(&self, base_dir: impl AsRef<Path>) -> Result<Simulation, ConfigError> {
        let base_dir = base_dir.as_ref();
        let tables = self.mesh.build()?;
        let groups = self
            .groups
            .iter()
            .map(|g| g.build(&tables, base_dir))
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            "level '{}': {} groups, {} paintings, {} mesh triangles",
            self.name,
            groups.len(),
            groups.iter().map(PaintingGroup::len).sum::<usize>(),
            tables.mesh.triangle_count()
        );

        Ok(groups.into_iter().fold(Simulation::new(tables), Simulation::with_group))
    }

    /// A small castle-like level: two wall paintings and a floor painting
    /// sharing one group.
    pub fn demo() -> Self {
        let checker = |a: [u8; 4], b: [u8; 4]| TextureSource::Checkerboard {
            colors: [a, b],
            cell: 8,
            width: 64,
            height: 32,
        };

        Self {
            name: "demo".into(),
            mesh: MeshConfig::Grid { divisions: 8 },
            groups: vec![GroupConfig {
                name: "castle".into(),
                paintings: vec![
                    PaintingConfig {
                        id: 0,
                        position: [0.0, 0.0, 0.0],
                        textures: vec![
                            checker([40, 90, 200, 255], [240, 240, 240, 255]),
                            checker([60, 160, 60, 255], [240, 240, 240, 255]),
                        ],
                        normal_list: "bob_normal".into(),
                        ripple_list: "bob_ripple".into(),
                        ..PaintingConfig::default()
                    },
                    PaintingConfig {
                        id: 1,
                        position: [1200.0, 0.0, 0.0],
                        textures: vec![checker([220, 60, 60, 255], [20, 20, 20, 255])],
                        texture_kind: TextureKind::EnvMap,
                        trigger: RippleTrigger::Continuous,
                        normal_list: "ddd_normal".into(),
                        ripple_list: "ddd_ripple".into(),
                        passive: RippleParams::new(10.0, 1.0, 0.1, 30.0),
                        entry: RippleParams::new(30.0, 0.98, 0.05, 15.0),
                        mover: Some(MoverConfig { front_x: 1200.0, back_x: 1400.0, speed: 20.0 }),
                        ..PaintingConfig::default()
                    },
                    PaintingConfig {
                        id: 2,
                        position: [3000.0, -200.0, 614.0],
                        rotation: [270.0, 0.0],
                        textures: vec![checker([120, 80, 30, 255], [250, 210, 120, 255])],
                        trigger: RippleTrigger::Continuous,
                        alpha: 0xB4,
                        normal_list: "hmc_normal".into(),
                        ripple_list: "hmc_ripple".into(),
                        passive: RippleParams::new(10.0, 1.0, 0.1, 30.0),
                        entry: RippleParams::new(30.0, 0.98, 0.05, 15.0),
                        ..PaintingConfig::default()
                    },
                ],
            }],
        }
    }
}
