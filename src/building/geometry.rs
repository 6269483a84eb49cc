//! Building geometry and the mass model derived from it.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::material::{Material, MaterialKind};
use crate::{
    DEFAULT_CLADDING_MASS_PER_AREA, FALLBACK_INERTIA, FLOOR_VOLUME_FRACTION, MAX_STORIES,
    MIN_MASS, STRUCTURAL_VOLUME_FRACTION,
};

/// Serialisable parameter set from which a [`Building`](super::Building) is
/// constructed.
///
/// # Examples
/// ```
/// use quakesway::BuildingSpec;
/// let spec = BuildingSpec::default();
/// assert_eq!(spec.stories, 3);
/// assert!((spec.total_height() - 9.0).abs() < f64::EPSILON);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingSpec {
    /// Number of stories.
    pub stories: u32,
    /// Height of one story in metres.
    pub story_height: f64,
    /// Footprint extent along the viewing plane, in metres.
    pub footprint_length: f64,
    /// Footprint extent into the screen, in metres.
    pub footprint_width: f64,
    /// Primary structural material.
    pub material: MaterialKind,
    /// Facade cladding mass in kilograms per square metre.
    pub facade_cladding_mass_per_area: f64,
    /// Overrides the material damping ratio when set.
    pub damping_ratio_override: Option<f64>,
}

impl Default for BuildingSpec {
    fn default() -> Self {
        Self {
            stories: 3,
            story_height: 3.0,
            footprint_length: 10.0,
            footprint_width: 10.0,
            material: MaterialKind::Concrete,
            facade_cladding_mass_per_area: DEFAULT_CLADDING_MASS_PER_AREA,
            damping_ratio_override: None,
        }
    }
}

impl BuildingSpec {
    /// Creates a spec with default story height and cladding.
    #[must_use]
    pub fn new(stories: u32, footprint_length: f64, footprint_width: f64, material: MaterialKind) -> Self {
        Self {
            stories,
            footprint_length,
            footprint_width,
            material,
            ..Self::default()
        }
    }

    /// Properties of the primary material.
    #[must_use]
    pub const fn material_properties(&self) -> &'static Material {
        self.material.properties()
    }

    /// Total height in metres.
    #[must_use]
    pub fn total_height(&self) -> f64 {
        f64::from(self.stories) * self.story_height
    }

    /// Height over footprint length; `+∞` for a non-positive length.
    #[must_use]
    pub fn aspect_ratio_length(&self) -> f64 {
        aspect_ratio(self.total_height(), self.footprint_length)
    }

    /// Height over footprint width; `+∞` for a non-positive width.
    #[must_use]
    pub fn aspect_ratio_width(&self) -> f64 {
        aspect_ratio(self.total_height(), self.footprint_width)
    }

    /// Damping ratio from the override or, failing that, the material.
    #[must_use]
    pub fn effective_damping_ratio(&self) -> f64 {
        self.damping_ratio_override
            .unwrap_or(self.material_properties().damping_ratio)
    }

    /// Area of the four facades in square metres.
    #[must_use]
    pub fn facade_area(&self) -> f64 {
        2.0 * (self.footprint_length + self.footprint_width) * self.total_height()
    }

    /// Mass from structure, cladding and floors before any clamping.
    #[must_use]
    pub fn raw_mass(&self) -> f64 {
        let density = self.material_properties().density;
        let plan_area = self.footprint_length * self.footprint_width;
        let structure = STRUCTURAL_VOLUME_FRACTION * plan_area * self.total_height() * density;
        let cladding = self.facade_area() * self.facade_cladding_mass_per_area;
        let floors = FLOOR_VOLUME_FRACTION
            * plan_area
            * self.story_height
            * f64::from(self.stories)
            * density;
        structure + cladding + floors
    }

    /// Total mass in kilograms, never below [`MIN_MASS`].
    #[must_use]
    pub fn mass(&self) -> f64 {
        let raw = self.raw_mass();
        if raw > 0.0 {
            raw
        } else {
            warn!("building mass computed as {raw} kg; clamping to {MIN_MASS} kg");
            MIN_MASS
        }
    }

    /// Moment of inertia about the base for `mass`, treating the building as
    /// a rod: `m·h²/3`.
    ///
    /// Falls back to [`FALLBACK_INERTIA`] when the building has no height.
    #[must_use]
    pub fn moment_of_inertia(&self, mass: f64) -> f64 {
        let height = self.total_height();
        if height > 0.0 {
            mass * height * height / 3.0
        } else {
            FALLBACK_INERTIA
        }
    }

    /// Applies `change` to this spec.
    pub fn apply(&mut self, change: GeometryChange) {
        match change {
            GeometryChange::Stories(stories) => {
                if stories > MAX_STORIES {
                    warn!("{stories} stories requested; capping at {MAX_STORIES}");
                }
                self.stories = stories.min(MAX_STORIES);
            }
            GeometryChange::StoryHeight(height) => self.story_height = height,
            GeometryChange::FootprintLength(length) => self.footprint_length = length,
            GeometryChange::FootprintWidth(width) => self.footprint_width = width,
            GeometryChange::CladdingMass(mass) => self.facade_cladding_mass_per_area = mass,
            GeometryChange::Material(material) => self.material = material,
        }
    }
}

fn aspect_ratio(height: f64, extent: f64) -> f64 {
    if extent > 0.0 {
        height / extent
    } else {
        f64::INFINITY
    }
}

/// A single typed edit to a building's geometry or material.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "parameter", content = "value")]
pub enum GeometryChange {
    /// Set the number of stories, capped at [`MAX_STORIES`].
    Stories(u32),
    /// Set the story height in metres.
    StoryHeight(f64),
    /// Set the footprint length in metres.
    FootprintLength(f64),
    /// Set the footprint width in metres.
    FootprintWidth(f64),
    /// Set the facade cladding mass per square metre.
    CladdingMass(f64),
    /// Swap the primary material.
    Material(MaterialKind),
}
