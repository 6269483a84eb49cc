//! Structural materials available to the building model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Immutable mechanical properties of a construction material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    /// Display name.
    pub name: &'static str,
    /// Young's modulus in pascals.
    pub elastic_modulus: f64,
    /// Density in kilograms per cubic metre.
    pub density: f64,
    /// Dimensionless damping ratio.
    pub damping_ratio: f64,
    /// Shear strength in pascals.
    pub shear_strength: f64,
}

/// Reinforced concrete.
pub const CONCRETE: Material = Material {
    name: "Concrete",
    elastic_modulus: 30e9,
    density: 2400.0,
    damping_ratio: 0.05,
    shear_strength: 2.5e6,
};

/// Structural steel.
pub const STEEL: Material = Material {
    name: "Steel",
    elastic_modulus: 200e9,
    density: 7850.0,
    damping_ratio: 0.02,
    shear_strength: 250e6,
};

/// Structural timber.
pub const WOOD: Material = Material {
    name: "Wood",
    elastic_modulus: 10e9,
    density: 600.0,
    damping_ratio: 0.07,
    shear_strength: 5e6,
};

/// Selector for one of the predefined materials.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    /// See [`CONCRETE`].
    #[default]
    Concrete,
    /// See [`STEEL`].
    Steel,
    /// See [`WOOD`].
    Wood,
}

impl MaterialKind {
    /// Every selectable material.
    pub const ALL: [Self; 3] = [Self::Concrete, Self::Steel, Self::Wood];

    /// Properties of the selected material.
    #[must_use]
    pub const fn properties(self) -> &'static Material {
        match self {
            Self::Concrete => &CONCRETE,
            Self::Steel => &STEEL,
            Self::Wood => &WOOD,
        }
    }
}

impl fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.properties().name)
    }
}
