#![cfg_attr(docsrs, feature(doc_cfg))]
//! Library crate providing the quakesway simulation core.
//!
//! A building stands on procedurally shaped terrain and sways under wind and
//! earthquakes as a damped torsional oscillator. Past its safe sway angle it
//! collapses into rubble that tumbles and settles on the ground. Rendering,
//! windowing and input widgets live outside this crate; they drive
//! [`SimulationState`] with events and a frame clock and draw its
//! [`Snapshot`].
pub mod building;
pub mod config;
pub mod constants;
pub mod debris;
pub mod loads;
pub mod logging;
pub mod material;
pub mod numeric;
pub mod simulation;
pub mod terrain;
pub mod vector_math;
pub use constants::*;

// Re-export commonly used items
pub use building::{
    Building, BuildingError, BuildingSpec, BuildingState, DynamicsParameters, GeometryChange,
    StepOutcome,
};
pub use config::{ConfigError, SimulationConfig, WorldConfig};
pub use debris::{fragment_building, DebrisConfig, DebrisField, FlatGround, Fragment, Ground};
pub use loads::{LoadGenerator, SeismicConfig, SeismicEvent, WindConfig, WindLoad};
pub use logging::init as init_logging;
pub use material::{Material, MaterialKind};
pub use simulation::{FragmentView, SimulationEvent, SimulationState, Snapshot};
pub use terrain::{Liquefaction, Terrain, TerrainParameters};
pub use vector_math::{rotate, vertex_centroid};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use quakesway::prelude::*;
    //! ```

    pub use crate::Building;
    pub use crate::BuildingSpec;
    pub use crate::GeometryChange;
    pub use crate::MaterialKind;
    pub use crate::SimulationConfig;
    pub use crate::SimulationEvent;
    pub use crate::SimulationState;
}
