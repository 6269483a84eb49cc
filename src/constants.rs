//! Physical constants and tuning defaults shared across the simulation.
//!
//! Values that a scenario may reasonably want to change are mirrored in
//! [`crate::config`]; the constants here seed those defaults.

/// Standard gravity in metres per second squared.
pub const GRAVITY: f64 = 9.81;
/// Density of air at sea level in kilograms per cubic metre.
pub const AIR_DENSITY: f64 = 1.225;
/// Drag coefficient of a bluff rectangular facade.
pub const DRAG_COEFFICIENT: f64 = 1.3;

/// Smallest building mass accepted by the dynamics model, in kilograms.
pub const MIN_MASS: f64 = 1000.0;
/// Moment of inertia used when the building has no height, in kg·m².
pub const FALLBACK_INERTIA: f64 = 1e6;
/// Fraction of the gross building volume occupied by structural members.
pub const STRUCTURAL_VOLUME_FRACTION: f64 = 0.15;
/// Fraction of each story's volume occupied by the floor slab.
pub const FLOOR_VOLUME_FRACTION: f64 = 0.10;
/// Default facade cladding mass per square metre.
pub const DEFAULT_CLADDING_MASS_PER_AREA: f64 = 75.0;

/// Tallest building the model accepts, in stories.
pub const MAX_STORIES: u32 = 200;

/// Default rotational stiffness in Nm/rad.
pub const DEFAULT_ROTATIONAL_STIFFNESS: f64 = 8e7;
/// Default rotational damping in Nm·s/rad.
pub const DEFAULT_ROTATIONAL_DAMPING: f64 = 5e6;
/// Default sway angle beyond which the structure fails (20 degrees).
pub const DEFAULT_MAX_SAFE_ANGLE: f64 = 0.349;

/// Shaking frequency of a seismic event in hertz.
pub const DEFAULT_SHAKE_FREQUENCY_HZ: f64 = 0.4;
/// Length of a seismic event in seconds.
pub const DEFAULT_SHAKE_DURATION: f64 = 3.0;
/// Peak ground acceleration, in g, above which soil liquefies.
pub const DEFAULT_LIQUEFACTION_THRESHOLD_G: f64 = 0.5;
/// Stiffness multiplier applied while the soil is liquefied.
pub const DEFAULT_LIQUEFACTION_STIFFNESS_MULTIPLIER: f64 = 0.6;
/// Frequency of the visual ground jiggle during liquefaction.
pub const LIQUEFACTION_JIGGLE_HZ: f64 = 4.0;
/// Relative amplitude boost of the terrain at full liquefaction.
pub const LIQUEFACTION_AMPLITUDE_BOOST: f64 = 0.5;
/// Vertical ground offset, in world pixels, at full liquefaction.
pub const LIQUEFACTION_OFFSET: f64 = 6.0;

/// Horizontal slices each story breaks into on collapse.
pub const DEFAULT_SLICES_PER_STORY: u32 = 2;
/// Maximum vertex jitter as a fraction of the fragment half extents.
pub const FRAGMENT_JITTER_FRACTION: f64 = 0.3;
/// Vertical restitution factor applied on ground contact.
pub const FRAGMENT_RESTITUTION: f64 = -0.1;
/// Horizontal velocity retained after ground contact.
pub const FRAGMENT_GROUND_FRICTION: f64 = 0.5;
/// Angular velocity retained after ground contact.
pub const FRAGMENT_ANGULAR_FRICTION: f64 = 0.3;
/// Vertical speed under which a grounded fragment settles, in m/s.
pub const SETTLE_LINEAR_THRESHOLD: f64 = 0.2;
/// Angular speed under which a grounded fragment settles, in rad/s.
pub const SETTLE_ANGULAR_THRESHOLD: f64 = 0.05;
/// Simulated seconds after which the collapse animation stops.
pub const COLLAPSE_TIME_BUDGET: f64 = 5.0;

/// Default world width in pixels.
pub const DEFAULT_WORLD_WIDTH: f64 = 1280.0;
/// Default world height in pixels.
pub const DEFAULT_WORLD_HEIGHT: f64 = 720.0;
/// Default number of world pixels per metre.
pub const DEFAULT_PIXELS_PER_METRE: f64 = 10.0;
/// Default frame timestep in seconds.
pub const DEFAULT_TIMESTEP: f64 = 1.0 / 60.0;
