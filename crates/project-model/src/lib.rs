//! Slidecast Project Model
//!
//! Defines the data contracts shared by every pipeline stage:
//! - **Parameters:** The immutable [`ParameterSet`] a run is configured with,
//!   including quality tiers, resolution, and transition effects
//! - **Settings:** The persisted key/value document the parameters are saved to
//! - **Slides:** Naming and ordering of exported slide images
//! - **Workspace:** Layout of the temporary directory a run owns

pub mod params;
pub mod settings;
pub mod slide;
pub mod workspace;

pub use params::*;
pub use settings::*;
pub use slide::*;
pub use workspace::*;
