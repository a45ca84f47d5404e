//! Core library for the `metar` CLI.
//!
//! This crate defines:
//! - Decoding of METAR/SPECI observations and their remarks trailer
//! - Shared domain models (observation, remarks) and output rendering
//! - Configuration handling
//! - Problem-detail errors reported by the weather service API
//!
//! It is used by `metar-cli`, but can also be reused by other binaries or services.
//!
//! ```
//! let obs = metar_core::decode_observation("METAR KJFK 201251Z 05008KT 10SM CLR 22/18 A3012")?;
//! assert_eq!(obs.station_id, "KJFK");
//! assert_eq!(obs.sky_condition, ["CLR"]);
//! # Ok::<(), metar_core::DecodeError>(())
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod observation;
pub mod problem;
pub mod remarks;
pub mod token;

pub use config::Config;
pub use error::DecodeError;
pub use format::{OutputFormat, render_observation, render_remarks};
pub use model::{Observation, Remarks, ReportModifier, ReportType, StationType};
pub use observation::decode_observation;
pub use problem::{ApiError, ParameterError, ProblemDetails, ProblemError};
pub use remarks::decode_remarks;
