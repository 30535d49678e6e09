//! Flight Input Validation
//!
//! Checks inbound flights against the accepted airline, flight type and month
//! domains before they reach the feature pipeline.

mod airline;
mod error;
mod validator;

pub use airline::{Airline, FlightType};
pub use error::{ErrorDetail, ValidationError};
pub use validator::{FlightInput, ValidationConfig, Validator};
