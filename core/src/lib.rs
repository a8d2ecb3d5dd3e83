// Flapjack Diner - Core Library
//
// Request parameter models and the validation/encoding rules shared by
// every endpoint of the Flapjack API client.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::*;
