//! Business logic — identity, narrative estimates, numeric predictions.

pub mod llm_service;
pub mod predictor_service;
pub mod user_service;
