//! Instrument definitions.

pub mod security;

pub use security::{
    AntiDilution, ConvertibleKind, ConvertibleTerms, EsoTerms, ExerciseWindow, Participation,
    ResetEvent, Security, DEFAULT_EXERCISE_MULTIPLE,
};
