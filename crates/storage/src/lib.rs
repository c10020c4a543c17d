//! Storage abstraction and implementations for liftlog.
//!
//! This crate provides a trait-based storage interface with a JSON file
//! reference implementation, plus the adapter that turns stored workouts and
//! exported backend rows into aggregation records.

#![warn(missing_docs)]

pub mod trait_;
pub mod json_storage;
pub mod adapter;

pub use trait_::{Storage, StorageError, Result, seed_library};
pub use json_storage::JsonStorage;
pub use adapter::{
    LooseNumber, OneOrMany, ExternalId, RawSetRow, RawBodyPart, RawWorkoutRef, RawExerciseRef,
    rows_to_set_records, rows_to_workouts, flatten_workouts, MAX_SETS_PER_ROW,
};
