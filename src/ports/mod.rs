//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the application core and an
//! external system (time, the code-generation job service, filesystem).
//! Implementations live in `src/adapters/`.

pub mod clock;
pub mod filesystem;
pub mod job_api;

pub use clock::{Clock, SleepFuture};
pub use filesystem::FileSystem;
pub use job_api::{
    ApiError, ApiFuture, InputFile, JobApi, JobStatus, PartName, StatusResponse, SubmitResponse,
};
