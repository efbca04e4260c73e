//! Application services layer.
//!
//! Services orchestrate the catalog, the session registry and the platform
//! collaborators on behalf of incoming commands.

pub mod quiz_service;

pub use quiz_service::QuizService;
