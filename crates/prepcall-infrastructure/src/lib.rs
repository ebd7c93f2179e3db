//! Infrastructure implementations for PrepCall.
//!
//! Environment-backed configuration plus the document-store
//! implementations of the interview repository.

pub mod config;
pub mod firestore_interview_repository;
pub mod memory_interview_repository;

pub use crate::config::{AppConfig, FirestoreConfig, GeminiConfig, VapiConfig};
pub use crate::firestore_interview_repository::FirestoreInterviewRepository;
pub use crate::memory_interview_repository::MemoryInterviewRepository;
