//! # Ideoscope Core
//!
//! Library for exploring a corpus of articles and profiles embedded in two
//! independent semantic spaces: a *contextual* space (topical meaning, used
//! for retrieval) and an *ideological* space (alignment, used for
//! re-ranking against a reference profile).
//!
//! ## Modules
//!
//! - [`search`] - Two-stage retrieval-rerank engine (KNN recall, cosine re-rank)
//! - [`session`] - Search interaction state machine with stale-response dropping
//! - [`graph`] - Spatial graph builder merging the position artifact with store labels
//! - [`highlight`] - Pure node → render color policy
//! - [`store`] - Vector store adapter trait and in-memory reference implementation
//! - [`embedding`] - Query embedding service trait and HTTP-backed client
//! - [`vector`] - Binary vector codec and cosine similarity
//! - [`config`] - Production configuration constants
//! - [`error`] - Shared error types

pub mod config;
pub mod embedding;
pub mod error;
pub mod graph;
pub mod highlight;
pub mod search;
pub mod session;
pub mod store;
pub mod vector;
