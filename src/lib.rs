//! Uniform access to the EasyGeSe genomic-selection benchmark collection:
//! genotype matrices (X), phenotype tables (Y), cross-validation fold
//! assignments (Z), and precomputed benchmark results, served from a shared
//! user cache with an online fallback for users who never downloaded anything.

pub mod app;
pub mod benchmark;
pub mod cv;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod index;
pub mod output;
pub mod registry;
pub mod sources;
pub mod store;
pub mod table;
