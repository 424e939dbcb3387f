//! apebuild-lib: resource packaging pipeline for multi-architecture executables
//!
//! The pipeline runs strictly in order:
//! - `staging`: recreate the build directory and its architecture override subtree
//! - `resource`: expand declared resource specs into concrete files
//! - `package`: turn every file into a default and a secondary architecture object
//! - `compile`: hand the staged objects and the sources to the compiler, once
//!
//! `pipeline` wires these stages together around an explicit `BuildConfig`.

pub mod compile;
pub mod config;
pub mod consts;
pub mod execute;
pub mod naming;
pub mod package;
pub mod pipeline;
pub mod platform;
pub mod resource;
pub mod staging;

#[cfg(test)]
pub mod testutil;
