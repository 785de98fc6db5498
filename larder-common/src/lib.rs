//! # Larder Common Library
//!
//! Shared code for the Larder recipe browser:
//! - Recipe model (remote and locally authored variants) and its display projection
//! - Local store database initialization
//! - Bootstrap configuration loading and root folder resolution
//! - Recipe identifier generation

pub mod config;
pub mod db;
pub mod error;
pub mod ids;
pub mod model;

pub use error::{Error, Result};
pub use model::{LocalRecipe, Recipe, RecipeSummary, RemoteRecipe, RemoteRecipeSummary};
