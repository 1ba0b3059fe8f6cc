//! Tax-year configuration for the engine.
//!
//! This module provides the immutable per-year records (tax unit value,
//! minimum wage, contribution rules, presumptive-cost rate and the
//! progressive bracket table), the [`TaxYearStore`] lookup seam, and the
//! YAML-backed [`ConfigLoader`].
//!
//! # Example
//!
//! ```
//! use colombia_tax_engine::config::{ConfigLoader, TaxYearStore};
//!
//! let loader = ConfigLoader::builtin().unwrap();
//! println!("Tax years available: {:?}", loader.years());
//! ```

mod loader;
mod store;
mod types;

pub use loader::ConfigLoader;
pub use store::TaxYearStore;
pub use types::{ContributionConfig, ContributionKind, Contributions, TaxBracket, TaxYearConfig};
