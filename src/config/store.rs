//! The lookup seam between the calculator and its configuration source.

use crate::error::EngineResult;

use super::types::TaxYearConfig;

/// A read-only source of tax-year records.
///
/// The calculator only ever asks a store for one year's record, so any
/// source (compiled-in data, a directory of YAML files, a test fixture)
/// can stand behind this trait. Stores never change after construction.
pub trait TaxYearStore {
    /// Returns the record for `year`.
    ///
    /// Fails with [`EngineError::ConfigurationNotFound`] when the store holds
    /// no record for that year.
    ///
    /// [`EngineError::ConfigurationNotFound`]: crate::error::EngineError::ConfigurationNotFound
    fn lookup(&self, year: i32) -> EngineResult<&TaxYearConfig>;

    /// Returns every year this store can answer for, ascending.
    fn years(&self) -> Vec<i32>;
}
