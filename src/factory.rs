//! Named constructors for pattern families

use crate::error::Result;
use crate::pattern::Pattern;

/// Builds instances of one pattern family
pub trait PatternFactory: Send + Sync {
    /// Stable family identifier used for lookup and output labeling
    fn name(&self) -> &'static str;

    /// Default configuration; never fails
    fn create(&self) -> Box<dyn Pattern>;

    /// Configuration encoded in a family-specific argument string
    fn create_with(&self, args: &str) -> Result<Box<dyn Pattern>>;

    /// Argument strings regression runs should exercise
    fn examples(&self) -> &'static [&'static str];
}
