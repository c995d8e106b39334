//! Ordered collection of pattern factories
//!
//! Families are registered explicitly by [`PatternRegistry::builtin`], in a
//! fixed order, instead of through load-time side effects. Callers should
//! select by [`PatternRegistry::find`]; positions are stable but only
//! meaningful for the built-in list.

use std::sync::{Arc, OnceLock};

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::factory::PatternFactory;
use crate::patterns;

#[derive(Default)]
pub struct PatternRegistry {
    factories: Vec<Arc<dyn PatternFactory>>,
}

impl PatternRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in family
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        patterns::register_all(&mut registry);
        registry
    }

    /// Append a factory. Duplicate names are logged, not rejected.
    pub fn link(&mut self, factory: Arc<dyn PatternFactory>) {
        let name = factory.name();
        if self.factories.iter().any(|f| f.name() == name) {
            warn!(pattern = name, "pattern registered more than once");
        }
        debug!(pattern = name, position = self.factories.len(), "linked pattern factory");
        self.factories.push(factory);
    }

    /// All factories in registration order
    pub fn list(&self) -> &[Arc<dyn PatternFactory>] {
        &self.factories
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.factories.iter().map(|f| f.name()).collect()
    }

    pub fn get(&self, index: usize) -> Result<&Arc<dyn PatternFactory>> {
        self.factories.get(index).ok_or(Error::PatternIndexOutOfRange {
            index,
            count: self.factories.len(),
        })
    }

    /// First factory registered under `name`
    pub fn find(&self, name: &str) -> Result<&Arc<dyn PatternFactory>> {
        self.factories
            .iter()
            .find(|f| f.name() == name)
            .ok_or_else(|| Error::UnknownPattern(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

/// Process-wide registry, populated from [`PatternRegistry::builtin`] on first use
pub fn global() -> &'static PatternRegistry {
    static REGISTRY: OnceLock<PatternRegistry> = OnceLock::new();
    REGISTRY.get_or_init(PatternRegistry::builtin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Pattern;

    struct Named(&'static str);

    impl PatternFactory for Named {
        fn name(&self) -> &'static str {
            self.0
        }

        fn create(&self) -> Box<dyn Pattern> {
            patterns::OneSidedAndTreeFactory.create()
        }

        fn create_with(&self, args: &str) -> Result<Box<dyn Pattern>> {
            patterns::OneSidedAndTreeFactory.create_with(args)
        }

        fn examples(&self) -> &'static [&'static str] {
            &[]
        }
    }

    #[test]
    fn test_link_preserves_order() {
        let mut registry = PatternRegistry::new();
        assert!(registry.is_empty());
        for name in ["alpha", "beta", "gamma"] {
            registry.link(Arc::new(Named(name)));
        }
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.names(), vec!["alpha", "beta", "gamma"]);
        assert_eq!(registry.get(1).unwrap().name(), "beta");
    }

    #[test]
    fn test_lookup_misses() {
        let mut registry = PatternRegistry::new();
        registry.link(Arc::new(Named("alpha")));
        assert!(matches!(registry.find("beta"), Err(Error::UnknownPattern(n)) if n == "beta"));
        assert!(matches!(
            registry.get(4),
            Err(Error::PatternIndexOutOfRange { index: 4, count: 1 })
        ));
    }

    #[test]
    fn test_duplicate_names_first_wins() {
        let mut registry = PatternRegistry::new();
        registry.link(Arc::new(Named("alpha")));
        registry.link(Arc::new(Named("alpha")));
        assert_eq!(registry.len(), 2);
        let found = registry.find("alpha").unwrap();
        assert!(Arc::ptr_eq(found, &registry.list()[0]));
    }

    #[test]
    fn test_global_has_builtins() {
        let registry = global();
        assert!(registry.find("one_sided_and_tree").is_ok());
        assert!(std::ptr::eq(registry, global()));
    }
}
