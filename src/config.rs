//! Assembly options

/// Options controlling [`ContainerBuilder::build`](crate::ContainerBuilder::build)
///
/// ```rust
/// use wiring_factory::AssemblyOptions;
///
/// let options = AssemblyOptions::new().eager_singletons(false);
/// assert!(options.scans_factories());
/// assert!(!options.creates_eager_singletons());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblyOptions {
    scan_factories: bool,
    eager_singletons: bool,
}

impl AssemblyOptions {
    /// Default options: scan for factories, create eager singletons
    #[inline]
    pub const fn new() -> Self {
        Self {
            scan_factories: true,
            eager_singletons: true,
        }
    }

    /// Whether to register product definitions for factory components
    #[inline]
    pub const fn scan_factories(mut self, enabled: bool) -> Self {
        self.scan_factories = enabled;
        self
    }

    /// Whether to instantiate non-lazy singletons while building
    #[inline]
    pub const fn eager_singletons(mut self, enabled: bool) -> Self {
        self.eager_singletons = enabled;
        self
    }

    #[inline]
    pub const fn scans_factories(&self) -> bool {
        self.scan_factories
    }

    #[inline]
    pub const fn creates_eager_singletons(&self) -> bool {
        self.eager_singletons
    }
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self::new()
    }
}
