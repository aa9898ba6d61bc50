/// Class-building options.
#[derive(Clone, Copy, Debug)]
pub struct ElementsConfig {
    /// Whether [`ClassBuilder::finish`](crate::ClassBuilder::finish) defines the
    /// element when the class (or an ancestor) sets no `autoDefine` static.
    pub auto_define: bool,
    /// Emit and record attribute-name collision warnings.
    pub warn_collisions: bool,
}

impl Default for ElementsConfig {
    fn default() -> Self {
        Self {
            auto_define: true,
            warn_collisions: true,
        }
    }
}
