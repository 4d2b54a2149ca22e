/// When the state of a fetched association is loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FetchTiming {
    /// Loaded as part of the row currently being processed.
    #[default]
    Immediate,

    /// Loaded later, by key, from a separate select.
    Delayed,
}

impl FetchTiming {
    pub fn is_immediate(self) -> bool {
        matches!(self, Self::Immediate)
    }

    pub fn is_delayed(self) -> bool {
        matches!(self, Self::Delayed)
    }
}
