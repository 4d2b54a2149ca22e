use std::fmt;

/// Lock requested for the rows of a table alias.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LockMode {
    #[default]
    None,
    Read,
    Optimistic,
    OptimisticForceIncrement,
    PessimisticRead,
    PessimisticWrite,
    PessimisticForceIncrement,
    UpgradeNoWait,
    UpgradeSkipLocked,
}

impl LockMode {
    /// Returns `true` if the mode acquires a database lock when the row is
    /// read.
    pub fn is_pessimistic(self) -> bool {
        matches!(
            self,
            Self::PessimisticRead
                | Self::PessimisticWrite
                | Self::PessimisticForceIncrement
                | Self::UpgradeNoWait
                | Self::UpgradeSkipLocked
        )
    }

    pub fn is_none(self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Display for LockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Read => "read",
            Self::Optimistic => "optimistic",
            Self::OptimisticForceIncrement => "optimistic_force_increment",
            Self::PessimisticRead => "pessimistic_read",
            Self::PessimisticWrite => "pessimistic_write",
            Self::PessimisticForceIncrement => "pessimistic_force_increment",
            Self::UpgradeNoWait => "upgrade_nowait",
            Self::UpgradeSkipLocked => "upgrade_skiplocked",
        };
        f.write_str(name)
    }
}
