/// How `#[locked]` selects its lock kind. Pick one per build; the two never mix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Convention {
    /// `#[locked(Kind)]`: the argument is required.
    #[default]
    Explicit,
    /// `#[locked]`: no argument, always `Checked`.
    Implicit,
}

/// Options for a single macro expansion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpandOptions {
    pub convention: Convention,
}

impl ExpandOptions {
    pub fn new(convention: Convention) -> Self {
        Self { convention }
    }
}
