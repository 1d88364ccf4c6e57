#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Rebuild the table, pagination texts and links from `FilterState::view`.
    Render,
    /// Replace the address in history, without navigating.
    ReplaceUrl { page: u32, country: String },
}
