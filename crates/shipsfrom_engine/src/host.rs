/// A native pagination link as found in the host document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostLink {
    /// Position among the elements matching the link selector.
    pub index: usize,
    pub text: String,
    pub href: Option<String>,
    /// Already carries the filter's click interceptor.
    pub handled: bool,
}

/// The live page the filter is attached to.
///
/// The host markup belongs to a third party, so every operation is
/// best-effort: a selector that matches nothing is reported through the
/// return value, never as an error. Methods take `&self` because the browser
/// DOM is reached through shared handles; implementations mutate through them.
pub trait HostDocument {
    /// Current address of the page.
    fn location(&self) -> String;
    /// Replaces the address in history without navigating.
    fn replace_location(&self, url: &str);
    /// Serialized markup of the whole document, for parsing.
    fn snapshot_html(&self) -> String;
    fn exists(&self, selector: &str) -> bool;
    /// Current value of the first form control matching `selector`.
    fn value_of(&self, selector: &str) -> Option<String>;
    fn set_value(&self, selector: &str, value: &str) -> bool;
    /// Replaces the children of the first match with `markup`, in order.
    fn replace_children(&self, selector: &str, markup: &[&str]) -> bool;
    /// Sets the text of every match, returning how many were updated.
    fn set_text_all(&self, selector: &str, text: &str) -> usize;
    /// Inserts `markup` right after the first match.
    fn insert_after(&self, anchor: &str, markup: &str) -> bool;
    fn remove_all(&self, selector: &str) -> usize;
    fn links(&self, selector: &str) -> Vec<HostLink>;
    fn set_link_href(&self, selector: &str, index: usize, href: &str) -> bool;
    /// Flags a link as carrying the click interceptor.
    fn mark_link_handled(&self, selector: &str, index: usize) -> bool;
}
