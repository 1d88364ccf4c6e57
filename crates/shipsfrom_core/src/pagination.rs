use std::sync::OnceLock;

use regex::Regex;

fn total_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"of\s+(\d[\d,.\x{a0}\x{202f}]*)").expect("total items pattern is valid")
    })
}

fn page_param_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:^|[?&;])page=(\d+)").expect("page parameter pattern is valid")
    })
}

/// Reads N from a pagination summary such as `1 - 25 of 4,070`.
/// Thousand separators are ignored.
pub fn parse_total_items(text: &str) -> Option<u64> {
    let captures = total_pattern().captures(text)?;
    let digits: String = captures[1].chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Number of pages needed to show `total_items` at `page_size` per page.
pub fn total_pages(total_items: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total_items.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Formats a count with en-US thousand separators.
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// What a native pagination link asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Prev,
    Next,
    Numbered(u32),
    Unrecognized,
}

impl PageLink {
    /// Classifies a link by its label first, then by the `page` parameter of its href.
    pub fn classify(text: &str, href: Option<&str>) -> Self {
        if text.contains("Prev") {
            return PageLink::Prev;
        }
        if text.contains("Next") {
            return PageLink::Next;
        }
        href.and_then(|href| page_param_pattern().captures(href))
            .and_then(|captures| captures[1].parse().ok())
            .map(PageLink::Numbered)
            .unwrap_or(PageLink::Unrecognized)
    }

    /// The page this link leads to when the filter is on `current`.
    pub fn target(self, current: u32) -> u32 {
        match self {
            PageLink::Prev => current.saturating_sub(1).max(1),
            PageLink::Next => current.saturating_add(1),
            PageLink::Numbered(page) => page.max(1),
            PageLink::Unrecognized => current,
        }
    }
}
