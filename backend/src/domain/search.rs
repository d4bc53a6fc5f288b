//! Entry filtering and title ordering.
//!
//! Storage adapters load candidate entries and hand them to
//! [`EntryFilter::apply`], so both storage variants share one definition of
//! "matches" and one ordering.

use std::cmp::Ordering;

use super::entry::Entry;

/// Wildcard accepted in place of a category name.
pub const ALL_CATEGORIES: &str = "all";

/// Category restriction parsed from a query string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// No restriction.
    #[default]
    All,
    /// Keep entries whose category equals this value, ignoring case.
    Only(String),
}

impl CategoryFilter {
    /// Parse an optional raw category. Absent, blank or `all` (any case)
    /// means no restriction.
    ///
    /// # Examples
    /// ```
    /// use mimir::domain::CategoryFilter;
    ///
    /// assert_eq!(CategoryFilter::parse(Some("ALL")), CategoryFilter::All);
    /// assert_eq!(
    ///     CategoryFilter::parse(Some("Deity")),
    ///     CategoryFilter::Only("deity".into())
    /// );
    /// ```
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::All,
            Some(value) if value.eq_ignore_ascii_case(ALL_CATEGORIES) => Self::All,
            Some(value) => Self::Only(value.to_lowercase()),
        }
    }

    fn matches(&self, entry: &Entry) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => entry.category.as_str() == category,
        }
    }
}

/// Free-text query combined with a category restriction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntryFilter {
    needle: String,
    category: CategoryFilter,
}

impl EntryFilter {
    /// Build a filter from raw request values.
    ///
    /// The query is matched exactly as given, whitespace included; only an
    /// absent or empty query matches every entry.
    pub fn new(query: Option<&str>, category: Option<&str>) -> Self {
        Self {
            needle: query.unwrap_or_default().to_lowercase(),
            category: CategoryFilter::parse(category),
        }
    }

    /// True when neither the query nor the category narrows the result.
    pub fn is_unrestricted(&self) -> bool {
        self.needle.is_empty() && matches!(self.category, CategoryFilter::All)
    }

    /// True when the entry passes both the category and the text filter.
    ///
    /// The text filter looks for the query in the title, the description
    /// and each related term, all compared in lowercase.
    pub fn matches(&self, entry: &Entry) -> bool {
        if !self.category.matches(entry) {
            return false;
        }
        if self.needle.is_empty() {
            return true;
        }
        let needle = self.needle.as_str();
        entry.title.to_lowercase().contains(needle)
            || entry.description.to_lowercase().contains(needle)
            || entry
                .terms()
                .iter()
                .any(|term| term.to_lowercase().contains(needle))
    }

    /// Keep the matching entries and return them in title order.
    pub fn apply(&self, entries: impl IntoIterator<Item = Entry>) -> Vec<Entry> {
        let mut matched: Vec<Entry> = entries
            .into_iter()
            .filter(|entry| self.matches(entry))
            .collect();
        sort_entries(&mut matched);
        matched
    }
}

/// Sort entries into the canonical listing order.
///
/// Titles are compared with [`compare_titles`]; identical titles fall back to
/// creation time and then the identifier so the order is total.
pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by(|left, right| {
        compare_titles(&left.title, &right.title)
            .then_with(|| left.created_at.cmp(&right.created_at))
            .then_with(|| left.id.as_uuid().cmp(right.id.as_uuid()))
    });
}

/// Compare titles the way a reader expects an index to be ordered.
///
/// Case and Latin diacritics are ignored first (`Mjölnir` sorts with
/// `Mjolnir`, `Æsir` with `Aesir`), then case-folded text breaks ties, then
/// case with lowercase first (`odin` before `Odin`), and finally raw code
/// points.
///
/// # Examples
/// ```
/// use std::cmp::Ordering;
/// use mimir::domain::compare_titles;
///
/// assert_eq!(compare_titles("Ragnarök", "Ran"), Ordering::Less);
/// assert_eq!(compare_titles("freya", "Odin"), Ordering::Less);
/// ```
pub fn compare_titles(left: &str, right: &str) -> Ordering {
    collation_key(left)
        .cmp(&collation_key(right))
        .then_with(|| left.to_lowercase().cmp(&right.to_lowercase()))
        .then_with(|| case_key(left).cmp(case_key(right)))
        .then_with(|| left.cmp(right))
}

fn case_key(title: &str) -> impl Iterator<Item = bool> + '_ {
    title.chars().map(char::is_uppercase)
}

fn collation_key(title: &str) -> String {
    let mut key = String::with_capacity(title.len());
    for ch in title.chars().flat_map(char::to_lowercase) {
        match fold_diacritic(ch) {
            Some(folded) => key.push_str(folded),
            None => key.push(ch),
        }
    }
    key
}

fn fold_diacritic(ch: char) -> Option<&'static str> {
    let folded = match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'æ' | 'ǣ' => "ae",
        'ç' | 'ć' | 'č' => "c",
        'ð' | 'ď' | 'đ' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => "e",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' => "i",
        'ł' | 'ľ' => "l",
        'ñ' | 'ń' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ǫ' | 'ő' => "o",
        'œ' => "oe",
        'ř' => "r",
        'ś' | 'š' => "s",
        'ß' => "ss",
        'ť' => "t",
        'þ' => "th",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    };
    Some(folded)
}

#[cfg(test)]
mod tests;
