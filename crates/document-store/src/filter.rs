use serde_json::Value;

use crate::store::Document;

/// A single predicate on a top-level document field.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// The field holds exactly this JSON value.
    Eq { field: String, value: Value },

    /// The field is a string containing `needle`, ignoring case.
    ///
    /// The needle is matched literally. An empty needle matches every
    /// document, including ones without the field.
    ContainsIgnoreCase { field: String, needle: String },
}

impl Condition {
    /// Evaluates the condition against a document.
    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Condition::Eq { field, value } => document.get(field) == Some(value),
            Condition::ContainsIgnoreCase { field, needle } => {
                if needle.is_empty() {
                    return true;
                }
                document
                    .get(field)
                    .and_then(Value::as_str)
                    .is_some_and(|s| s.to_lowercase().contains(&needle.to_lowercase()))
            }
        }
    }
}

/// Builder for document filters.
///
/// All conditions must hold for a document to match. An empty filter
/// matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    /// Creates a new empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a filter matching a single field value.
    pub fn by(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new().eq(field, value)
    }

    /// Requires `field` to equal `value`.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Eq {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Requires `field` to contain `needle`, case-insensitively.
    pub fn contains_ignore_case(
        mut self,
        field: impl Into<String>,
        needle: impl Into<String>,
    ) -> Self {
        self.conditions.push(Condition::ContainsIgnoreCase {
            field: field.into(),
            needle: needle.into(),
        });
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Returns true if every condition holds for the document.
    pub fn matches(&self, document: &Document) -> bool {
        self.conditions.iter().all(|c| c.matches(document))
    }
}

/// Sort order for [`Sort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Sort specification for multi-document queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// A 1-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
}

impl PageRequest {
    /// Creates a page window. A page of 0 is treated as the first page.
    pub fn new(page: u64, size: u64) -> Self {
        Self {
            page: page.max(1),
            size,
        }
    }

    /// Number of matching documents to skip.
    pub fn offset(&self) -> u64 {
        (self.page.max(1) - 1).saturating_mul(self.size)
    }
}

/// A window of query results together with the total number of matches.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Count of all matching documents, irrespective of the window.
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }

    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Converts every item, failing on the first conversion error.
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        let items = self.items.into_iter().map(f).collect::<Result<Vec<_>, _>>()?;
        Ok(Page {
            items,
            total: self.total,
        })
    }
}
