/// Ordered path or query arguments for one request.
///
/// Arguments keep call order. Values are stored verbatim: escaping is the
/// caller's job, before the value reaches this list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentList {
    values: Vec<String>,
}

impl ArgumentList {
    pub fn new() -> Self {
        ArgumentList::default()
    }

    /// Appends a path segment.
    pub fn add_path(&mut self, value: impl Into<String>) -> &mut Self {
        self.values.push(value.into());
        self
    }

    /// Appends a `key=value` query term.
    pub fn add_query(&mut self, key: &str, value: &str) -> &mut Self {
        self.values.push(format!("{}={}", key, value));
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    /// Drops every argument. Safe to call on an empty list.
    pub fn free_all(&mut self) {
        self.values.clear();
    }
}
