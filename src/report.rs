use serde::Serialize;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Meta {
    pub rows: usize,
}

/// A titled analytic result set.
#[derive(Debug, Serialize)]
pub struct Report<T> {
    pub title: String,
    pub rows: Vec<T>,
    pub meta: Meta,
}

impl<T: Serialize> Report<T> {
    pub fn new(title: impl Into<String>, rows: Vec<T>) -> Self {
        Self {
            title: title.into(),
            meta: Meta { rows: rows.len() },
            rows,
        }
    }

    /// Same report with every row turned into a JSON value, so reports of
    /// different row types fit one list.
    pub fn into_json(self) -> serde_json::Result<Report<serde_json::Value>> {
        let rows = self
            .rows
            .into_iter()
            .map(serde_json::to_value)
            .collect::<serde_json::Result<Vec<_>>>()?;
        Ok(Report {
            title: self.title,
            rows,
            meta: self.meta,
        })
    }
}
