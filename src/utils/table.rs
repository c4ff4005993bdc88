//! Plain-text table for CLI listings.
//!
//! Column widths grow to fit the widest cell; the configured width is a
//! minimum. Widths count chars, so cells must not carry ANSI codes (colour
//! whole lines after rendering instead).

pub struct Column {
    pub header: String,
    pub min_width: usize,
}

impl Column {
    pub fn new(header: &str, min_width: usize) -> Self {
        Self {
            header: header.to_string(),
            min_width,
        }
    }
}

pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                self.rows
                    .iter()
                    .filter_map(|r| r.get(i))
                    .map(|c| c.chars().count())
                    .chain([col.header.chars().count(), col.min_width])
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    /// Header line, then one line per row. Missing cells render blank and
    /// trailing padding is trimmed.
    pub fn render(&self) -> String {
        let widths = self.widths();
        let line = |cells: Vec<&str>| -> String {
            let joined = cells
                .iter()
                .zip(&widths)
                .map(|(cell, &w)| format!("{cell:<w$}"))
                .collect::<Vec<_>>()
                .join(" ");
            format!("{}\n", joined.trim_end())
        };

        let mut out = line(self.columns.iter().map(|c| c.header.as_str()).collect());
        for row in &self.rows {
            let cells = (0..self.columns.len())
                .map(|i| row.get(i).map(String::as_str).unwrap_or(""))
                .collect();
            out.push_str(&line(cells));
        }
        out
    }
}
