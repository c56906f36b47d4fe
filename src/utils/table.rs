/// Column alignment in a text table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// A simple text-based table generator for terminal output
pub struct Table {
    headers: Vec<String>,
    aligns: Vec<Align>,
    rows: Vec<Vec<String>>,
    col_widths: Vec<usize>,
}

impl Table {
    /// Create a new table with the given headers, all columns left aligned
    pub fn new(headers: &[&str]) -> Self {
        let col_widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        Table {
            aligns: vec![Align::Left; headers.len()],
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
            col_widths,
        }
    }

    /// Set the alignment of one column
    pub fn align(mut self, column: usize, align: Align) -> Self {
        if let Some(slot) = self.aligns.get_mut(column) {
            *slot = align;
        }
        self
    }

    /// Add a row to the table
    pub fn add_row(&mut self, row: Vec<String>) {
        // Update column widths if needed
        for (i, col) in row.iter().enumerate() {
            if i < self.col_widths.len() {
                self.col_widths[i] = self.col_widths[i].max(col.chars().count());
            }
        }

        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Render the table as plain text, one line per row
    pub fn render(&self) -> String {
        let mut output = String::new();

        output.push_str(&self.render_row(&self.headers));
        output.push('\n');
        output.push_str(&self.render_separator());
        output.push('\n');

        for row in &self.rows {
            output.push_str(&self.render_row(row));
            output.push('\n');
        }

        output
    }

    /// Render a single row with proper spacing
    fn render_row(&self, row: &[String]) -> String {
        let cells: Vec<String> = row
            .iter()
            .zip(self.col_widths.iter().zip(self.aligns.iter()))
            .map(|(col, (&width, align))| match align {
                Align::Left => format!("{:<width$}", col, width = width),
                Align::Right => format!("{:>width$}", col, width = width),
            })
            .collect();
        cells.join(" | ").trim_end().to_string()
    }

    /// Render a separator line
    fn render_separator(&self) -> String {
        self.col_widths
            .iter()
            .map(|&width| "-".repeat(width))
            .collect::<Vec<_>>()
            .join("-+-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_table() {
        let mut table = Table::new(&["Date", "Price"]).align(1, Align::Right);
        table.add_row(vec!["2023-11-14 22:13:20".to_string(), "$36,512.50".to_string()]);
        table.add_row(vec!["2023-11-15 22:13:20".to_string(), "$9.00".to_string()]);

        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(table.len(), 2);
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Date"));
        assert_eq!(lines[1], "--------------------+-----------");
        assert_eq!(lines[2], "2023-11-14 22:13:20 | $36,512.50");
        assert_eq!(lines[3], "2023-11-15 22:13:20 |      $9.00");
    }
}
