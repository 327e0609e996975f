/// Declarative description of a table column.
#[derive(Debug, Clone)]
pub struct TableColumn {
    pub header: String,
    pub width: usize,
    pub right_align: bool,
}

impl TableColumn {
    pub fn new(header: impl Into<String>, width: usize) -> Self {
        Self {
            header: header.into(),
            width,
            right_align: false,
        }
    }

    /// Right-aligned column, for amounts.
    pub fn numeric(header: impl Into<String>, width: usize) -> Self {
        Self {
            right_align: true,
            ..Self::new(header, width)
        }
    }
}

/// Simple table model used for rendering read-only overviews.
#[derive(Debug, Clone)]
pub struct Table {
    pub title: Option<String>,
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(title: Option<impl Into<String>>, columns: Vec<TableColumn>) -> Self {
        Self {
            title: title.map(Into::into),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn add_row<S: Into<String>>(&mut self, cells: Vec<S>) {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }
}

/// Renders [`Table`] instances using simple padded columns.
pub struct TableRenderer;

impl TableRenderer {
    pub fn render_to_string(table: &Table) -> String {
        let mut lines = Vec::new();
        if let Some(title) = &table.title {
            lines.push(title.clone());
        }
        let widths: Vec<usize> = table
            .columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                table
                    .rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| cell.chars().count())
                    .chain([column.width, column.header.chars().count()])
                    .max()
                    .unwrap_or(column.width)
            })
            .collect();

        if !table.columns.is_empty() {
            let total = widths.iter().map(|width| width + 1).sum::<usize>().max(1);
            let header: Vec<String> = table
                .columns
                .iter()
                .zip(&widths)
                .map(|(column, width)| pad(&column.header, *width, column.right_align))
                .collect();
            lines.push("-".repeat(total));
            lines.push(header.join(" ").trim_end().to_string());
            lines.push("-".repeat(total));
        }

        for row in &table.rows {
            let cells: Vec<String> = table
                .columns
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(idx, (column, width))| {
                    let cell = row.get(idx).map(String::as_str).unwrap_or("");
                    pad(cell, *width, column.right_align)
                })
                .collect();
            lines.push(cells.join(" ").trim_end().to_string());
        }
        lines.join("\n")
    }

    pub fn render(table: &Table) {
        println!("{}", Self::render_to_string(table));
    }
}

fn pad(text: &str, width: usize, right: bool) -> String {
    if right {
        format!("{text:>width$}")
    } else {
        format!("{text:<width$}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_grow_to_fit_content() {
        let mut table = Table::new(
            Some("Chart"),
            vec![TableColumn::new("Name", 4), TableColumn::numeric("Balance", 4)],
        );
        table.add_row(vec!["Member Fees", "-100.00"]);
        table.add_row(vec!["Cash", "100.00"]);

        let rendered = TableRenderer::render_to_string(&table);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Chart");
        assert_eq!(lines[2], "Name        Balance");
        assert_eq!(lines[4], "Member Fees -100.00");
        assert_eq!(lines[5], "Cash         100.00");
    }
}
