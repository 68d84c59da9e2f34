//! Plain-text tables with ASCII borders and word wrapping

/// A table whose columns shrink and wrap to fit `max_width`
#[derive(Debug, Clone)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    max_width: usize,
}

impl Table {
    /// Create a table with the given header
    pub fn new<S: Into<String>>(header: impl IntoIterator<Item = S>, max_width: usize) -> Self {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            max_width,
        }
    }

    /// Append a row; missing cells render empty and extra cells are dropped
    pub fn add_row(&mut self, row: Vec<String>) {
        let mut row = row;
        row.resize(self.header.len(), String::new());
        self.rows.push(row);
    }

    /// Column widths after shrinking to fit
    fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = (0..self.header.len())
            .map(|col| {
                std::iter::once(&self.header[col])
                    .chain(self.rows.iter().map(|row| &row[col]))
                    .flat_map(|cell| cell.lines())
                    .map(|line| line.chars().count())
                    .max()
                    .unwrap_or(0)
                    .max(1)
            })
            .collect();

        // "| " + " | " between columns + " |"
        let overhead = 3 * widths.len() + 1;
        let available = self.max_width.saturating_sub(overhead).max(widths.len());

        while widths.iter().sum::<usize>() > available {
            let Some((widest, width)) = widths
                .iter()
                .copied()
                .enumerate()
                .max_by_key(|&(_, width)| width)
            else {
                break;
            };
            if width <= 1 {
                break;
            }
            widths[widest] -= 1;
        }

        widths
    }

    /// Render the table
    pub fn draw(&self) -> String {
        if self.header.is_empty() {
            return String::new();
        }

        let widths = self.column_widths();
        let rule = |fill: char| -> String {
            let mut line = String::from("+");
            for width in &widths {
                line.extend(std::iter::repeat(fill).take(width + 2));
                line.push('+');
            }
            line.push('\n');
            line
        };

        let mut output = rule('-');
        output.push_str(&draw_row(&self.header, &widths));
        output.push_str(&rule('='));
        for row in &self.rows {
            output.push_str(&draw_row(row, &widths));
            output.push_str(&rule('-'));
        }
        if self.rows.is_empty() {
            output.push_str(&rule('-'));
        }

        output
    }
}

fn draw_row(cells: &[String], widths: &[usize]) -> String {
    let wrapped: Vec<Vec<String>> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| wrap(cell, width))
        .collect();
    let height = wrapped.iter().map(Vec::len).max().unwrap_or(1);

    let mut output = String::new();
    for line in 0..height {
        output.push('|');
        for (cell, &width) in wrapped.iter().zip(widths) {
            let text = cell.get(line).map(String::as_str).unwrap_or("");
            output.push_str(&format!(" {:<width$} |", text, width = width));
        }
        output.push('\n');
    }
    output
}

/// Wrap `text` at word boundaries, breaking words longer than `width`
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut len = 0;

        for word in paragraph.split_whitespace() {
            let mut chars: Vec<char> = word.chars().collect();

            while chars.len() > width {
                if len > 0 {
                    lines.push(std::mem::take(&mut line));
                    len = 0;
                }
                lines.push(chars[..width].iter().collect());
                chars.drain(..width);
            }

            if chars.is_empty() {
                continue;
            }

            if len > 0 && len + 1 + chars.len() > width {
                lines.push(std::mem::take(&mut line));
                len = 0;
            }
            if len > 0 {
                line.push(' ');
                len += 1;
            }
            len += chars.len();
            line.extend(chars);
        }

        if len > 0 || lines.is_empty() || paragraph.trim().is_empty() {
            lines.push(line);
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_draw_natural_width() {
        let mut table = Table::new(["Name", "Version"], 80);
        table.add_row(vec!["django".to_string(), "1.0".to_string()]);

        let expected = "\
+--------+---------+
| Name   | Version |
+========+=========+
| django | 1.0     |
+--------+---------+
";
        assert_eq!(table.draw(), expected);
    }

    #[test]
    fn test_draw_wraps_to_max_width() {
        let mut table = Table::new(["Name", "Title"], 24);
        table.add_row(vec![
            "a".to_string(),
            "one two three four".to_string(),
        ]);

        let drawn = table.draw();
        for line in drawn.lines() {
            assert!(line.chars().count() <= 24, "line too wide: {:?}", line);
        }
        assert!(drawn.contains("| a    | one two three |"));
        assert!(drawn.contains(&format!("| {:<4} | {:<13} |", "", "four")));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let mut table = Table::new(["A", "B"], 80);
        table.add_row(vec!["x".to_string()]);
        assert!(table.draw().contains("| x | "));
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("", 5), vec![""]);
        assert_eq!(wrap("ab cd ef", 5), vec!["ab cd", "ef"]);
        assert_eq!(wrap("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap("a\nb", 10), vec!["a", "b"]);
    }
}
