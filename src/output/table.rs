//! Table rendering for query results

use unicode_width::UnicodeWidthStr;

use super::formatter::{BorderFormat, FormatOptions};
use crate::db::{Cell, CellValue, ColumnType, ResultSet};

/// Display width of a formatted `RDB$DB_KEY` value
pub const DB_KEY_WIDTH: usize = 16;

/// Render the header and rows of a result.
///
/// Returns an empty string when there are no rows. The row count footer
/// is left to the caller.
pub fn render(result: &ResultSet, opts: &FormatOptions) -> String {
    let mut out = String::new();
    if result.ntuples() == 0 {
        return out;
    }

    let border = opts.border.format();
    let aligned = opts.alignment.is_aligned();
    let widths: Vec<usize> = (0..result.nfields())
        .map(|col| column_width(result, col, opts))
        .collect();

    if let Some(header) = &opts.header {
        if aligned {
            let total: usize = widths.iter().sum::<usize>() + result.nfields() * 3;
            let header_width = UnicodeWidthStr::width(header.as_str());
            let field = total - total.saturating_sub(header_width) / 2;
            out.push_str(&pad_left(header, header_width, field));
        } else {
            out.push_str(header);
        }
        out.push('\n');
    }

    let labels: Vec<String> = result
        .columns()
        .iter()
        .map(|column| {
            if opts.fold_labels {
                fold_label(&column.name)
            } else {
                column.name.clone()
            }
        })
        .collect();

    for (col, label) in labels.iter().enumerate() {
        if col > 0 {
            out.push_str(border.divider);
        }
        let numeric = result.columns()[col].column_type.is_numeric();
        out.push_str(&format_cell(label, widths[col], numeric, aligned, &border));
    }
    out.push('\n');

    if aligned {
        let underline: Vec<String> = widths
            .iter()
            .map(|w| {
                let len = if border.padding { w + 2 } else { *w };
                border.underline.to_string().repeat(len)
            })
            .collect();
        out.push_str(&underline.join(border.junction));
        out.push('\n');
    }

    for row in result.rows() {
        for (col, cell) in row.iter().enumerate() {
            if col > 0 {
                out.push_str(border.divider);
            }
            let column_type = result.columns()[col].column_type;
            let value = display_value(cell, column_type, opts);
            out.push_str(&format_cell(
                &value,
                widths[col],
                column_type.is_numeric(),
                aligned,
                &border,
            ));
        }
        out.push('\n');
    }

    out
}

/// Fold a label to lowercase if it is entirely uppercase as given
pub fn fold_label(label: &str) -> String {
    if label.to_uppercase() == label {
        label.to_lowercase()
    } else {
        label.to_string()
    }
}

/// Hex representation of a binary row locator
pub fn format_db_key(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

fn column_width(result: &ResultSet, col: usize, opts: &FormatOptions) -> usize {
    if result.columns()[col].column_type == ColumnType::DbKey {
        return DB_KEY_WIDTH;
    }

    let label_width = UnicodeWidthStr::width(result.columns()[col].name.as_str());
    let mut width = result.column_max_width(col).max(label_width);

    if result.column_has_null(col) {
        width = width.max(UnicodeWidthStr::width(opts.null_display.as_str()));
    }
    width
}

fn display_value(cell: &Cell, column_type: ColumnType, opts: &FormatOptions) -> String {
    match cell.value() {
        None => opts.null_display.clone(),
        Some(CellValue::Text(s)) => s.clone(),
        Some(CellValue::Binary(bytes)) if column_type == ColumnType::DbKey => format_db_key(bytes),
        Some(CellValue::Binary(bytes)) => hex::encode(bytes),
    }
}

fn format_cell(
    value: &str,
    width: usize,
    numeric: bool,
    aligned: bool,
    border: &BorderFormat,
) -> String {
    if !aligned {
        return value.to_string();
    }

    let value_width = UnicodeWidthStr::width(value);
    let body = if numeric {
        pad_left(value, value_width, width)
    } else {
        pad_right(value, value_width, width)
    };

    if border.padding {
        format!(" {} ", body)
    } else {
        body
    }
}

fn pad_left(value: &str, value_width: usize, width: usize) -> String {
    let mut s = " ".repeat(width.saturating_sub(value_width));
    s.push_str(value);
    s
}

fn pad_right(value: &str, value_width: usize, width: usize) -> String {
    let mut s = value.to_string();
    s.push_str(&" ".repeat(width.saturating_sub(value_width)));
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Column;
    use crate::output::formatter::{Alignment, BorderStyle};

    fn sample() -> ResultSet {
        ResultSet::tuples(
            vec![
                Column::new("C1", ColumnType::Text),
                Column::new("C2", ColumnType::Integer),
            ],
            vec![
                vec![Cell::text("a"), Cell::text("1")],
                vec![Cell::text("bb"), Cell::text("22")],
            ],
        )
    }

    #[test]
    fn test_golden_minimal_border() {
        let opts = FormatOptions::default().titled("t");
        let out = render(&sample(), &opts);

        let expected = concat!(
            "     t\n",
            " c1 | c2 \n",
            "----+----\n",
            " a  |  1 \n",
            " bb | 22 \n",
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn test_classic_border() {
        let opts = FormatOptions {
            border: BorderStyle::Classic,
            ..FormatOptions::default()
        };
        let out = render(&sample(), &opts);

        assert_eq!(out, "c1 c2\n== ==\na   1\nbb 22\n");
    }

    #[test]
    fn test_unaligned_has_no_padding() {
        let opts = FormatOptions {
            alignment: Alignment::Unaligned,
            ..FormatOptions::default()
        };
        let out = render(&sample(), &opts);

        assert_eq!(out, "c1|c2\na|1\nbb|22\n");
    }

    #[test]
    fn test_zero_rows_render_nothing() {
        let result = ResultSet::tuples(vec![Column::new("A", ColumnType::Text)], Vec::new());
        assert_eq!(render(&result, &FormatOptions::default()), "");
    }

    #[test]
    fn test_null_placeholder_widens_column() {
        let result = ResultSet::tuples(
            vec![Column::new("X", ColumnType::Text)],
            vec![vec![Cell::text("a")], vec![Cell::null()]],
        );
        let opts = FormatOptions {
            null_display: "<null>".to_string(),
            ..FormatOptions::default()
        };
        let out = render(&result, &opts);

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[1], "--------");
        assert_eq!(lines[2], " a      ");
        assert_eq!(lines[3], " <null> ");
    }

    #[test]
    fn test_null_placeholder_narrower_than_values() {
        let result = ResultSet::tuples(
            vec![Column::new("X", ColumnType::Text)],
            vec![vec![Cell::text("abcdefg")], vec![Cell::null()]],
        );
        let opts = FormatOptions {
            null_display: "NULL".to_string(),
            ..FormatOptions::default()
        };

        assert_eq!(column_width(&result, 0, &opts), 7);
        let out = render(&result, &opts);
        assert_eq!(out.lines().nth(3), Some(" NULL    "));
    }

    #[test]
    fn test_value_wider_than_column_is_not_truncated() {
        let border = BorderStyle::Minimal.format();

        assert_eq!(format_cell("abcdefghij", 4, false, true, &border), " abcdefghij ");
        assert_eq!(format_cell("123456", 2, true, true, &border), " 123456 ");
    }

    #[test]
    fn test_binary_cells_render_as_lowercase_hex() {
        let result = ResultSet::tuples(
            vec![Column::new("B", ColumnType::Blob)],
            vec![vec![Cell::binary(vec![0xde, 0xad, 0x01])]],
        );
        let out = render(&result, &FormatOptions::default());
        assert_eq!(out.lines().nth(2), Some(" dead01 "));
    }

    #[test]
    fn test_width_uses_display_columns() {
        let result = ResultSet::tuples(
            vec![Column::new("N", ColumnType::Text)],
            vec![vec![Cell::text("日本")], vec![Cell::text("abc")]],
        );
        let out = render(&result, &FormatOptions::default());

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[1], "------");
        assert_eq!(lines[2], " 日本 ");
        assert_eq!(lines[3], " abc  ");
    }

    #[test]
    fn test_label_folding() {
        assert_eq!(fold_label("RDB$RELATION_NAME"), "rdb$relation_name");
        assert_eq!(fold_label("MixedCase"), "MixedCase");
        assert_eq!(fold_label("lower"), "lower");
    }

    #[test]
    fn test_db_key_has_fixed_width() {
        let result = ResultSet::tuples(
            vec![Column::new("DB_KEY", ColumnType::DbKey)],
            vec![vec![Cell::binary(vec![0x00, 0x80, 0x12, 0xab])]],
        );
        let out = render(&result, &FormatOptions::default());

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], format!(" {:<16} ", "db_key"));
        assert_eq!(lines[2], format!(" {:<16} ", "008012AB"));
    }

    #[test]
    fn test_label_mixed_case_untouched() {
        let result = ResultSet::tuples(
            vec![Column::new("Name", ColumnType::Text)],
            vec![vec![Cell::text("x")]],
        );
        let out = render(&result, &FormatOptions::default());
        assert!(out.starts_with(" Name \n"));
    }
}
