//! Column-aligned rendering of property listings.

use crate::reflect::PropertyInfo;

const GAP: usize = 2;

/// One line per row: name and value padded to their widest entry, then the
/// description. Trailing blanks are trimmed.
pub fn render_table(rows: &[PropertyInfo]) -> Vec<String> {
    let name_width = rows.iter().map(|r| r.name.chars().count()).max().unwrap_or(0);
    let value_width = rows.iter().map(|r| r.value.chars().count()).max().unwrap_or(0);
    rows.iter()
        .map(|row| {
            let line = format!(
                "{:name_w$}{:gap$}{:value_w$}{:gap$}{}",
                row.name,
                "",
                row.value,
                "",
                row.description,
                name_w = name_width,
                value_w = value_width,
                gap = GAP,
            );
            line.trim_end().to_string()
        })
        .collect()
}
