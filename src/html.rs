use crate::error::{ImportError, Result};
use crate::types::TableRow;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

fn selector(css: &str) -> Selector {
    // Selectors used here are literals known to parse
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector '{css}': {e:?}"))
}

fn children_named<'a>(
    parent: ElementRef<'a>,
    names: &'a [&'a str],
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |child| names.contains(&child.value().name()))
}

/// Rows that belong to `table` itself, not to a table nested in one of its cells
fn own_rows(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let mut rows = Vec::new();
    for child in children_named(table, &["tr", "thead", "tbody", "tfoot"]) {
        if child.value().name() == "tr" {
            rows.push(child);
        } else {
            rows.extend(children_named(child, &["tr"]));
        }
    }
    rows
}

/// Read the rows of the first `<table>` in a submission body.
///
/// Each row carries the text of its own `<td>` cells; header cells, layout markup and
/// the rows of nested tables are ignored. A body without a table fails with
/// [`ImportError::MissingTable`].
pub fn parse_table_rows(submission: &str, body: &str) -> Result<Vec<TableRow>> {
    let document = Html::parse_document(body);
    let table_selector = selector("table");

    let table = document
        .select(&table_selector)
        .next()
        .ok_or_else(|| ImportError::MissingTable {
            submission: submission.to_string(),
        })?;

    let rows: Vec<TableRow> = own_rows(table)
        .into_iter()
        .map(|row| {
            TableRow::new(
                children_named(row, &["td"]).map(|cell| cell.text().collect::<String>()),
            )
        })
        .collect();

    debug!(submission, rows = rows.len(), "Parsed submission table");
    Ok(rows)
}
