//! Result renderer: completed job payload → summary and escaped rows.

use std::fmt::Write;

use crate::{text, Failure, Item, SearchContext};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsView {
    pub summary: String,
    pub rows: Vec<ResultRow>,
    /// `summary` before escaping, for sinks that are not markup.
    pub plain_summary: String,
    /// `rows` before escaping; placeholders still apply.
    pub plain_rows: Vec<ResultRow>,
}

/// One table row. Fields in `ResultsView::rows` are escaped for markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub name: String,
    pub price: String,
    pub link: String,
    pub rating: String,
    pub sales: String,
}

/// Renders a completed job. An empty item list is a failure, not an empty
/// table.
pub fn render_results(items: &[Item], search: &SearchContext) -> Result<ResultsView, Failure> {
    if items.is_empty() {
        return Err(Failure::EmptyResult);
    }
    let summary_with = |wrap: fn(&str) -> String| {
        format!(
            "{count} produtos encontrados para '{term}' em {site}",
            count = items.len(),
            term = wrap(&search.term),
            site = wrap(&search.site_name),
        )
    };
    Ok(ResultsView {
        summary: summary_with(escape_html),
        rows: items.iter().map(|item| render_row(item, escape_html)).collect(),
        plain_summary: summary_with(str::to_string),
        plain_rows: items.iter().map(|item| render_row(item, str::to_string)).collect(),
    })
}

fn render_row(item: &Item, wrap: fn(&str) -> String) -> ResultRow {
    let field = |value: Option<&str>| wrap(present(value).unwrap_or(text::NOT_AVAILABLE));
    ResultRow {
        name: field(item.name.as_deref()),
        price: field(item.price.as_deref()),
        link: wrap(present(item.link.as_deref()).unwrap_or(text::LINK_PLACEHOLDER)),
        rating: field(item.rating.as_deref()),
        sales: field(item.sales_count.as_deref()),
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Escapes text for insertion into markup, attributes included.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

impl ResultsView {
    /// `<tr>` rows for adapters that render markup.
    pub fn to_html_rows(&self) -> String {
        let mut html = String::new();
        for row in &self.rows {
            let _ = write!(
                html,
                "<tr><td class=\"product-name\">{name}</td>\
                 <td class=\"product-price\">{price}</td>\
                 <td><a href=\"{link}\" target=\"_blank\" class=\"product-link\" \
                 rel=\"noopener noreferrer\">{label}</a></td>\
                 <td class=\"product-rating\">{rating}</td>\
                 <td>{sales}</td></tr>\n",
                name = row.name,
                price = row.price,
                link = row.link,
                label = text::LINK_LABEL,
                rating = row.rating,
                sales = row.sales,
            );
        }
        html
    }
}
