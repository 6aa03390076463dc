// Terminal rendering for derived views.
//
// Every function returns the rendered text so the caller decides where it
// goes (stdout in the menu, a buffer in tests).
use crate::types::{CrossTab, FrequencyTable, MonthlySeries, SocietyProfileView, TokenFrequency};
use crate::util::{format_int, format_percent};
use tabled::{builder::Builder, settings::Style, Table, Tabled};

const BAR_WIDTH: usize = 40;
const BAR_CHAR: char = '█';

pub fn markdown_table<T>(rows: &[T]) -> String
where
    T: Tabled + Clone,
{
    if rows.is_empty() {
        return no_data();
    }
    Table::new(rows.to_vec()).with(Style::markdown()).to_string()
}

pub fn no_data() -> String {
    "(no data)".to_string()
}

/// Horizontal bar scaled so that `max` fills the full width. Non-zero values
/// always get at least one block.
pub fn bar(value: usize, max: usize, width: usize) -> String {
    if value == 0 || max == 0 {
        return String::new();
    }
    let len = ((value as f64 / max as f64) * width as f64).round() as usize;
    BAR_CHAR.to_string().repeat(len.clamp(1, width))
}

pub fn render_profile(view: &SocietyProfileView) -> String {
    let mut out = markdown_table(std::slice::from_ref(&view.profile));
    out.push_str("\n\n");
    out.push_str(&markdown_table(&view.areas));
    out
}

/// Bar chart with one labelled bar per category.
pub fn render_bar_chart(table: &FrequencyTable) -> String {
    if table.is_empty() {
        return no_data();
    }
    let max = table.rows.iter().map(|r| r.count).max().unwrap_or(0);
    let label_width = table
        .rows
        .iter()
        .map(|r| r.category.chars().count())
        .max()
        .unwrap_or(0);
    table
        .rows
        .iter()
        .map(|r| {
            format!(
                "{:<label_width$} | {} {}",
                r.category,
                bar(r.count, max, BAR_WIDTH),
                format_int(r.count)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pie chart rendered as shares of the total.
pub fn render_pie_chart(table: &FrequencyTable) -> String {
    let shares = table.percentages();
    if shares.is_empty() {
        return no_data();
    }
    let mut builder = Builder::default();
    builder.push_record([table.dimension.clone(), "Share".to_string(), String::new()]);
    for (category, pct) in shares {
        builder.push_record([
            category.to_string(),
            format_percent(pct),
            bar(pct.round() as usize, 100, BAR_WIDTH),
        ]);
    }
    builder.build().with(Style::markdown()).to_string()
}

pub fn render_series(series: &MonthlySeries) -> String {
    if series.is_empty() {
        return no_data();
    }
    let max = series.max_count();
    series
        .points
        .iter()
        .map(|p| format!("{} | {} {}", p.month, bar(p.count, max, BAR_WIDTH), p.count))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Cross-tabulation with a total per row, the text form of a stacked bar chart.
pub fn render_crosstab(tab: &CrossTab) -> String {
    if tab.is_empty() {
        return no_data();
    }
    let mut builder = Builder::default();
    let mut header = vec!["State".to_string()];
    header.extend(tab.column_labels.iter().cloned());
    header.push("Total".to_string());
    builder.push_record(header);
    for (i, label) in tab.row_labels.iter().enumerate() {
        let mut record = vec![label.clone()];
        record.extend(tab.counts[i].iter().map(|c| c.to_string()));
        record.push(tab.row_total(i).to_string());
        builder.push_record(record);
    }
    builder.build().with(Style::markdown()).to_string()
}

/// The word cloud as a ranked list; bar length follows each word's weight.
pub fn render_word_cloud(freq: &TokenFrequency, max_rows: usize) -> String {
    if freq.is_empty() {
        return no_data();
    }
    let width = freq
        .entries
        .iter()
        .take(max_rows)
        .map(|e| e.token.chars().count())
        .max()
        .unwrap_or(0);
    freq.entries
        .iter()
        .take(max_rows)
        .map(|e| {
            let len = ((e.weight * BAR_WIDTH as f64).round() as usize).clamp(1, BAR_WIDTH);
            format!("{:<width$} {} {}", e.token, BAR_CHAR.to_string().repeat(len), e.count)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
