//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::fmt::Display;
use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use owo_colors::OwoColorize;
use rust_decimal::{Decimal, RoundingStrategy};
use tabled::{Table, Tabled, settings::Style};

use lendops_api::Page;

use crate::cli::{ColorMode, OutputFormat};

// ── Color ───────────────────────────────────────────────────────────

static COLOR: AtomicBool = AtomicBool::new(false);

/// Decide once per process whether status values get colored.
pub fn init_color(mode: ColorMode) {
    let enabled = match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    };
    COLOR.store(enabled, Ordering::Relaxed);
}

/// Color a lifecycle/status word by what it means for the operator.
pub fn status(value: impl Display) -> String {
    let text = value.to_string();
    if !COLOR.load(Ordering::Relaxed) {
        return text;
    }
    match text.to_ascii_uppercase().as_str() {
        "ACTIVE" | "APPROVED" | "DISBURSED" | "POSTED" | "PAID" | "CLOSED" | "RESOLVED" => {
            text.green().to_string()
        }
        "PENDING" | "OPEN" | "PARTIALLY_PAID" | "MEDIUM" => text.yellow().to_string(),
        "IN_ARREARS" | "REJECTED" | "WRITTEN_OFF" | "OVERDUE" | "HIGH" | "CRITICAL"
        | "REVERSED" => text.red().to_string(),
        _ => text,
    }
}

// ── Cell helpers ────────────────────────────────────────────────────

/// Empty string for `None`.
pub fn opt<T: Display>(value: Option<&T>) -> String {
    value.map(ToString::to_string).unwrap_or_default()
}

/// Two-decimal money figure, half-cents rounded away from zero.
pub fn money(value: Decimal) -> String {
    value
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .to_string()
}

pub fn opt_money(value: Option<Decimal>) -> String {
    value.map(money).unwrap_or_default()
}

// ── Render dispatchers ──────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render one page of results.
///
/// Structured formats keep the page metadata; the table gets a footer line.
pub fn render_page<T, R>(
    format: OutputFormat,
    page: &Page<T>,
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let table = render_list(format, &page.content, to_row, id_fn);
            format!(
                "{table}\nPage {} of {} ({} total)",
                page.number.saturating_add(1),
                page.total_pages.max(1),
                page.total_elements
            )
        }
        OutputFormat::Plain => render_list(format, &page.content, to_row, id_fn),
        OutputFormat::Json => render_json(page, false),
        OutputFormat::JsonCompact => render_json(page, true),
        OutputFormat::Yaml => render_yaml(page),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted string,
/// since single-item detail views don't use `Tabled` derive.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => id_fn(data),
    }
}

/// Aligned `label: value` lines for detail views, skipping empty values.
pub fn detail(fields: &[(&str, String)]) -> String {
    let shown: Vec<_> = fields.iter().filter(|(_, value)| !value.is_empty()).collect();
    let width = shown.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    shown
        .iter()
        .map(|(label, value)| format!("{label:<width$}  {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Print a confirmation line to stderr, respecting quiet mode.
pub fn print_done(message: &str, quiet: bool) {
    if !quiet {
        eprintln!("{message}");
    }
}

// ── Format-specific renderers ───────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.unwrap_or_else(|e| format!("{{\"error\": \"serialization failed: {e}\"}}"))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_else(|e| format!("error: serialization failed: {e}"))
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::*;

    #[derive(Serialize)]
    struct Item {
        id: &'static str,
        amount: Decimal,
    }

    #[derive(Tabled)]
    struct ItemRow {
        #[tabled(rename = "ID")]
        id: String,
    }

    fn row(item: &Item) -> ItemRow {
        ItemRow {
            id: item.id.into(),
        }
    }

    #[test]
    fn plain_emits_one_id_per_line() {
        let items = [
            Item { id: "L-1", amount: Decimal::ONE },
            Item { id: "L-2", amount: Decimal::TEN },
        ];
        let out = render_list(OutputFormat::Plain, &items, row, |i| i.id.into());
        assert_eq!(out, "L-1\nL-2");
    }

    #[test]
    fn page_json_keeps_metadata() {
        let page = Page::single(vec![Item { id: "C-1", amount: Decimal::ONE }]);
        let out = render_page(OutputFormat::JsonCompact, &page, row, |i| i.id.into());
        assert!(out.contains("\"totalElements\":1"), "{out}");
        assert!(out.contains("\"content\":[{\"id\":\"C-1\""), "{out}");
    }

    #[test]
    fn table_page_has_footer() {
        let page = Page::single(vec![Item { id: "C-1", amount: Decimal::ONE }]);
        let out = render_page(OutputFormat::Table, &page, row, |i| i.id.into());
        assert!(out.contains("C-1"));
        assert!(out.ends_with("Page 1 of 1 (1 total)"), "{out}");
    }

    #[test]
    fn detail_skips_empty_values_and_aligns() {
        let out = detail(&[
            ("ID", "L-1".into()),
            ("Purpose", String::new()),
            ("Status", "ACTIVE".into()),
        ]);
        assert_eq!(out, "ID      L-1\nStatus  ACTIVE");
    }

    #[test]
    fn money_rounds_to_cents() {
        assert_eq!(money(Decimal::new(12_3456, 4)), "12.35");
        assert_eq!(money(Decimal::new(2345, 3)), "2.35");
        assert_eq!(money(Decimal::new(-2345, 3)), "-2.35");
        assert_eq!(opt_money(None), "");
    }
}
