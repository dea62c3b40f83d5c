//! CSV import and export for the ledger.
//!
//! Import understands a deliberately small dialect: fields are split on every
//! comma and quoting is not recognised. Export quotes any text field that
//! contains a comma, so a value with an embedded comma will not survive a
//! round trip through export and import.

use shared::{format_amount, AmountInput, ChildRecord};
use tracing::debug;

use super::commands::AddChildCommand;
use super::errors::LedgerError;

pub const EXPORT_HEADER: &str = "child,parent_email,amount,week,paid,date_paid,receipt_sent";

const NAME_COLUMN: &str = "child";
const EMAIL_COLUMN: &str = "parent_email";
const AMOUNT_COLUMN: &str = "amount";
const WEEK_COLUMN: &str = "week";

/// One importable row. Amount stays as text; the record store coerces it.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRow {
    pub name: String,
    pub email: String,
    pub amount: String,
    pub week: String,
}

impl From<CsvRow> for AddChildCommand {
    fn from(row: CsvRow) -> Self {
        Self {
            name: row.name,
            email: row.email,
            amount: Some(AmountInput::Text(row.amount)),
            week: Some(row.week),
        }
    }
}

/// Parse CSV text into importable rows, in file order.
///
/// Rows missing a name or email are dropped. Errors reject the whole input.
pub fn decode(text: &str) -> Result<Vec<CsvRow>, LedgerError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty());

    let header_line = lines
        .next()
        .ok_or_else(|| LedgerError::Parse("file has no header row".to_string()))?;
    let headers: Vec<String> = header_line
        .split(',')
        .map(|h| h.trim().to_lowercase())
        .collect();
    if headers.iter().all(String::is_empty) {
        return Err(LedgerError::Parse("header row has no column names".to_string()));
    }

    let column = |name: &str| headers.iter().position(|h| h == name);
    let name_idx = column(NAME_COLUMN);
    let email_idx = column(EMAIL_COLUMN);
    let amount_idx = column(AMOUNT_COLUMN);
    let week_idx = column(WEEK_COLUMN);

    let mut rows = Vec::new();
    let mut dropped = 0;
    for line in lines {
        let cols: Vec<&str> = line.split(',').collect();
        let field = |idx: Option<usize>| {
            idx.and_then(|i| cols.get(i))
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };

        let row = CsvRow {
            name: field(name_idx),
            email: field(email_idx),
            amount: field(amount_idx),
            week: field(week_idx),
        };
        if row.name.is_empty() || row.email.is_empty() {
            dropped += 1;
            continue;
        }
        rows.push(row);
    }

    debug!("Decoded {} CSV rows ({} dropped)", rows.len(), dropped);
    Ok(rows)
}

/// Render records as CSV in store order, without a trailing newline
pub fn encode(records: &[ChildRecord]) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(EXPORT_HEADER.to_string());

    for child in records {
        let row = [
            safe_csv(&child.name),
            safe_csv(&child.email),
            format_amount(child.amount),
            safe_csv(&child.week),
            yes_no(child.paid).to_string(),
            safe_csv(&child.date_paid),
            yes_no(child.receipt_sent).to_string(),
        ];
        lines.push(row.join(","));
    }

    lines.join("\n")
}

/// Download name for an export made on `date` (YYYY-MM-DD)
pub fn export_filename(date: &str) -> String {
    format!("weekly_payments_{}.csv", date)
}

fn safe_csv(value: &str) -> String {
    if value.contains(',') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
