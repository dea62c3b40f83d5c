use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One child's payment-tracking entry.
///
/// Persisted with camelCase keys. Every field carries a default so that
/// partially written or older blobs still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ChildRecord {
    /// Opaque unique identifier (UUID v4), assigned at creation
    pub id: String,
    /// Child's display name
    pub name: String,
    /// Parent contact address
    pub email: String,
    /// Weekly amount owed, 0 when absent or unreadable
    #[serde(deserialize_with = "lenient_amount")]
    pub amount: f64,
    /// Free-form billing period label
    pub week: String,
    pub paid: bool,
    /// ISO date (YYYY-MM-DD), empty while unpaid
    pub date_paid: String,
    pub receipt_sent: bool,
}

/// Email provider configuration, stored as a single blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailSettings {
    pub public_key: String,
    pub service_id: String,
    pub template_paid: String,
    pub template_unpaid: String,
}

impl EmailSettings {
    /// Names of the fields that are still empty, in declaration order
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("publicKey", &self.public_key),
            ("serviceId", &self.service_id),
            ("templatePaid", &self.template_paid),
            ("templateUnpaid", &self.template_unpaid),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

/// Aggregate counts over the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    pub total: usize,
    pub paid: usize,
    pub owing: usize,
    pub receipts_sent: usize,
}

impl LedgerSummary {
    /// Status line shown when no transient message is active
    pub fn status_line(&self) -> String {
        format!(
            "Total: {} • Paid: {} • Owing: {} • Receipts sent: {}",
            self.total, self.paid, self.owing, self.receipts_sent
        )
    }
}

/// Amount as typed by a user or read from a CSV cell.
///
/// Form fields arrive as text while API clients usually send numbers;
/// both are accepted and coerced the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

impl AmountInput {
    pub fn value(&self) -> f64 {
        match self {
            AmountInput::Number(n) if n.is_finite() => *n,
            AmountInput::Number(_) => 0.0,
            AmountInput::Text(text) => coerce_amount(text),
        }
    }

    /// True for empty text, which callers treat like an absent amount
    pub fn is_blank(&self) -> bool {
        matches!(self, AmountInput::Text(text) if text.trim().is_empty())
    }
}

impl From<f64> for AmountInput {
    fn from(value: f64) -> Self {
        AmountInput::Number(value)
    }
}

impl From<&str> for AmountInput {
    fn from(value: &str) -> Self {
        AmountInput::Text(value.to_string())
    }
}

/// Parse a monetary amount, falling back to 0 for anything non-numeric.
/// Negative values are kept as given.
pub fn coerce_amount(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Format an amount with exactly two fractional digits
pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        Some(Value::String(s)) => coerce_amount(&s),
        _ => 0.0,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateChildRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub amount: Option<AmountInput>,
    #[serde(default)]
    pub week: Option<String>,
}

/// Edit-dialog payload; same shape and rules as creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateChildRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub amount: Option<AmountInput>,
    #[serde(default)]
    pub week: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetPaidRequest {
    pub paid: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildResponse {
    pub child: ChildRecord,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildListResponse {
    pub children: Vec<ChildRecord>,
    pub summary: LedgerSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportCsvResponse {
    pub imported: usize,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendReceiptsResponse {
    pub sent: usize,
    pub failed: usize,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsResponse {
    pub settings: EmailSettings,
    pub success_message: String,
}
