//! Domain-level command types.
//!
//! The REST layer maps the DTOs from the `shared` crate onto these before
//! calling into the record store.

use shared::{AmountInput, ChildRecord, CreateChildRequest, UpdateChildRequest};

/// Input for creating a child record (also produced by CSV import)
#[derive(Debug, Clone, Default)]
pub struct AddChildCommand {
    pub name: String,
    pub email: String,
    pub amount: Option<AmountInput>,
    pub week: Option<String>,
}

impl AddChildCommand {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            amount: None,
            week: None,
        }
    }

    pub fn with_amount(mut self, amount: impl Into<AmountInput>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    pub fn with_week(mut self, week: impl Into<String>) -> Self {
        self.week = Some(week.into());
        self
    }

    /// Fill an absent or blank amount/week from caller defaults
    pub fn with_defaults(mut self, default_amount: Option<f64>, default_week: &str) -> Self {
        let amount_missing = self.amount.as_ref().map_or(true, AmountInput::is_blank);
        if amount_missing {
            if let Some(amount) = default_amount {
                self.amount = Some(AmountInput::Number(amount));
            }
        }
        let week_missing = self.week.as_deref().map_or(true, str::is_empty);
        if week_missing && !default_week.is_empty() {
            self.week = Some(default_week.to_string());
        }
        self
    }
}

impl From<CreateChildRequest> for AddChildCommand {
    fn from(request: CreateChildRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
            amount: request.amount,
            week: request.week,
        }
    }
}

impl From<UpdateChildRequest> for AddChildCommand {
    fn from(request: UpdateChildRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
            amount: request.amount,
            week: request.week,
        }
    }
}

/// Shallow patch merged onto an existing record; `None` leaves a field alone
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChildPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub amount: Option<f64>,
    pub week: Option<String>,
    pub paid: Option<bool>,
    pub date_paid: Option<String>,
    pub receipt_sent: Option<bool>,
}

impl ChildPatch {
    pub fn receipt_sent() -> Self {
        Self {
            receipt_sent: Some(true),
            ..Default::default()
        }
    }

    pub fn apply(self, record: &mut ChildRecord) {
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(email) = self.email {
            record.email = email;
        }
        if let Some(amount) = self.amount {
            record.amount = amount;
        }
        if let Some(week) = self.week {
            record.week = week;
        }
        if let Some(paid) = self.paid {
            record.paid = paid;
        }
        if let Some(date_paid) = self.date_paid {
            record.date_paid = date_paid;
        }
        if let Some(receipt_sent) = self.receipt_sent {
            record.receipt_sent = receipt_sent;
        }
    }
}
