use crate::{record::Record, value::Value};
use std::{fmt, sync::Arc};

pub type RenderFn = Arc<dyn Fn(&Record) -> String + Send + Sync>;

/// How to extract, label and render one column.
#[derive(Clone)]
pub struct ColumnSpec {
    pub id: String,
    pub header: String,
    /// Field name read from each record.
    pub accessor: String,
    pub render: Option<RenderFn>,
    pub sortable: bool,
    pub filterable: bool,
    pub visible: bool,
    pub currency: bool,
}

impl ColumnSpec {
    /// Column whose id and accessor are both `field`.
    pub fn new(field: impl Into<String>, header: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            id: field.clone(),
            header: header.into(),
            accessor: field,
            render: None,
            sortable: true,
            filterable: true,
            visible: true,
            currency: false,
        }
    }

    pub fn with_accessor(mut self, accessor: impl Into<String>) -> Self {
        self.accessor = accessor.into();
        self
    }

    pub fn with_render(mut self, render: impl Fn(&Record) -> String + Send + Sync + 'static) -> Self {
        self.render = Some(Arc::new(render));
        self
    }

    pub fn sortable(mut self, yes: bool) -> Self {
        self.sortable = yes;
        self
    }

    pub fn filterable(mut self, yes: bool) -> Self {
        self.filterable = yes;
        self
    }

    pub fn visible(mut self, yes: bool) -> Self {
        self.visible = yes;
        self
    }

    pub fn currency(mut self) -> Self {
        self.currency = true;
        self
    }

    pub fn raw<'r>(&self, record: &'r Record) -> &'r Value {
        record.value(&self.accessor)
    }

    /// Display text for a cell. A custom renderer wins, then currency
    /// formatting, then the plain value.
    pub fn display(&self, record: &Record) -> String {
        if let Some(render) = &self.render {
            return render(record);
        }
        let value = self.raw(record);
        match (self.currency, value.as_f64()) {
            (true, Some(n)) => format_currency(n).unwrap_or_else(|| value.to_string()),
            _ => value.to_string(),
        }
    }
}

impl fmt::Debug for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnSpec")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("accessor", &self.accessor)
            .field("render", &self.render.as_ref().map(|_| "<fn>"))
            .field("sortable", &self.sortable)
            .field("filterable", &self.filterable)
            .field("visible", &self.visible)
            .field("currency", &self.currency)
            .finish()
    }
}

/// US dollar formatting with thousands separators, e.g. `-$1,234.50`.
/// `None` when the amount has more cents than a `u64` holds.
pub fn format_currency(amount: f64) -> Option<String> {
    let scaled = (amount.abs() * 100.0).round();
    if !scaled.is_finite() || scaled >= u64::MAX as f64 {
        return None;
    }
    let cents = scaled as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    Some(format!("{sign}${grouped}.{:02}", cents % 100))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(0.0).as_deref(), Some("$0.00"));
        assert_eq!(format_currency(1234.5).as_deref(), Some("$1,234.50"));
        assert_eq!(format_currency(1_000_000.0).as_deref(), Some("$1,000,000.00"));
        assert_eq!(format_currency(-12.0).as_deref(), Some("-$12.00"));
        assert_eq!(format_currency(999.999).as_deref(), Some("$1,000.00"));
    }

    #[test]
    fn huge_amounts_fall_back_to_plain_number() {
        assert_eq!(format_currency(2e17), None);
        assert_eq!(format_currency(-1e300), None);
        let record = Record::new().with("cost", 2e17);
        let cost = ColumnSpec::new("cost", "Cost").currency();
        assert_eq!(cost.display(&record), Value::Number(2e17).to_string());
        assert!(!cost.display(&record).starts_with('$'));
    }

    #[test]
    fn display_prefers_renderer_then_currency() {
        let record = Record::new().with("cost", 2500.0).with("tag", "P-101");
        let cost = ColumnSpec::new("cost", "Cost").currency();
        assert_eq!(cost.display(&record), "$2,500.00");

        let tag = ColumnSpec::new("tag", "Tag").with_render(|r| format!("[{}]", r.value("tag")));
        assert_eq!(tag.display(&record), "[P-101]");

        let missing = ColumnSpec::new("owner", "Owner");
        assert_eq!(missing.display(&record), "");
    }
}
