use crate::cli::DatasetKind;
use assetdesk::ColumnSpec;

/// Column layout for a dataset. Preset columns keep their order; fields
/// present in the file but not in the preset are appended hidden.
pub fn columns_for(kind: DatasetKind, fields: &[String]) -> Vec<ColumnSpec> {
    let preset: Vec<ColumnSpec> = match kind {
        DatasetKind::Rbi => vec![
            ColumnSpec::new("asset_tag", "Asset Tag"),
            ColumnSpec::new("equipment_type", "Equipment"),
            ColumnSpec::new("service", "Service"),
            ColumnSpec::new("pof", "PoF"),
            ColumnSpec::new("cof", "CoF"),
            ColumnSpec::new("risk_rank", "Risk"),
            ColumnSpec::new("last_inspection", "Last Inspection"),
            ColumnSpec::new("next_inspection", "Next Inspection"),
        ],
        DatasetKind::WorkOrders => vec![
            ColumnSpec::new("wo_number", "WO #"),
            ColumnSpec::new("asset_tag", "Asset"),
            ColumnSpec::new("description", "Description").sortable(false),
            ColumnSpec::new("priority", "Priority"),
            ColumnSpec::new("status", "Status"),
            ColumnSpec::new("estimated_cost", "Est. Cost").currency(),
            ColumnSpec::new("due_date", "Due"),
        ],
        DatasetKind::WorkRequests => vec![
            ColumnSpec::new("wr_number", "WR #"),
            ColumnSpec::new("asset_tag", "Asset"),
            ColumnSpec::new("requested_by", "Requested By"),
            ColumnSpec::new("priority", "Priority"),
            ColumnSpec::new("status", "Status"),
            ColumnSpec::new("requested_date", "Requested"),
        ],
        DatasetKind::Auto => Vec::new(),
    };

    let mut columns = preset;
    let hide_extra = kind != DatasetKind::Auto;
    for field in fields {
        if !columns.iter().any(|c| &c.accessor == field) {
            columns.push(ColumnSpec::new(field.clone(), header_for(field)).visible(!hide_extra));
        }
    }
    columns
}

/// `next_inspection` -> `Next Inspection`
pub fn header_for(field: &str) -> String {
    field
        .split(['_', '-', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
