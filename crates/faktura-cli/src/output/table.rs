use faktura_core::economics::Discount;
use faktura_core::model::{AnalysisResult, ExtractionReport, MatchSource, Role, RoleAssignment};

pub fn print_analysis(result: &AnalysisResult, discount: Discount) {
    if let Some(ref backend) = result.backend {
        println!("Extracted via: {backend}");
    }
    print_assignment(&result.assignment);
    println!();

    if result.rows.is_empty() {
        println!("No rows to analyze.");
        return;
    }

    let name_width = result
        .rows
        .iter()
        .map(|r| r.item_name.len())
        .max()
        .unwrap_or(10)
        .max("Item Name".len());

    println!(
        "{:<width$}  {:>10}  {:>8}  {:>8}  {:>9}  {:>10}  {:>9}",
        "Item Name",
        "Price",
        "Paid",
        "Free",
        "Total",
        "Discounted",
        "Effective",
        width = name_width
    );
    for row in &result.rows {
        println!(
            "{:<width$}  {:>10}  {:>8}  {:>8}  {:>9}  {:>10}  {:>9}",
            row.item_name,
            row.original_price.to_string(),
            row.paid_qty.to_string(),
            row.free_qty.to_string(),
            row.total_qty.to_string(),
            row.discounted_unit_price.to_string(),
            row.effective_rate.to_string(),
            width = name_width
        );
    }

    println!();
    println!("Summary");
    println!("  Discount applied:           {}%", discount.percent());
    println!("  Total items:                {}", result.summary.item_count);
    println!("  Total paid qty:             {}", result.summary.total_paid_qty);
    println!("  Total free qty:             {}", result.summary.total_free_qty);
    println!(
        "  Total value after discount: {}",
        result.summary.total_value_after_discount
    );
}

pub fn format_extraction(report: &ExtractionReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("Extracted via: {}\n", report.backend));
    out.push_str(&format_assignment(&report.assignment));
    out.push('\n');

    for row in &report.rows {
        out.push_str(&format!(
            "  {}  price={} paid={} free={}\n",
            row.item_name, row.original_price, row.paid_qty, row.free_qty
        ));
    }
    if report.absent_cells > 0 {
        out.push_str(&format!(
            "\n{} cell(s) could not be parsed as numbers\n",
            report.absent_cells
        ));
    }
    out
}

fn print_assignment(assignment: &RoleAssignment) {
    print!("{}", format_assignment(assignment));
}

fn format_assignment(assignment: &RoleAssignment) -> String {
    let mut out = String::from("Detected columns:\n");
    for role in Role::ALL {
        match assignment.get(role) {
            Some(m) => {
                let source = match m.matched_by {
                    MatchSource::Header => "header",
                    MatchSource::Stats => "stats",
                    MatchSource::Manual => "manual",
                };
                out.push_str(&format!(
                    "  {:<9} -> '{}' ({}, confidence {:.2})\n",
                    role.to_string(),
                    m.column_name,
                    source,
                    m.confidence
                ));
            }
            None => {
                out.push_str(&format!("  {:<9} -> (default)\n", role.to_string()));
            }
        }
    }
    out
}
