pub mod csv;
pub mod xlsx;

/// Fixed export column order, shared by the spreadsheet and CSV writers.
pub const EXPORT_HEADERS: [&str; 7] = [
    "Item Name",
    "Original Price",
    "Paid Qty",
    "Free Qty",
    "Total Qty",
    "Discounted Unit Price",
    "Effective Rate",
];
