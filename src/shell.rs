//! Navigation routes and plain-text rendering of the enquiry table.

use std::fmt::Write as _;
use std::str::FromStr;

use crate::dto::table::TablePageData;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Enquiries,
    Orders,
    Products,
    Reports,
    Settings,
}

impl Route {
    pub const ALL: [Route; 6] = [
        Route::Dashboard,
        Route::Enquiries,
        Route::Orders,
        Route::Products,
        Route::Reports,
        Route::Settings,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Route::Dashboard => "dashboard",
            Route::Enquiries => "enquiries",
            Route::Orders => "orders",
            Route::Products => "products",
            Route::Reports => "reports",
            Route::Settings => "settings",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::Enquiries => "Enquiries",
            Route::Orders => "Orders",
            Route::Products => "Products",
            Route::Reports => "Reports",
            Route::Settings => "Settings",
        }
    }

    /// Body of the pages that only carry a heading.
    pub fn placeholder(self) -> Option<&'static str> {
        match self {
            Route::Enquiries => None,
            Route::Dashboard => Some("Dashboard overview"),
            Route::Orders => Some("Orders management page"),
            Route::Products => Some("Products catalog page"),
            Route::Reports => Some("Reports and analytics page"),
            Route::Settings => Some("Application settings page"),
        }
    }
}

impl FromStr for Route {
    type Err = String;

    /// The empty path redirects to the enquiry table.
    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let path = path.trim().trim_matches('/');
        if path.is_empty() {
            return Ok(Route::Enquiries);
        }
        Route::ALL
            .into_iter()
            .find(|route| route.path().eq_ignore_ascii_case(path))
            .ok_or_else(|| format!("unknown route: {path}"))
    }
}

/// Renders the current table page as aligned text.
pub fn render_table(data: &TablePageData) -> String {
    let mut out = String::new();

    if data.loading {
        out.push_str("Loading enquiries...\n");
        return out;
    }
    if !data.search_text.is_empty() {
        let _ = writeln!(out, "Search: {}", data.search_text);
    }

    let _ = writeln!(
        out,
        "{:<12} {:<32} {:<20} {:<10} {:>8}",
        "ID", "Customer", "Date", "Status", "Products"
    );
    for row in &data.page.items {
        let _ = writeln!(
            out,
            "{:<12} {:<32} {:<20} {:<10} {:>8}",
            row.enquiry_id,
            row.customer_name,
            row.enquiry_datetime,
            row.status.as_str(),
            row.product_count
        );
    }

    if data.page.items.is_empty() {
        out.push_str("No enquiries found\n");
    }

    let pages = data
        .page
        .pages
        .iter()
        .map(|page| {
            if *page == data.page.page {
                format!("[{page}]")
            } else {
                page.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    let _ = writeln!(
        out,
        "Showing {} to {} of {} results  {}",
        data.page.start_index, data.page.end_index, data.page.total_items, pages
    );

    if let Some(modal) = &data.modal {
        let _ = writeln!(out, "{}: {}", modal.title, modal.subtitle);
    }

    out
}
