pub mod listing;

pub use listing::format_listing;
