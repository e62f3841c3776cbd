pub mod csv_loader;
pub mod feed;

pub use csv_loader::{load_pools_csv, write_pools_csv, IngestError};
pub use feed::YieldsFeedClient;
