pub mod importer;
pub mod seed;

pub use importer::{BulkImporter, SectionReport};
pub use seed::SeedFile;
