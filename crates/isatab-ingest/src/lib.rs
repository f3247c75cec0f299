pub mod error;
pub mod investigation;
pub mod tsv;

pub use error::{IngestError, Result};
pub use investigation::{
    InvestigationBundle, LabelIssue, LoadedInvestigation, load_investigation,
};
pub use tsv::read_table;
