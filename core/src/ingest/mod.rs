pub mod coordinates;
pub mod parser;
pub mod record;
pub mod source;
pub mod table;

pub use coordinates::CoordinateValidator;
pub use parser::RecordParser;
pub use record::{DetectionRecord, CRITICAL_PEOPLE_THRESHOLD};
pub use source::{fetch_detached, DetectionSource, FileSource, TextSource};
pub use table::DetectionTable;
