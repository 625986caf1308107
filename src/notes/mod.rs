mod citation;
mod load;
mod normalize;
mod order;
mod reference;
mod staging;

pub use citation::{
    Citation, DisplayNames, ManualCitation, ScriptureCitation, grammar_for, parse_citation,
};
pub use load::{LoadedRecords, load_records};
pub use normalize::{TagAccumulator, normalize_record};
pub use order::{CanonicalOrder, NoteSorter, WorkRank};
pub use reference::{UNRESOLVED_REFERENCE, render_reference, render_reference_line};
pub use staging::StagingStore;
