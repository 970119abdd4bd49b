mod parsers;
mod phylo;

pub type TreeFloat = f64;

/// Distance given to edges whose length is not stated.
pub const UNKNOWN_DISTANCE: TreeFloat = 0e0;

/// Terminus times closer to zero than this are reported as zero.
pub const TERMINUS_EPSILON: TreeFloat = 1e-4;

/// Digits per child index in series labels ("root.00.01").
pub const SERIES_INDEX_WIDTH: usize = 2;

pub use parsers::TreeParseError;
pub use parsers::newick::char_source::CharSource;
pub use parsers::newick::parse_newick;
pub use parsers::newick::read_newick;
pub use parsers::newick::read_newick_from;
pub use parsers::newick::write_newick;
pub use parsers::newick::write_newick_trees;
pub use phylo::CaicCode;
pub use phylo::CaicCodeError;
pub use phylo::Node;
pub use phylo::NodeId;
pub use phylo::PreservePolicy;
pub use phylo::TREE_NAME_PREFIX;
pub use phylo::TranslationTable;
pub use phylo::TranslationTableError;
pub use phylo::Tree;
pub use phylo::TreeError;
pub use phylo::TreeSummary;
pub use phylo::TreeWrangler;
pub use phylo::caic::char_to_index;
pub use phylo::caic::index_to_char;
pub use phylo::caic::next_char;
