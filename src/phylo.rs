pub(crate) mod caic;
mod node;
mod time;
mod translation;
mod tree;
mod wrangler;

use crate::TreeFloat;

pub use caic::{CaicCode, CaicCodeError};
pub use node::{Node, NodeId};
pub use translation::{TranslationTable, TranslationTableError};
pub use tree::{PreservePolicy, Tree, TreeError, TreeSummary};
pub use wrangler::{TREE_NAME_PREFIX, TreeWrangler};
