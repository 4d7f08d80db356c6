// Session-scoped matching state and the views derived from it.
//
// State holders are plain owned values wired into a `ViewContext` when the
// view is constructed; derived lists are memoized on their inputs.

pub mod context;
pub mod matcher;
pub mod matching_state;
pub mod memo;
pub mod sort_state;
pub mod view;

pub use context::{ContextError, ViewContext, ViewContextBuilder};
pub use matcher::{match_products, normalize_name, MatchInfo, MatchSource, MatchedProduct, MATCH_KEY};
pub use matching_state::{MatchingState, MatchingValue};
pub use memo::{ByIdentity, Memo};
pub use sort_state::ProductSortState;
pub use view::ProductsView;
