use super::*;

mod symbolic_own;
mod symbolic_ref;

mod matown;
mod matref;

pub use matown::*;
pub use matref::*;
pub use symbolic_own::*;
pub use symbolic_ref::*;
