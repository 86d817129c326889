//! Batch rendering of a markdown source tree into HTML fragment files.
//!
//! [`Scanner`] finds every `.md` page under a source directory and
//! [`FragmentBuilder`] renders them in parallel, writing one fragment per
//! page. Pages are rendered independently, so one unreadable page does not
//! stop the others.

mod builder;
mod scanner;
mod title;

pub use builder::{
    BuildConfig, BuildError, BuildReport, FragmentBuilder, PageError, WrittenPage,
};
pub use scanner::{PageRef, Scanner};
