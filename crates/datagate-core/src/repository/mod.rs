//! Generic repository bound to one resolved schema per request.

mod page;
#[allow(clippy::module_inception)]
mod repository;

pub use page::{PageQuery, PageResult};
pub use repository::{DynRepository, Repository};
