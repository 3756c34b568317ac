mod algorithms;
mod doubly_linked_list;
mod iter;
mod node;
mod position;
mod tests;

pub use doubly_linked_list::*;
pub use iter::*;
pub(crate) use node::*;
pub use position::*;
