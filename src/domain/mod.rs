pub mod description;
pub mod item_link;
pub mod page;
pub mod review;

pub use description::*;
pub use item_link::*;
pub use page::*;
pub use review::*;
