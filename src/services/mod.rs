pub mod data_persistance;
pub mod description_scraper;
pub mod droid;
pub mod harvester;
pub mod html_text;
pub mod item_link_scraper;
pub mod normalizer;
pub mod pagination_walker;
pub mod renderer;
pub mod review_scraper;
pub mod scroll_driver;

pub use data_persistance::*;
pub use description_scraper::*;
pub use droid::*;
pub use harvester::*;
pub use item_link_scraper::*;
pub use normalizer::*;
pub use pagination_walker::*;
pub use renderer::*;
pub use review_scraper::*;
pub use scroll_driver::*;
