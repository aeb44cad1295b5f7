use async_trait::async_trait;

use crate::error::RenderFault;

/// A browser session with a single mutable "current page".
///
/// Every method takes `&mut self`: one session drives one navigation at a
/// time, parallelism means more sessions.
#[async_trait]
pub trait Renderer: Send {
    async fn navigate(&mut self, url: &str) -> Result<(), RenderFault>;
    /// Markup of the page as it is rendered right now.
    async fn current_document(&mut self) -> Result<String, RenderFault>;
    async fn viewport_height(&mut self) -> Result<i64, RenderFault>;
    async fn document_height(&mut self) -> Result<i64, RenderFault>;
    async fn scroll_to(&mut self, y: i64) -> Result<(), RenderFault>;
}
