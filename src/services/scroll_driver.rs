use std::time::Duration;

use crate::error::RenderFault;

use super::Renderer;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSettings {
    pub viewport_fraction: f64,
    pub step_delay: Duration,
    pub settle_delay: Duration,
}

/// Scrolls the current page down in viewport-sized steps until a full pass
/// ends without the document growing, so lazily loaded nodes are all present.
///
/// There is no iteration cap: a page that grows on every pass keeps this
/// looping.
pub async fn settle<R: Renderer + ?Sized>(
    renderer: &mut R,
    settings: &ScrollSettings,
) -> Result<(), RenderFault> {
    let viewport_height = renderer.viewport_height().await?;
    let step = ((viewport_height as f64 * settings.viewport_fraction) as i64).max(1);

    let mut top = 1;
    let mut last_height = renderer.document_height().await?;

    loop {
        while top < last_height {
            top += step;
            renderer.scroll_to(top).await?;
            tokio::time::sleep(settings.step_delay).await;
        }

        tokio::time::sleep(settings.settle_delay).await;
        let new_height = renderer.document_height().await?;

        if new_height == last_height {
            break;
        }

        log::debug!(
            "Document grew from {} to {} while scrolling, continuing from {}",
            last_height,
            new_height,
            top
        );
        last_height = new_height;
    }

    Ok(())
}
