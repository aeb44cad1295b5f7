use async_trait::async_trait;
use thirtyfour::{error::WebDriverResult, ChromiumLikeCapabilities, DesiredCapabilities, WebDriver};

use crate::{configuration::WebDriverSettings, error::RenderFault};

use super::Renderer;

pub struct Droid {
    pub driver: WebDriver,
}

impl Droid {
    pub async fn new(settings: &WebDriverSettings) -> WebDriverResult<Self> {
        let mut caps = DesiredCapabilities::chrome();
        if settings.headless {
            caps.set_headless()?;
        }
        if let Some(user_agent) = &settings.user_agent {
            caps.add_arg(&format!("--user-agent={}", user_agent))?;
        }

        let driver = WebDriver::new(settings.url.as_str(), caps).await?;
        driver.maximize_window().await?;

        Ok(Droid { driver })
    }

    pub async fn quit(self) -> WebDriverResult<()> {
        self.driver.quit().await
    }

    async fn read_number(&self, script: &str) -> Result<i64, RenderFault> {
        let ret = self
            .driver
            .execute(script, Vec::new())
            .await
            .map_err(|e| RenderFault::Script(e.into()))?;

        ret.convert::<i64>()
            .map_err(|e| RenderFault::Script(e.into()))
    }
}

#[async_trait]
impl Renderer for Droid {
    async fn navigate(&mut self, url: &str) -> Result<(), RenderFault> {
        self.driver
            .goto(url)
            .await
            .map_err(|e| RenderFault::navigation(url, e))
    }

    async fn current_document(&mut self) -> Result<String, RenderFault> {
        self.driver
            .source()
            .await
            .map_err(|e| RenderFault::Document(e.into()))
    }

    async fn viewport_height(&mut self) -> Result<i64, RenderFault> {
        self.read_number("return window.innerHeight").await
    }

    async fn document_height(&mut self) -> Result<i64, RenderFault> {
        self.read_number("return document.body.scrollHeight").await
    }

    async fn scroll_to(&mut self, y: i64) -> Result<(), RenderFault> {
        self.driver
            .execute(
                "window.scrollTo(0, arguments[0]);",
                vec![serde_json::json!(y)],
            )
            .await
            .map(|_| ())
            .map_err(|e| RenderFault::Script(e.into()))
    }
}
