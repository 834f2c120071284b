//! WebDriver-backed implementation of the page abstraction. Each page is its
//! own WebDriver session against a shared chromedriver endpoint, so workers
//! can drive their pages concurrently without fighting over window focus.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use thirtyfour::prelude::*;
use thirtyfour::PageLoadStrategy;

use crate::browser::page::{Page, Selector, Session};
use crate::config::Config;
use crate::error::Result;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";

/// Counts elements the user could actually see, mirroring a ":visible"
/// filter. `offsetParent` is null for display:none subtrees; the client-rects
/// check covers position:fixed elements.
const VISIBLE_COUNT_JS: &str = r"
    const els = Array.from(document.querySelectorAll(arguments[0]));
    return els.filter(el => el.offsetParent !== null || el.getClientRects().length > 0).length;
";

const VISIBLE_ATTRS_JS: &str = r"
    const els = Array.from(document.querySelectorAll(arguments[0]));
    return els
        .filter(el => el.offsetParent !== null || el.getClientRects().length > 0)
        .map(el => el.getAttribute(arguments[1]) || '');
";

const SCROLL_BY_JS: &str = "window.scrollBy(0, arguments[0]);";

pub struct ChromeSession {
    webdriver_url: String,
    headless: bool,
    nav_timeout: Duration,
    script_timeout: Duration,
}

impl ChromeSession {
    pub fn new(cfg: &Config) -> Self {
        Self {
            webdriver_url: cfg.webdriver_url.clone(),
            headless: cfg.headless,
            nav_timeout: Duration::from_millis(cfg.nav_timeout_ms),
            script_timeout: Duration::from_millis(cfg.def_timeout_ms),
        }
    }
}

#[async_trait]
impl Session for ChromeSession {
    async fn open_page(&self) -> Result<Box<dyn Page>> {
        let mut caps = DesiredCapabilities::chrome();
        if self.headless {
            caps.set_headless()?;
        }
        // Fast-commit navigation: goto returns once the navigation is
        // committed, readiness is established by polling afterwards.
        caps.set_page_load_strategy(PageLoadStrategy::None)?;
        caps.add_arg("--disable-blink-features=AutomationControlled")?;
        caps.add_arg("--no-sandbox")?;
        caps.add_arg("--lang=ru-RU")?;
        caps.add_arg("--window-size=1400,900")?;
        caps.add_arg(&format!("--user-agent={USER_AGENT}"))?;

        let driver = WebDriver::new(&self.webdriver_url, caps).await?;
        driver.set_page_load_timeout(self.nav_timeout).await?;
        driver.set_script_timeout(self.script_timeout).await?;
        driver
            .set_implicit_wait_timeout(Duration::from_millis(0))
            .await?;

        Ok(Box::new(WebDriverPage { driver }))
    }
}

pub struct WebDriverPage {
    driver: WebDriver,
}

impl WebDriverPage {
    async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value> {
        let ret = self.driver.execute(script, args).await?;
        Ok(ret.json().clone())
    }
}

#[async_trait]
impl Page for WebDriverPage {
    async fn goto(&self, url: &str) -> Result<()> {
        self.driver.goto(url).await?;
        Ok(())
    }

    async fn visible_count(&self, css: &str) -> Result<usize> {
        let value = self.execute(VISIBLE_COUNT_JS, vec![json!(css)]).await?;
        Ok(value.as_u64().unwrap_or(0) as usize)
    }

    async fn visible_attrs(&self, css: &str, attr: &str) -> Result<Vec<String>> {
        let value = self
            .execute(VISIBLE_ATTRS_JS, vec![json!(css), json!(attr)])
            .await?;
        let attrs = value
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .map(|v| v.as_str().unwrap_or("").to_string())
                    .collect()
            })
            .unwrap_or_default();
        Ok(attrs)
    }

    async fn evaluate(&self, script: &str) -> Result<Value> {
        self.execute(script, Vec::new()).await
    }

    async fn click_first_visible(&self, selector: &Selector) -> Result<bool> {
        let by = match *selector {
            Selector::Css(css) => By::Css(css),
            Selector::XPath(xpath) => By::XPath(xpath),
        };
        for element in self.driver.find_all(by).await? {
            if element.is_displayed().await.unwrap_or(false) {
                element.click().await?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn scroll_by(&self, dy: i64) -> Result<()> {
        self.execute(SCROLL_BY_JS, vec![json!(dy)]).await?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.driver.current_url().await?.to_string())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.driver.quit().await?;
        Ok(())
    }
}
