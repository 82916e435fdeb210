//! 页面与浏览器驱动抽象
//!
//! 浏览器驱动本身不在本 crate 范围内，这里只保留构造元素代理所需的窄接口。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// 浏览器驱动
pub trait WebDriver: Send + Sync {
    /// 会话标识
    fn session_id(&self) -> String;
}

/// 元素定位器
pub trait ElementLocator: Send + Sync {
    /// 定位方式的可读描述 (例如 `css: #login`)
    fn describe(&self) -> String;
}

/// 已解析的页面元素
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebElement {
    pub id: String,
}

/// 页面超时配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageTimeouts {
    /// 隐式等待超时 (毫秒)
    #[serde(default = "default_implicit_wait_ms")]
    pub implicit_wait_ms: u64,

    /// 显式等待超时 (毫秒)
    #[serde(default = "default_wait_for_timeout_ms")]
    pub wait_for_timeout_ms: u64,
}

fn default_implicit_wait_ms() -> u64 {
    2000
}
fn default_wait_for_timeout_ms() -> u64 {
    5000
}

impl Default for PageTimeouts {
    fn default() -> Self {
        Self {
            implicit_wait_ms: default_implicit_wait_ms(),
            wait_for_timeout_ms: default_wait_for_timeout_ms(),
        }
    }
}

impl PageTimeouts {
    pub fn implicit_wait(&self) -> Duration {
        Duration::from_millis(self.implicit_wait_ms)
    }

    pub fn wait_for_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_for_timeout_ms)
    }
}

/// 页面对象
#[derive(Clone)]
pub struct PageObject {
    driver: Arc<dyn WebDriver>,
    timeouts: PageTimeouts,
}

impl PageObject {
    pub fn new(driver: Arc<dyn WebDriver>) -> Self {
        Self {
            driver,
            timeouts: PageTimeouts::default(),
        }
    }

    pub fn with_timeouts(mut self, timeouts: PageTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn driver(&self) -> Arc<dyn WebDriver> {
        self.driver.clone()
    }

    pub fn timeouts(&self) -> PageTimeouts {
        self.timeouts
    }

    pub fn implicit_wait_timeout(&self) -> Duration {
        self.timeouts.implicit_wait()
    }

    pub fn wait_for_timeout(&self) -> Duration {
        self.timeouts.wait_for_timeout()
    }
}

impl fmt::Debug for PageObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageObject")
            .field("session", &self.driver.session_id())
            .field("timeouts", &self.timeouts)
            .finish()
    }
}
