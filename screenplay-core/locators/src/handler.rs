//! 智能元素处理器

use std::sync::Arc;
use tracing::debug;

use crate::{ElementConstructor, ElementLocator, ImplementerClass, LocatorError, PageObject, Result};

/// 为单个页面元素代理创建实现实例
pub struct SmartElementHandler<'a, E> {
    implementer: &'a ImplementerClass<E>,
    locator: Arc<dyn ElementLocator>,
    page: &'a PageObject,
}

impl<'a, E> SmartElementHandler<'a, E> {
    pub fn new(
        implementer: &'a ImplementerClass<E>,
        locator: Arc<dyn ElementLocator>,
        page: &'a PageObject,
    ) -> Self {
        Self {
            implementer,
            locator,
            page,
        }
    }

    /// 按实现类声明的构造器形状创建元素实例
    ///
    /// 超时参数取自页面配置 (毫秒)，需要 `WebElement` 的形状传入 `None`。
    pub fn new_element_instance(&self) -> Result<E> {
        let constructor = self.implementer.applicable_constructor().ok_or_else(|| {
            LocatorError::NoSuitableConstructor {
                class: self.implementer.name().to_string(),
            }
        })?;

        debug!(
            "创建元素 {} ({}) 使用构造器 {}",
            self.implementer.name(),
            self.locator.describe(),
            constructor.shape()
        );

        let driver = self.page.driver();
        let locator = self.locator.clone();
        let implicit_wait = self.page.timeouts().implicit_wait_ms;
        let wait_for = self.page.timeouts().wait_for_timeout_ms;

        let instance = match constructor {
            ElementConstructor::LocatorSingleTimeout(build) => build(driver, locator, implicit_wait),
            ElementConstructor::LocatorTwoTimeouts(build) => {
                build(driver, locator, implicit_wait, wait_for)
            }
            ElementConstructor::ElementSingleTimeout(build) => {
                build(driver, locator, None, implicit_wait)
            }
            ElementConstructor::ElementTwoTimeouts(build) => {
                build(driver, locator, None, implicit_wait, wait_for)
            }
        };

        Ok(instance)
    }
}
