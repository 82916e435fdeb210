//! Screenplay 元素定位层
//!
//! 根据实现类声明的构造器形状，为页面元素代理选择并调用合适的构造器，
//! 参数取自页面配置的超时时间。构造器形状是一个封闭集合 ([`ConstructorShape`])。

pub mod handler;
pub mod page;
pub mod shape;

pub use handler::SmartElementHandler;
pub use page::{ElementLocator, PageObject, PageTimeouts, WebDriver, WebElement};
pub use shape::{ConstructorShape, ElementConstructor, ImplementerClass};

use thiserror::Error;

/// 元素定位层错误
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LocatorError {
    #[error(
        "未找到合适的构造器。期望: {class}(WebDriver, ElementLocator, long, long) 或 \
         {class}(WebDriver, ElementLocator, WebElement, long, long)"
    )]
    NoSuitableConstructor { class: String },
}

pub type Result<T> = std::result::Result<T, LocatorError>;
