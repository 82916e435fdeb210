//! 元素代理构造器形状

use std::fmt;
use std::sync::Arc;

use crate::{ElementLocator, WebDriver, WebElement};

/// 可识别的构造器形状 (封闭集合)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstructorShape {
    /// (WebDriver, ElementLocator, implicit_wait)
    LocatorSingleTimeout,

    /// (WebDriver, ElementLocator, implicit_wait, wait_for)
    LocatorTwoTimeouts,

    /// (WebDriver, ElementLocator, WebElement, implicit_wait)
    ElementSingleTimeout,

    /// (WebDriver, ElementLocator, WebElement, implicit_wait, wait_for)
    ElementTwoTimeouts,
}

impl ConstructorShape {
    /// 选择构造器时的优先顺序
    pub const PRECEDENCE: [ConstructorShape; 4] = [
        ConstructorShape::LocatorSingleTimeout,
        ConstructorShape::LocatorTwoTimeouts,
        ConstructorShape::ElementSingleTimeout,
        ConstructorShape::ElementTwoTimeouts,
    ];

    /// 构造器签名描述
    pub fn signature(&self) -> &'static str {
        match self {
            ConstructorShape::LocatorSingleTimeout => "(WebDriver, ElementLocator, long)",
            ConstructorShape::LocatorTwoTimeouts => "(WebDriver, ElementLocator, long, long)",
            ConstructorShape::ElementSingleTimeout => {
                "(WebDriver, ElementLocator, WebElement, long)"
            }
            ConstructorShape::ElementTwoTimeouts => {
                "(WebDriver, ElementLocator, WebElement, long, long)"
            }
        }
    }
}

impl fmt::Display for ConstructorShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.signature())
    }
}

type Driver = Arc<dyn WebDriver>;
type Locator = Arc<dyn ElementLocator>;

/// 实现类声明的构造器
pub enum ElementConstructor<E> {
    LocatorSingleTimeout(fn(Driver, Locator, u64) -> E),
    LocatorTwoTimeouts(fn(Driver, Locator, u64, u64) -> E),
    ElementSingleTimeout(fn(Driver, Locator, Option<WebElement>, u64) -> E),
    ElementTwoTimeouts(fn(Driver, Locator, Option<WebElement>, u64, u64) -> E),
}

impl<E> ElementConstructor<E> {
    pub fn shape(&self) -> ConstructorShape {
        match self {
            ElementConstructor::LocatorSingleTimeout(_) => ConstructorShape::LocatorSingleTimeout,
            ElementConstructor::LocatorTwoTimeouts(_) => ConstructorShape::LocatorTwoTimeouts,
            ElementConstructor::ElementSingleTimeout(_) => ConstructorShape::ElementSingleTimeout,
            ElementConstructor::ElementTwoTimeouts(_) => ConstructorShape::ElementTwoTimeouts,
        }
    }
}

impl<E> Clone for ElementConstructor<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for ElementConstructor<E> {}

impl<E> fmt::Debug for ElementConstructor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementConstructor{}", self.shape())
    }
}

/// 元素代理的实现类
///
/// 相当于 "类名 + 已声明的构造器列表"。
#[derive(Debug, Clone)]
pub struct ImplementerClass<E> {
    name: String,
    constructors: Vec<ElementConstructor<E>>,
}

impl<E> ImplementerClass<E> {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            constructors: Vec::new(),
        }
    }

    /// 声明一个构造器
    pub fn with_constructor(mut self, constructor: ElementConstructor<E>) -> Self {
        self.constructors.push(constructor);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn constructors(&self) -> &[ElementConstructor<E>] {
        &self.constructors
    }

    /// 按优先顺序选出第一个可用的构造器
    pub fn applicable_constructor(&self) -> Option<ElementConstructor<E>> {
        ConstructorShape::PRECEDENCE.iter().find_map(|shape| {
            self.constructors
                .iter()
                .find(|constructor| constructor.shape() == *shape)
                .copied()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(_: Driver, _: Locator, timeout: u64) -> u64 {
        timeout
    }

    fn element_two(_: Driver, _: Locator, _: Option<WebElement>, a: u64, b: u64) -> u64 {
        a + b
    }

    #[test]
    fn test_shape_of_constructor() {
        let constructor: ElementConstructor<u64> = ElementConstructor::LocatorSingleTimeout(single);
        assert_eq!(constructor.shape(), ConstructorShape::LocatorSingleTimeout);
    }

    #[test]
    fn test_applicable_constructor_follows_precedence() {
        let class = ImplementerClass::new("Facade")
            .with_constructor(ElementConstructor::ElementTwoTimeouts(element_two))
            .with_constructor(ElementConstructor::LocatorSingleTimeout(single));

        let chosen = class.applicable_constructor().unwrap();
        assert_eq!(chosen.shape(), ConstructorShape::LocatorSingleTimeout);
    }

    #[test]
    fn test_no_applicable_constructor() {
        let class: ImplementerClass<u64> = ImplementerClass::new("Empty");
        assert!(class.applicable_constructor().is_none());
        assert_eq!(class.name(), "Empty");
    }

    #[test]
    fn test_signature_display() {
        assert_eq!(
            ConstructorShape::ElementTwoTimeouts.to_string(),
            "(WebDriver, ElementLocator, WebElement, long, long)"
        );
    }
}
