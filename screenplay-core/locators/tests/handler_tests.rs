//! 智能元素处理器测试

use screenplay_locators::*;
use std::sync::Arc;

struct FakeDriver;

impl WebDriver for FakeDriver {
    fn session_id(&self) -> String {
        "session-1".to_string()
    }
}

struct Css(&'static str);

impl ElementLocator for Css {
    fn describe(&self) -> String {
        format!("css: {}", self.0)
    }
}

#[derive(Debug, PartialEq)]
struct Facade {
    session: String,
    locator: String,
    element: Option<WebElement>,
    implicit_wait_ms: u64,
    wait_for_timeout_ms: Option<u64>,
}

fn locator_single(driver: Arc<dyn WebDriver>, locator: Arc<dyn ElementLocator>, t: u64) -> Facade {
    Facade {
        session: driver.session_id(),
        locator: locator.describe(),
        element: None,
        implicit_wait_ms: t,
        wait_for_timeout_ms: None,
    }
}

fn locator_two(
    driver: Arc<dyn WebDriver>,
    locator: Arc<dyn ElementLocator>,
    t: u64,
    w: u64,
) -> Facade {
    Facade {
        wait_for_timeout_ms: Some(w),
        ..locator_single(driver, locator, t)
    }
}

fn element_single(
    driver: Arc<dyn WebDriver>,
    locator: Arc<dyn ElementLocator>,
    element: Option<WebElement>,
    t: u64,
) -> Facade {
    Facade {
        element,
        ..locator_single(driver, locator, t)
    }
}

fn element_two(
    driver: Arc<dyn WebDriver>,
    locator: Arc<dyn ElementLocator>,
    element: Option<WebElement>,
    t: u64,
    w: u64,
) -> Facade {
    Facade {
        element,
        wait_for_timeout_ms: Some(w),
        ..locator_single(driver, locator, t)
    }
}

fn page() -> PageObject {
    PageObject::new(Arc::new(FakeDriver)).with_timeouts(PageTimeouts {
        implicit_wait_ms: 1500,
        wait_for_timeout_ms: 4000,
    })
}

fn build(class: &ImplementerClass<Facade>) -> Result<Facade> {
    let page = page();
    SmartElementHandler::new(class, Arc::new(Css("#login")), &page).new_element_instance()
}

#[test]
fn test_locator_single_timeout() {
    let class = ImplementerClass::new("Facade")
        .with_constructor(ElementConstructor::LocatorSingleTimeout(locator_single));

    let facade = build(&class).unwrap();
    assert_eq!(facade.session, "session-1");
    assert_eq!(facade.locator, "css: #login");
    assert_eq!(facade.implicit_wait_ms, 1500);
    assert_eq!(facade.wait_for_timeout_ms, None);
}

#[test]
fn test_locator_two_timeouts() {
    let class = ImplementerClass::new("Facade")
        .with_constructor(ElementConstructor::LocatorTwoTimeouts(locator_two));

    let facade = build(&class).unwrap();
    assert_eq!(facade.implicit_wait_ms, 1500);
    assert_eq!(facade.wait_for_timeout_ms, Some(4000));
}

#[test]
fn test_element_shapes_receive_no_element() {
    let single = ImplementerClass::new("Facade")
        .with_constructor(ElementConstructor::ElementSingleTimeout(element_single));
    let facade = build(&single).unwrap();
    assert_eq!(facade.element, None);
    assert_eq!(facade.wait_for_timeout_ms, None);

    let two = ImplementerClass::new("Facade")
        .with_constructor(ElementConstructor::ElementTwoTimeouts(element_two));
    let facade = build(&two).unwrap();
    assert_eq!(facade.element, None);
    assert_eq!(facade.wait_for_timeout_ms, Some(4000));
}

#[test]
fn test_locator_shape_preferred_over_element_shape() {
    let class = ImplementerClass::new("Facade")
        .with_constructor(ElementConstructor::ElementTwoTimeouts(element_two))
        .with_constructor(ElementConstructor::LocatorTwoTimeouts(locator_two));

    let facade = build(&class).unwrap();
    assert_eq!(facade.wait_for_timeout_ms, Some(4000));
    assert_eq!(facade.element, None);
    assert_eq!(
        class.applicable_constructor().unwrap().shape(),
        ConstructorShape::LocatorTwoTimeouts
    );
}

#[test]
fn test_no_suitable_constructor_names_class() {
    let class: ImplementerClass<Facade> = ImplementerClass::new("CustomButton");

    let err = build(&class).unwrap_err();
    assert_eq!(
        err,
        LocatorError::NoSuitableConstructor {
            class: "CustomButton".to_string()
        }
    );
    let message = err.to_string();
    assert!(message.contains("CustomButton(WebDriver, ElementLocator, long, long)"));
    assert!(message.contains("CustomButton(WebDriver, ElementLocator, WebElement, long, long)"));
}
