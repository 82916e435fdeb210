//! 演员能力

use screenplay_locators::{ElementLocator, ImplementerClass, PageObject, SmartElementHandler};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use tracing::debug;

use crate::{Actor, PerformError};

/// 能力类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbilityKind {
    /// 驱动浏览器
    BrowseTheWeb,

    /// 调用 HTTP 接口
    CallAnApi,

    /// 自定义能力
    Custom(&'static str),
}

impl fmt::Display for AbilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbilityKind::BrowseTheWeb => write!(f, "BrowseTheWeb"),
            AbilityKind::CallAnApi => write!(f, "CallAnApi"),
            AbilityKind::Custom(name) => write!(f, "{}", name),
        }
    }
}

/// 演员能做的事
pub trait Ability: Any {
    /// 注册时使用的键，每个类别至多保留一个实例
    const KIND: AbilityKind;

    /// 注册时绑定到演员 (仅保存演员名称)
    fn as_actor(&mut self, _actor: &str) {}
}

/// 按类别保存能力实例
#[derive(Default)]
pub struct AbilityRegistry {
    abilities: HashMap<AbilityKind, Rc<dyn Any>>,
}

impl AbilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册能力，同类别的旧实例被替换
    pub fn register<A: Ability>(&mut self, ability: A) {
        if self.abilities.insert(A::KIND, Rc::new(ability)).is_some() {
            debug!("替换已注册的能力: {}", A::KIND);
        }
    }

    pub fn get<A: Ability>(&self) -> Option<Rc<A>> {
        self.abilities
            .get(&A::KIND)
            .cloned()
            .and_then(|ability| ability.downcast::<A>().ok())
    }

    pub fn contains(&self, kind: AbilityKind) -> bool {
        self.abilities.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }
}

impl fmt::Debug for AbilityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.abilities.keys()).finish()
    }
}

/// 驱动浏览器的能力
#[derive(Debug, Clone)]
pub struct BrowseTheWeb {
    page: PageObject,
    actor: Option<String>,
}

impl BrowseTheWeb {
    pub fn with(page: PageObject) -> Self {
        Self { page, actor: None }
    }

    /// 取出演员的浏览器能力
    pub fn as_(actor: &Actor) -> Result<Rc<BrowseTheWeb>, PerformError> {
        actor
            .ability_to::<BrowseTheWeb>()
            .ok_or_else(|| PerformError::missing_ability(actor.name(), Self::KIND.to_string()))
    }

    pub fn page(&self) -> &PageObject {
        &self.page
    }

    pub fn actor_name(&self) -> Option<&str> {
        self.actor.as_deref()
    }

    /// 创建页面元素代理
    pub fn element_for<E>(
        &self,
        implementer: &ImplementerClass<E>,
        locator: Arc<dyn ElementLocator>,
    ) -> Result<E, PerformError> {
        let element = SmartElementHandler::new(implementer, locator, &self.page)
            .new_element_instance()?;
        Ok(element)
    }
}

impl Ability for BrowseTheWeb {
    const KIND: AbilityKind = AbilityKind::BrowseTheWeb;

    fn as_actor(&mut self, actor: &str) {
        self.actor = Some(actor.to_string());
    }
}

/// 调用 HTTP 接口的能力
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallAnApi {
    base_url: String,
    actor: Option<String>,
}

impl CallAnApi {
    pub fn at(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            actor: None,
        }
    }

    pub fn as_(actor: &Actor) -> Result<Rc<CallAnApi>, PerformError> {
        actor
            .ability_to::<CallAnApi>()
            .ok_or_else(|| PerformError::missing_ability(actor.name(), Self::KIND.to_string()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 拼接资源地址
    pub fn resolve(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource.trim_start_matches('/'))
    }

    pub fn actor_name(&self) -> Option<&str> {
        self.actor.as_deref()
    }
}

impl Ability for CallAnApi {
    const KIND: AbilityKind = AbilityKind::CallAnApi;

    fn as_actor(&mut self, actor: &str) {
        self.actor = Some(actor.to_string());
    }
}
