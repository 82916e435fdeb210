//! 演员记事本

use std::any::Any;
use std::collections::HashMap;

/// 按字符串键保存任意值
///
/// 取值时类型不匹配与键不存在一样返回 `None`。
#[derive(Default)]
pub struct Notepad {
    entries: HashMap<String, Box<dyn Any>>,
}

impl Notepad {
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存值，覆盖同名条目
    pub fn put<T: Any>(&mut self, key: &str, value: T) {
        self.entries.insert(key.to_string(), Box::new(value));
    }

    pub fn get<T: Any + Clone>(&self, key: &str) -> Option<T> {
        self.entries
            .get(key)
            .and_then(|value| value.downcast_ref::<T>())
            .cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl std::fmt::Debug for Notepad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notepad").field("keys", &self.keys()).finish()
    }
}
