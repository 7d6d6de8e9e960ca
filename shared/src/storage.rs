//! 本地键值存储抽象
//!
//! 浏览器端由 `localStorage` 实现，测试中使用 `MemoryStore`。

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// 认证 token
pub const KEY_AUTH_TOKEN: &str = "authToken";
/// 离线模式下使用的缓存用户
pub const KEY_CACHED_USER: &str = "mockUser";
/// 运行时覆盖的 API 地址
pub const KEY_API_BASE_URL: &str = "apiBaseUrl";
/// 旧版本遗留的 token 键，读取时迁移到 `KEY_AUTH_TOKEN`
pub const LEGACY_TOKEN_KEYS: [&str; 2] = ["token", "petOwnerToken"];
/// 旧版本遗留的用户资料键，登出时一并清除
pub const LEGACY_PROFILE_KEYS: [&str; 2] = ["doctor", "petOwner"];

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn delete(&self, key: &str);
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) {
        (**self).delete(key)
    }
}

/// 内存实现，克隆后共享同一份数据
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.borrow().contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.data.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.data
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn delete(&self, key: &str) {
        self.data.borrow_mut().remove(key);
    }
}
