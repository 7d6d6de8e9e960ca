use crate::DEFAULT_API_BASE_URL;

/// 客户端运行配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API 根地址，不含结尾的 `/`
    pub base_url: String,
    /// 后端不可达时是否对只读页面使用离线数据
    pub offline_fallback: bool,
}

impl ClientConfig {
    pub fn new(base_url: &str, offline_fallback: bool) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            offline_fallback,
        }
    }

    /// 按优先级解析配置
    ///
    /// 地址：本地存储覆盖值 > 编译期 `VETDESK_API_URL` > 默认值。
    /// 离线开关：`VETDESK_OFFLINE_FALLBACK` 为 `0` / `false` / `off` 时关闭，其余情况开启。
    pub fn resolve(stored: Option<&str>, compiled: Option<&str>, fallback_flag: Option<&str>) -> Self {
        let base_url = [stored, compiled]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL);

        let offline_fallback = !matches!(
            fallback_flag.map(|f| f.trim().to_ascii_lowercase()).as_deref(),
            Some("0" | "false" | "off")
        );

        Self::new(base_url, offline_fallback)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_override_wins() {
        let cfg = ClientConfig::resolve(
            Some("https://api.clinic.test/"),
            Some("http://build.test"),
            None,
        );
        assert_eq!(cfg.base_url, "https://api.clinic.test");
        assert!(cfg.offline_fallback);
        assert_eq!(cfg.url("/api/pets"), "https://api.clinic.test/api/pets");
    }

    #[test]
    fn blank_values_fall_through_to_default() {
        let cfg = ClientConfig::resolve(Some("  "), None, Some("off"));
        assert_eq!(cfg.base_url, DEFAULT_API_BASE_URL);
        assert!(!cfg.offline_fallback);

        let cfg = ClientConfig::resolve(None, Some("http://build.test"), Some("FALSE"));
        assert_eq!(cfg.base_url, "http://build.test");
        assert!(!cfg.offline_fallback);
    }
}
