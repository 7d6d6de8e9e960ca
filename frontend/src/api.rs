//! API 客户端装配
//!
//! 浏览器环境下的 `ApiClient`：fetch + localStorage，配置在启动时解析一次。

use crate::web::{FetchClient, LocalStorage};
use chrono::{Local, Utc};
use leptos::prelude::*;
use vetdesk_shared::ApiResult;
use vetdesk_shared::fallback::{FallbackDataset, Sourced, with_fallback};
use vetdesk_shared::storage::KEY_API_BASE_URL;
use vetdesk_shared::{ApiClient, ClientConfig};

pub type ClinicApi = ApiClient<FetchClient, LocalStorage>;

/// 解析配置并构造客户端
///
/// 地址优先级：localStorage `apiBaseUrl` > 编译期 `VETDESK_API_URL` > 默认值。
pub fn build_api() -> ClinicApi {
    let config = ClientConfig::resolve(
        LocalStorage::get(KEY_API_BASE_URL).as_deref(),
        option_env!("VETDESK_API_URL"),
        option_env!("VETDESK_OFFLINE_FALLBACK"),
    );
    log::info!(
        "API base URL: {} (offline fallback {})",
        config.base_url,
        if config.offline_fallback { "on" } else { "off" }
    );
    ApiClient::new(FetchClient, LocalStorage, config)
}

/// 从 Context 获取 API 客户端
pub fn use_api() -> ClinicApi {
    use_context::<ClinicApi>().expect("ClinicApi should be provided")
}

/// 以当前时间和浏览器时区生成离线数据
pub fn offline_data() -> FallbackDataset {
    FallbackDataset::seeded(Utc::now(), &Local)
}

/// 只读请求的离线兜底，是否启用由配置决定
pub fn or_offline<T>(
    api: &ClinicApi,
    result: ApiResult<T>,
    fallback: impl FnOnce(&FallbackDataset) -> T,
) -> ApiResult<Sourced<T>> {
    with_fallback(result, api.config().offline_fallback, || {
        fallback(&offline_data())
    })
}
