//! HTTP 请求封装模块
//!
//! 使用 `web_sys::fetch` 实现共享层的 `HttpClient` trait。

use async_trait::async_trait;
use vetdesk_shared::error::TransportError;
use vetdesk_shared::request::{HttpClient, HttpRequest, HttpResponse};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

fn js_error(context: &'static str) -> impl Fn(JsValue) -> TransportError {
    move |e| TransportError::new(format!("{}: {:?}", context, e))
}

/// 基于 fetch 的 HTTP 客户端
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchClient;

#[async_trait(?Send)]
impl HttpClient for FetchClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let headers = Headers::new().map_err(js_error("创建 Headers 失败"))?;
        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(js_error("设置 Header 失败"))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());
        if let Some(body) = &req.body {
            opts.set_body(&JsValue::from_str(body));
        }

        let request = Request::new_with_str_and_init(&req.url, &opts)
            .map_err(js_error("请求构建失败"))?;

        let window =
            web_sys::window().ok_or_else(|| TransportError::new("无法获取 window 对象"))?;

        // fetch 只在网络层失败时 reject，非 2xx 状态仍然返回 Response
        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_error("网络错误"))?;

        let response: Response = resp_value
            .dyn_into()
            .map_err(js_error("Response 类型转换失败"))?;

        let status = response.status();
        let promise = response.text().map_err(js_error("读取响应失败"))?;
        let body = JsFuture::from(promise)
            .await
            .map_err(js_error("读取响应失败"))?
            .as_string()
            .unwrap_or_default();

        Ok(HttpResponse { status, body })
    }
}
