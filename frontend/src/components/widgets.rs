//! 页面间共用的小组件与格式化函数

use chrono::{DateTime, Local, NaiveDate, Utc};
use leptos::prelude::*;
use vetdesk_shared::AppointmentStatus;

/// 本地时区日期，如 `Mar 5, 2025`
pub fn format_date(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%b %-d, %Y").to_string()
}

/// 本地时区时间，如 `14:30`
pub fn format_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M").to_string()
}

pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

#[component]
pub fn StatusBadge(status: AppointmentStatus) -> impl IntoView {
    let class = match status {
        AppointmentStatus::Scheduled => "badge badge-info",
        AppointmentStatus::InProgress => "badge badge-warning",
        AppointmentStatus::Completed => "badge badge-success",
        AppointmentStatus::Cancelled => "badge badge-error badge-outline",
    };
    view! { <span class=class>{status.label()}</span> }
}

#[component]
pub fn Spinner() -> impl IntoView {
    view! {
        <div class="flex justify-center py-12">
            <span class="loading loading-spinner loading-lg text-primary"></span>
        </div>
    }
}

#[component]
pub fn EmptyState(#[prop(into)] message: String) -> impl IntoView {
    view! { <p class="text-center py-8 text-base-content/50">{message}</p> }
}
