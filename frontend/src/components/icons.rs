//! Lucide 图标（内联 SVG）
//!
//! 通过 `attr:class` 传入尺寸与颜色。

use leptos::prelude::*;

fn icon(paths: &'static [&'static str]) -> impl IntoView {
    view! {
        <svg
            xmlns="http://www.w3.org/2000/svg"
            viewBox="0 0 24 24"
            fill="none"
            stroke="currentColor"
            stroke-width="2"
            stroke-linecap="round"
            stroke-linejoin="round"
        >
            {paths.iter().map(|d| view! { <path d=*d /> }).collect_view()}
        </svg>
    }
}

#[component]
pub fn PawPrint() -> impl IntoView {
    icon(&[
        "M11 5.5a2 2 0 1 1-4 0 2 2 0 0 1 4 0",
        "M18 9.5a2 2 0 1 1-4 0 2 2 0 0 1 4 0",
        "M21 13.5a2 2 0 1 1-4 0 2 2 0 0 1 4 0",
        "M9 20c-1.9 0-3-1.3-3-3 0-2.5 2.6-5 6-5s6 2.5 6 5c0 1.7-1.1 3-3 3-1 0-2-.5-3-.5s-2 .5-3 .5",
    ])
}

#[component]
pub fn Calendar() -> impl IntoView {
    icon(&[
        "M8 2v4",
        "M16 2v4",
        "M3 10h18",
        "M5 4h14a2 2 0 0 1 2 2v14a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2V6a2 2 0 0 1 2-2z",
    ])
}

#[component]
pub fn Stethoscope() -> impl IntoView {
    icon(&[
        "M4.8 2.3A.3.3 0 1 0 5 2H4a2 2 0 0 0-2 2v5a6 6 0 0 0 6 6 6 6 0 0 0 6-6V4a2 2 0 0 0-2-2h-1a.2.2 0 1 0 .3.3",
        "M8 15v1a6 6 0 0 0 6 6 6 6 0 0 0 6-6v-4",
        "M22 10a2 2 0 1 1-4 0 2 2 0 0 1 4 0",
    ])
}

#[component]
pub fn LayoutDashboard() -> impl IntoView {
    icon(&[
        "M4 3h5a1 1 0 0 1 1 1v7a1 1 0 0 1-1 1H4a1 1 0 0 1-1-1V4a1 1 0 0 1 1-1z",
        "M15 3h5a1 1 0 0 1 1 1v3a1 1 0 0 1-1 1h-5a1 1 0 0 1-1-1V4a1 1 0 0 1 1-1z",
        "M15 12h5a1 1 0 0 1 1 1v7a1 1 0 0 1-1 1h-5a1 1 0 0 1-1-1v-7a1 1 0 0 1 1-1z",
        "M4 16h5a1 1 0 0 1 1 1v3a1 1 0 0 1-1 1H4a1 1 0 0 1-1-1v-3a1 1 0 0 1 1-1z",
    ])
}

#[component]
pub fn UserIcon() -> impl IntoView {
    icon(&[
        "M19 21v-2a4 4 0 0 0-4-4H9a4 4 0 0 0-4 4v2",
        "M16 7a4 4 0 1 1-8 0 4 4 0 0 1 8 0",
    ])
}

#[component]
pub fn LogOut() -> impl IntoView {
    icon(&[
        "M9 21H5a2 2 0 0 1-2-2V5a2 2 0 0 1 2-2h4",
        "M16 17l5-5-5-5",
        "M21 12H9",
    ])
}

#[component]
pub fn Plus() -> impl IntoView {
    icon(&[
        "M5 12h14",
        "M12 5v14",
    ])
}

#[component]
pub fn Trash2() -> impl IntoView {
    icon(&[
        "M3 6h18",
        "M19 6v14c0 1-1 2-2 2H7c-1 0-2-1-2-2V6",
        "M8 6V4c0-1 1-2 2-2h4c1 0 2 1 2 2v2",
        "M10 11v6",
        "M14 11v6",
    ])
}

#[component]
pub fn Pencil() -> impl IntoView {
    icon(&[
        "M21.174 6.812a1 1 0 0 0-3.986-3.987L3.842 16.174a2 2 0 0 0-.5.83l-1.321 4.352a.5.5 0 0 0 .623.622l4.353-1.32a2 2 0 0 0 .83-.497z",
        "M15 5l4 4",
    ])
}

#[component]
pub fn Clock() -> impl IntoView {
    icon(&[
        "M22 12a10 10 0 1 1-20 0 10 10 0 0 1 20 0",
        "M12 6v6l4 2",
    ])
}

#[component]
pub fn WifiOff() -> impl IntoView {
    icon(&[
        "M12 20h.01",
        "M8.5 16.429a5 5 0 0 1 7 0",
        "M5 12.859a10 10 0 0 1 5.17-2.69",
        "M19 12.859a10 10 0 0 0-2.007-1.523",
        "M2 8.82a15 15 0 0 1 4.177-2.643",
        "M22 8.82a15 15 0 0 0-11.288-3.764",
        "M2 2l20 20",
    ])
}

#[component]
pub fn CheckCircle() -> impl IntoView {
    icon(&[
        "M22 11.08V12a10 10 0 1 1-5.93-9.14",
        "M22 4 12 14.01l-3-3",
    ])
}

#[component]
pub fn ArrowLeft() -> impl IntoView {
    icon(&[
        "M12 19l-7-7 7-7",
        "M19 12H5",
    ])
}

#[component]
pub fn Play() -> impl IntoView {
    icon(&[
        "M6 3l14 9-14 9V3z",
    ])
}
