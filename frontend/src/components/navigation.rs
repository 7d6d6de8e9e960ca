//! 顶部导航栏
//!
//! 链接随角色变化；注销后由路由服务把受保护页面重定向到登录页。

use crate::api::use_api;
use crate::auth::{sign_out, use_auth};
use crate::components::icons::{LogOut, PawPrint, UserIcon};
use crate::notify::use_notify;
use crate::web::router::Link;
use leptos::prelude::*;
use vetdesk_shared::Role;

fn role_links(role: Role) -> &'static [(&'static str, &'static str)] {
    match role {
        Role::PetOwner => &[("/pets", "My Pets"), ("/appointments", "Appointments")],
        Role::Doctor => &[("/doctor/schedule", "My Schedule")],
        Role::Staff => &[("/staff/dashboard", "Dashboard")],
    }
}

#[component]
pub fn NavBar() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let notify = use_notify();

    let on_logout = move |_: leptos::ev::MouseEvent| {
        sign_out(auth, &api);
        notify.success("Logged out");
    };

    view! {
        <div class="navbar bg-base-100 shadow-sm px-4">
            <div class="flex-1">
                <Link to="/" class="btn btn-ghost text-xl gap-2">
                    <PawPrint attr:class="h-6 w-6 text-primary" />
                    "VetDesk"
                </Link>
            </div>
            <div class="flex-none">
                {move || match auth.user() {
                    Some(user) => view! {
                        <ul class="menu menu-horizontal px-1 gap-1 items-center">
                            <li><Link to="/">"Home"</Link></li>
                            {role_links(user.role)
                                .iter()
                                .map(|(to, label)| view! { <li><Link to=*to>{*label}</Link></li> })
                                .collect_view()}
                            <li>
                                <Link to="/profile">
                                    <UserIcon attr:class="h-4 w-4" />
                                    {user.full_name()}
                                </Link>
                            </li>
                            <li>
                                <button on:click=on_logout.clone()>
                                    <LogOut attr:class="h-4 w-4" />
                                    "Logout"
                                </button>
                            </li>
                        </ul>
                    }
                    .into_any(),
                    None => view! {
                        <ul class="menu menu-horizontal px-1 gap-1">
                            <li><Link to="/login">"Login"</Link></li>
                            <li><Link to="/register">"Register"</Link></li>
                        </ul>
                    }
                    .into_any(),
                }}
            </div>
        </div>
    }
}
