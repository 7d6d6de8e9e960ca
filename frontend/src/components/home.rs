use crate::auth::use_auth;
use crate::components::icons::{Calendar, LayoutDashboard, PawPrint, Stethoscope};
use crate::web::router::Link;
use leptos::prelude::*;
use vetdesk_shared::Role;

/// 首页：未登录时展示介绍，登录后按角色给出入口
#[component]
pub fn HomePage() -> impl IntoView {
    let auth = use_auth();

    move || match auth.user() {
        None => view! {
            <div class="hero min-h-[70vh] bg-base-200">
                <div class="hero-content text-center">
                    <div class="max-w-lg">
                        <div class="flex justify-center mb-4 text-primary">
                            <PawPrint attr:class="h-14 w-14" />
                        </div>
                        <h1 class="text-4xl font-bold">"VetDesk"</h1>
                        <p class="py-6 text-base-content/70">
                            "Book visits, keep your pets' records in one place and follow every appointment from check-in to treatment."
                        </p>
                        <div class="flex gap-3 justify-center">
                            <Link to="/login" class="btn btn-primary">"Sign in"</Link>
                            <Link to="/register" class="btn btn-outline">"Create account"</Link>
                        </div>
                    </div>
                </div>
            </div>
        }
        .into_any(),
        Some(user) => {
            let shortcuts = match user.role {
                Role::PetOwner => view! {
                    <Link to="/pets" class="card bg-base-100 shadow hover:shadow-lg transition-shadow">
                        <div class="card-body items-center text-center">
                            <PawPrint attr:class="h-8 w-8 text-primary" />
                            <h2 class="card-title">"My Pets"</h2>
                        </div>
                    </Link>
                    <Link to="/appointments" class="card bg-base-100 shadow hover:shadow-lg transition-shadow">
                        <div class="card-body items-center text-center">
                            <Calendar attr:class="h-8 w-8 text-primary" />
                            <h2 class="card-title">"Appointments"</h2>
                        </div>
                    </Link>
                }
                .into_any(),
                Role::Doctor => view! {
                    <Link to="/doctor/schedule" class="card bg-base-100 shadow hover:shadow-lg transition-shadow">
                        <div class="card-body items-center text-center">
                            <Stethoscope attr:class="h-8 w-8 text-primary" />
                            <h2 class="card-title">"My Schedule"</h2>
                        </div>
                    </Link>
                }
                .into_any(),
                Role::Staff => view! {
                    <Link to="/staff/dashboard" class="card bg-base-100 shadow hover:shadow-lg transition-shadow">
                        <div class="card-body items-center text-center">
                            <LayoutDashboard attr:class="h-8 w-8 text-primary" />
                            <h2 class="card-title">"Dashboard"</h2>
                        </div>
                    </Link>
                }
                .into_any(),
            };

            view! {
                <div class="container mx-auto px-4 py-10 max-w-3xl">
                    <h1 class="text-3xl font-bold">"Welcome, " {user.display_name()}</h1>
                    <p class="text-base-content/60 mt-1">"Signed in as " {user.role.label()}</p>
                    <div class="grid grid-cols-1 sm:grid-cols-2 gap-4 mt-8">{shortcuts}</div>
                </div>
            }
            .into_any()
        }
    }
}
