use crate::api::{or_offline, use_api};
use crate::auth::{refresh_user, use_auth};
use crate::components::icons::UserIcon;
use crate::components::widgets::{Spinner, format_date};
use crate::notify::use_notify;
use leptos::prelude::*;
use leptos::task::spawn_local;
use vetdesk_shared::validation::ProfileForm;
use vetdesk_shared::{Operation, User};

/// 个人资料：邮箱与角色只读，其余可编辑
#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let notify = use_notify();

    let (user, set_user) = signal(Option::<User>::None);
    let form = RwSignal::new(ProfileForm::default());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    {
        let api = api.clone();
        spawn_local(async move {
            let cached = auth.user_untracked();
            let result = api.current_user().await.map(Some);
            let loaded = match or_offline(&api, result, |_| cached.clone()) {
                Ok(sourced) => {
                    notify.set_offline(sourced.is_offline());
                    sourced.into_inner()
                }
                Err(e) => {
                    notify.error(e.user_message(Operation::FetchProfile));
                    cached
                }
            };
            if let Some(loaded) = loaded {
                form.set(ProfileForm::from_user(&loaded));
                set_user.set(Some(loaded));
            }
        });
    }

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(current) = user.get_untracked() else {
            return;
        };
        let changes = match form.get_untracked().validate() {
            Ok(changes) => changes,
            Err(e) => {
                set_error_msg.set(Some(e.to_string()));
                return;
            }
        };

        set_error_msg.set(None);
        set_is_submitting.set(true);
        let api = api.clone();
        spawn_local(async move {
            match api.update_profile(&current.id, changes).await {
                Ok(updated) => {
                    notify.success("Profile updated successfully!");
                    refresh_user(auth, updated.clone());
                    set_user.set(Some(updated));
                }
                Err(e) => set_error_msg.set(Some(e.user_message(Operation::UpdateProfile))),
            }
            set_is_submitting.set(false);
        });
    };

    let text_field = move |id: &'static str,
                           label: &'static str,
                           kind: &'static str,
                           get: fn(&ProfileForm) -> String,
                           set: fn(&mut ProfileForm, String)| {
        view! {
            <div class="form-control">
                <label class="label" for=id>
                    <span class="label-text">{label}</span>
                </label>
                <input
                    id=id
                    type=kind
                    class="input input-bordered"
                    prop:value=move || form.with(get)
                    on:input=move |ev| form.update(|f| set(f, event_target_value(&ev)))
                />
            </div>
        }
    };

    view! {
        <div class="container mx-auto px-4 py-8 max-w-2xl">
            <div class="flex items-center gap-3 mb-6">
                <UserIcon attr:class="h-8 w-8 text-primary" />
                <h1 class="text-3xl font-bold">"My Profile"</h1>
            </div>

            <Show when=move || user.with(Option::is_some) fallback=|| view! { <Spinner /> }>
                <form class="card bg-base-100 shadow" on:submit=on_submit.clone()>
                    <div class="card-body space-y-2">
                        {move || error_msg.get().map(|msg| view! {
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{msg}</span>
                            </div>
                        })}

                        {move || user.get().map(|u| view! {
                            <div class="grid grid-cols-1 sm:grid-cols-2 gap-2 text-sm mb-2">
                                <p><span class="font-semibold">"Email: "</span>{u.email.clone()}</p>
                                <p><span class="font-semibold">"Role: "</span>{u.role.label()}</p>
                                {u.created_at.map(|at| view! {
                                    <p class="text-base-content/60">"Member since " {format_date(at)}</p>
                                })}
                            </div>
                        })}

                        <div class="grid grid-cols-1 sm:grid-cols-2 gap-4">
                            {text_field("first_name", "First name", "text", |f| f.first_name.clone(), |f, v| f.first_name = v)}
                            {text_field("last_name", "Last name", "text", |f| f.last_name.clone(), |f, v| f.last_name = v)}
                        </div>
                        {text_field("phone", "Phone", "tel", |f| f.phone.clone(), |f, v| f.phone = v)}

                        <div class="card-actions justify-end mt-4">
                            <button
                                class="btn btn-primary"
                                disabled=move || is_submitting.get() || notify.is_offline()
                            >
                                {move || if is_submitting.get() { "Saving..." } else { "Save Changes" }}
                            </button>
                        </div>
                    </div>
                </form>
            </Show>
        </div>
    }
}
