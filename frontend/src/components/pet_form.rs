//! 添加 / 编辑宠物
//!
//! 同一个表单组件，`pet_id` 为空时为添加模式。
//! 编辑模式下先加载宠物并校验归属，非本人的宠物直接退回列表。

use crate::api::{or_offline, use_api};
use crate::auth::use_auth;
use crate::components::icons::ArrowLeft;
use crate::components::widgets::{Spinner, today_local};
use crate::notify::use_notify;
use crate::web::router::{Link, use_navigate};
use leptos::prelude::*;
use leptos::task::spawn_local;
use vetdesk_shared::access::ensure_pet_owner;
use vetdesk_shared::validation::{GENDER_OPTIONS, PetForm, SPECIES_OPTIONS};
use vetdesk_shared::{ApiError, Operation};

#[component]
pub fn PetFormPage(#[prop(optional)] pet_id: Option<String>) -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let notify = use_notify();
    let navigate = use_navigate();

    let is_edit = pet_id.is_some();
    let form = RwSignal::new(PetForm::default());
    let (loading, set_loading) = signal(is_edit);
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    if let Some(id) = pet_id.clone() {
        let api = api.clone();
        spawn_local(async move {
            let result = api.get_pet(&id).await.map(Some);
            let loaded = or_offline(&api, result, |data| data.pet(&id))
                .and_then(|sourced| {
                    notify.set_offline(sourced.is_offline());
                    sourced
                        .into_inner()
                        .ok_or_else(|| ApiError::from_status(404, ""))
                });

            match loaded {
                Ok(pet) => {
                    let owned = auth
                        .user_untracked()
                        .map(|user| ensure_pet_owner(&pet, &user));
                    match owned {
                        Some(Ok(())) => {
                            form.set(PetForm::from_pet(&pet));
                            set_loading.set(false);
                        }
                        Some(Err(denied)) => {
                            notify.error(denied.to_string());
                            navigate("/pets");
                        }
                        None => navigate("/login"),
                    }
                }
                Err(e) => {
                    log::warn!("failed to load pet {}: {}", id, e);
                    notify.error(e.user_message(Operation::FetchPet));
                    navigate("/pets");
                }
            }
        });
    }

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(user) = auth.user_untracked() else {
            return;
        };
        let current = form.get_untracked();
        let today = today_local();

        set_error_msg.set(None);
        let api = api.clone();
        let pet_id = pet_id.clone();
        match pet_id {
            Some(id) => {
                let changes = match current.validate(today) {
                    Ok(changes) => changes,
                    Err(e) => return set_error_msg.set(Some(e.to_string())),
                };
                set_is_submitting.set(true);
                spawn_local(async move {
                    match api.update_pet(&id, changes).await {
                        Ok(_) => {
                            notify.success("Pet updated successfully!");
                            navigate("/pets");
                        }
                        Err(e) => set_error_msg.set(Some(e.user_message(Operation::UpdatePet))),
                    }
                    set_is_submitting.set(false);
                });
            }
            None => {
                let new_pet = match current.to_new_pet(&user.id, today) {
                    Ok(pet) => pet,
                    Err(e) => return set_error_msg.set(Some(e.to_string())),
                };
                set_is_submitting.set(true);
                spawn_local(async move {
                    match api.create_pet(&new_pet).await {
                        Ok(_) => {
                            notify.success("Pet added successfully!");
                            navigate("/pets");
                        }
                        Err(e) => set_error_msg.set(Some(e.user_message(Operation::CreatePet))),
                    }
                    set_is_submitting.set(false);
                });
            }
        }
    };

    let title = if is_edit { "Edit Pet" } else { "Add New Pet" };
    let submit_label = if is_edit { "Save Changes" } else { "Add Pet" };
    let max_birth_date = today_local().format("%Y-%m-%d").to_string();

    let select_field = move |id: &'static str,
                             label: &'static str,
                             options: &'static [(&'static str, &'static str)],
                             get: fn(&PetForm) -> String,
                             set: fn(&mut PetForm, String)| {
        view! {
            <div class="form-control">
                <label class="label" for=id>
                    <span class="label-text">{label}</span>
                </label>
                <select
                    id=id
                    class="select select-bordered"
                    on:change=move |ev| form.update(|f| set(f, event_target_value(&ev)))
                >
                    <option value="" selected=move || form.with(|f| get(f).is_empty())>
                        "Select..."
                    </option>
                    {options
                        .iter()
                        .map(|(value, text)| view! {
                            <option value=*value selected=move || form.with(|f| get(f) == *value)>
                                {*text}
                            </option>
                        })
                        .collect_view()}
                </select>
            </div>
        }
    };

    view! {
        <div class="container mx-auto px-4 py-8 max-w-2xl">
            <Link to="/pets" class="btn btn-ghost btn-sm gap-1 mb-4">
                <ArrowLeft attr:class="h-4 w-4" />
                "Back to pets"
            </Link>
            <h1 class="text-3xl font-bold mb-6">{title}</h1>

            <Show when=move || !loading.get() fallback=|| view! { <Spinner /> }>
                <form class="card bg-base-100 shadow" on:submit=on_submit.clone()>
                    <div class="card-body space-y-2">
                        {move || error_msg.get().map(|msg| view! {
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{msg}</span>
                            </div>
                        })}

                        <div class="form-control">
                            <label class="label" for="name">
                                <span class="label-text">"Name"</span>
                            </label>
                            <input
                                id="name"
                                type="text"
                                class="input input-bordered"
                                prop:value=move || form.with(|f| f.name.clone())
                                on:input=move |ev| form.update(|f| f.name = event_target_value(&ev))
                            />
                        </div>

                        {select_field("species", "Type", &SPECIES_OPTIONS, |f| f.species.clone(), |f, v| f.species = v)}

                        <div class="form-control">
                            <label class="label" for="breed">
                                <span class="label-text">"Breed (optional)"</span>
                            </label>
                            <input
                                id="breed"
                                type="text"
                                class="input input-bordered"
                                prop:value=move || form.with(|f| f.breed.clone())
                                on:input=move |ev| form.update(|f| f.breed = event_target_value(&ev))
                            />
                        </div>

                        <div class="form-control">
                            <label class="label" for="date_of_birth">
                                <span class="label-text">"Date of birth (optional)"</span>
                            </label>
                            <input
                                id="date_of_birth"
                                type="date"
                                class="input input-bordered"
                                max=max_birth_date.clone()
                                prop:value=move || form.with(|f| f.date_of_birth.clone())
                                on:input=move |ev| form.update(|f| f.date_of_birth = event_target_value(&ev))
                            />
                        </div>

                        {select_field("gender", "Gender", &GENDER_OPTIONS, |f| f.gender.clone(), |f, v| f.gender = v)}

                        <div class="card-actions justify-end mt-4">
                            <button
                                class="btn btn-primary"
                                disabled=move || is_submitting.get() || notify.is_offline()
                            >
                                {move || if is_submitting.get() { "Saving..." } else { submit_label }}
                            </button>
                        </div>
                    </div>
                </form>
            </Show>
        </div>
    }
}
