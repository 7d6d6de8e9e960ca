//! 预约挂号
//!
//! 宠物与医生列表并行加载；日期只能选明天起的工作日，时间取自半小时时段表。

use crate::api::{or_offline, use_api};
use crate::auth::use_auth;
use crate::components::icons::{ArrowLeft, Clock};
use crate::components::widgets::{EmptyState, Spinner, today_local};
use crate::notify::use_notify;
use crate::web::router::{Link, use_navigate};
use chrono::{Duration, Local};
use leptos::prelude::*;
use leptos::task::spawn_local;
use vetdesk_shared::schedule::daily_slots;
use vetdesk_shared::validation::BookingForm;
use vetdesk_shared::{Operation, Pet, Role, User};

#[component]
pub fn BookAppointmentPage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let notify = use_notify();
    let navigate = use_navigate();

    let form = RwSignal::new(BookingForm::default());
    let (pets, set_pets) = signal(Vec::<Pet>::new());
    let (doctors, set_doctors) = signal(Vec::<User>::new());
    let (loading, set_loading) = signal(true);
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    if let Some(user) = auth.user_untracked() {
        let api = api.clone();
        spawn_local(async move {
            let (pet_result, doctor_result) = futures::join!(
                api.list_pets(Some(&user.id)),
                api.list_users(Some(Role::Doctor))
            );

            let mut offline = false;
            match or_offline(&api, pet_result, |data| data.pets(Some(&user.id))) {
                Ok(sourced) => {
                    offline |= sourced.is_offline();
                    set_pets.set(sourced.into_inner());
                }
                Err(e) => notify.error(e.user_message(Operation::FetchPets)),
            }
            match or_offline(&api, doctor_result, |data| data.users(Some(Role::Doctor))) {
                Ok(sourced) => {
                    offline |= sourced.is_offline();
                    set_doctors.set(sourced.into_inner());
                }
                Err(e) => notify.error(e.user_message(Operation::FetchUsers)),
            }
            notify.set_offline(offline);
            set_loading.set(false);
        });
    }

    let on_submit = Callback::new(move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let appointment = match form.get_untracked().validate(today_local(), &Local) {
            Ok(appointment) => appointment,
            Err(e) => {
                set_error_msg.set(Some(e.to_string()));
                return;
            }
        };

        set_error_msg.set(None);
        set_is_submitting.set(true);
        let api = api.clone();
        spawn_local(async move {
            match api.create_appointment(&appointment).await {
                Ok(_) => {
                    notify.success("Appointment booked successfully!");
                    navigate("/appointments");
                }
                Err(e) => set_error_msg.set(Some(e.user_message(Operation::BookAppointment))),
            }
            set_is_submitting.set(false);
        });
    });

    let min_date = move || {
        (today_local() + Duration::days(1))
            .format("%Y-%m-%d")
            .to_string()
    };

    view! {
        <div class="container mx-auto px-4 py-8 max-w-2xl">
            <Link to="/appointments" class="btn btn-ghost btn-sm gap-1 mb-4">
                <ArrowLeft attr:class="h-4 w-4" />
                "Back to appointments"
            </Link>
            <h1 class="text-3xl font-bold mb-6">"Book an Appointment"</h1>

            <Show when=move || !loading.get() fallback=|| view! { <Spinner /> }>
                <Show
                    when=move || pets.with(|p| !p.is_empty())
                    fallback=|| view! {
                        <div class="text-center">
                            <EmptyState message="You need to add a pet before booking an appointment." />
                            <Link to="/pets/add" class="btn btn-primary">"Add a pet"</Link>
                        </div>
                    }
                >
                    <form class="card bg-base-100 shadow" on:submit=move |ev| on_submit.run(ev)>
                        <div class="card-body space-y-2">
                            {move || error_msg.get().map(|msg| view! {
                                <div role="alert" class="alert alert-error text-sm py-2">
                                    <span>{msg}</span>
                                </div>
                            })}

                            <div class="form-control">
                                <label class="label" for="pet">
                                    <span class="label-text">"Pet"</span>
                                </label>
                                <select
                                    id="pet"
                                    class="select select-bordered"
                                    on:change=move |ev| form.update(|f| f.pet_id = event_target_value(&ev))
                                >
                                    <option value="">"Select a pet"</option>
                                    {move || pets.get().into_iter().map(|pet| {
                                        let id = pet.id.clone();
                                        view! {
                                            <option
                                                value=pet.id.clone()
                                                selected=move || form.with(|f| f.pet_id == id)
                                            >
                                                {pet.name} " (" {pet.species} ")"
                                            </option>
                                        }
                                    }).collect_view()}
                                </select>
                            </div>

                            <div class="form-control">
                                <label class="label" for="doctor">
                                    <span class="label-text">"Doctor"</span>
                                </label>
                                <select
                                    id="doctor"
                                    class="select select-bordered"
                                    on:change=move |ev| form.update(|f| f.doctor_id = event_target_value(&ev))
                                >
                                    <option value="">"Select a doctor"</option>
                                    {move || doctors.get().into_iter().map(|doctor| {
                                        let id = doctor.id.clone();
                                        view! {
                                            <option
                                                value=doctor.id.clone()
                                                selected=move || form.with(|f| f.doctor_id == id)
                                            >
                                                {doctor.display_name()}
                                            </option>
                                        }
                                    }).collect_view()}
                                </select>
                            </div>

                            <div class="form-control">
                                <label class="label" for="date">
                                    <span class="label-text">"Date"</span>
                                    <span class="label-text-alt">"Weekdays only"</span>
                                </label>
                                <input
                                    id="date"
                                    type="date"
                                    class="input input-bordered"
                                    min=min_date
                                    prop:value=move || form.with(|f| f.date.clone())
                                    on:input=move |ev| form.update(|f| f.date = event_target_value(&ev))
                                />
                            </div>

                            <div class="form-control">
                                <label class="label">
                                    <span class="label-text flex items-center gap-1">
                                        <Clock attr:class="h-4 w-4" />
                                        "Time"
                                    </span>
                                </label>
                                <div class="grid grid-cols-4 sm:grid-cols-8 gap-2">
                                    {daily_slots()
                                        .into_iter()
                                        .map(|slot| {
                                            let label = slot.label();
                                            let value = label.clone();
                                            let is_selected = {
                                                let label = label.clone();
                                                move || form.with(|f| f.slot == label)
                                            };
                                            view! {
                                                <button
                                                    type="button"
                                                    class=move || if is_selected() { "btn btn-sm btn-primary" } else { "btn btn-sm btn-outline" }
                                                    on:click=move |_| form.update(|f| f.slot = value.clone())
                                                >
                                                    {label}
                                                </button>
                                            }
                                        })
                                        .collect_view()}
                                </div>
                            </div>

                            <div class="form-control">
                                <label class="label" for="description">
                                    <span class="label-text">"Reason for visit"</span>
                                </label>
                                <textarea
                                    id="description"
                                    class="textarea textarea-bordered h-24"
                                    prop:value=move || form.with(|f| f.description.clone())
                                    on:input=move |ev| form.update(|f| f.description = event_target_value(&ev))
                                ></textarea>
                            </div>

                            <div class="card-actions justify-end mt-4">
                                <button
                                    class="btn btn-primary"
                                    disabled=move || is_submitting.get() || notify.is_offline()
                                >
                                    {move || if is_submitting.get() { "Booking..." } else { "Book Appointment" }}
                                </button>
                            </div>
                        </div>
                    </form>
                </Show>
            </Show>
        </div>
    }
}
