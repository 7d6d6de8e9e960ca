//! 宠物主人的预约列表
//!
//! 先取本人的宠物，再按宠物 ID 过滤预约；没有宠物时不发预约请求。

use crate::api::{ClinicApi, offline_data, or_offline, use_api};
use crate::auth::use_auth;
use crate::components::icons::{Calendar, Clock, Plus};
use crate::components::widgets::{EmptyState, Spinner, StatusBadge, format_date, format_time};
use crate::notify::use_notify;
use crate::web::confirm;
use crate::web::router::Link;
use chrono::Utc;
use leptos::prelude::*;
use leptos::task::spawn_local;
use vetdesk_shared::fallback::Sourced;
use vetdesk_shared::protocol::AppointmentFilter;
use vetdesk_shared::schedule::owner_agenda;
use vetdesk_shared::{ApiResult, Appointment, AppointmentStatus, Operation};

async fn load_owner_appointments(api: &ClinicApi, owner_id: &str) -> ApiResult<Sourced<Vec<Appointment>>> {
    let pets = api.list_pets(Some(owner_id)).await;
    let pets = or_offline(api, pets, |data| data.pets(Some(owner_id)))?;
    if pets.get().is_empty() {
        return Ok(pets.map(|_| Vec::new()));
    }
    let offline = pets.is_offline();
    let pet_ids: Vec<String> = pets.into_inner().into_iter().map(|p| p.id).collect();

    let filter = AppointmentFilter::for_pets(pet_ids);
    let appointments = if offline {
        Sourced::Offline(offline_data().appointments(&filter))
    } else {
        let result = api.list_appointments(filter.clone()).await;
        or_offline(api, result, |data| data.appointments(&filter))?
    };
    Ok(appointments)
}

#[component]
pub fn AppointmentsPage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let notify = use_notify();

    let (appointments, set_appointments) = signal(Vec::<Appointment>::new());
    let (loading, set_loading) = signal(true);

    let load = {
        let api = api.clone();
        move || {
            let Some(user) = auth.user_untracked() else {
                return;
            };
            let api = api.clone();
            set_loading.set(true);
            spawn_local(async move {
                match load_owner_appointments(&api, &user.id).await {
                    Ok(sourced) => {
                        notify.set_offline(sourced.is_offline());
                        set_appointments.set(sourced.into_inner());
                    }
                    Err(e) => notify.error(e.user_message(Operation::FetchAppointments)),
                }
                set_loading.set(false);
            });
        }
    };

    Effect::new(move |_| {
        if auth.user().is_some() {
            load();
        }
    });

    let on_cancel = Callback::new(move |id: String| {
        if !confirm("Are you sure you want to cancel this appointment?") {
            return;
        }
        let api = api.clone();
        spawn_local(async move {
            match api.cancel_appointment(&id).await {
                Ok(_) => {
                    notify.success("Appointment cancelled successfully");
                    set_appointments.update(|list| {
                        if let Some(a) = list.iter_mut().find(|a| a.id == id) {
                            a.status = AppointmentStatus::Cancelled;
                        }
                    });
                }
                Err(e) => notify.error(e.user_message(Operation::CancelAppointment)),
            }
        });
    });

    let agenda = Memo::new(move |_| appointments.with(|list| owner_agenda(list, Utc::now())));

    view! {
        <div class="container mx-auto px-4 py-8 max-w-5xl">
            <div class="flex justify-between items-center mb-6">
                <h1 class="text-3xl font-bold">"My Appointments"</h1>
                <Link to="/appointments/book" class="btn btn-primary gap-2">
                    <Plus attr:class="h-4 w-4" />
                    "Book Appointment"
                </Link>
            </div>

            <Show when=move || !loading.get() fallback=|| view! { <Spinner /> }>
                <section class="mb-10">
                    <h2 class="text-xl font-semibold mb-3">"Upcoming"</h2>
                    {move || {
                        let upcoming = agenda.with(|a| a.upcoming.clone());
                        if upcoming.is_empty() {
                            view! { <EmptyState message="No upcoming appointments." /> }.into_any()
                        } else {
                            view! {
                                <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                                    {upcoming
                                        .into_iter()
                                        .map(|a| view! { <AppointmentCard appointment=a on_cancel=Some(on_cancel) /> })
                                        .collect_view()}
                                </div>
                            }
                            .into_any()
                        }
                    }}
                </section>

                <section>
                    <h2 class="text-xl font-semibold mb-3">"Past & Closed"</h2>
                    {move || {
                        let past = agenda.with(|a| a.past.clone());
                        if past.is_empty() {
                            view! { <EmptyState message="No past appointments." /> }.into_any()
                        } else {
                            view! {
                                <div class="grid grid-cols-1 md:grid-cols-2 gap-4 opacity-80">
                                    {past
                                        .into_iter()
                                        .map(|a| view! { <AppointmentCard appointment=a on_cancel=None /> })
                                        .collect_view()}
                                </div>
                            }
                            .into_any()
                        }
                    }}
                </section>
            </Show>
        </div>
    }
}

#[component]
fn AppointmentCard(appointment: Appointment, on_cancel: Option<Callback<String>>) -> impl IntoView {
    let notify = use_notify();
    let cancellable = appointment.status == AppointmentStatus::Scheduled;
    let id = appointment.id.clone();

    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body">
                <div class="flex justify-between items-start">
                    <h3 class="card-title">{appointment.pet_name().to_string()}</h3>
                    <StatusBadge status=appointment.status />
                </div>
                <div class="text-sm space-y-1 text-base-content/80">
                    <p class="flex items-center gap-2">
                        <Calendar attr:class="h-4 w-4" />
                        {format_date(appointment.appointment_date)}
                    </p>
                    <p class="flex items-center gap-2">
                        <Clock attr:class="h-4 w-4" />
                        {format_time(appointment.appointment_date)}
                    </p>
                    {appointment.doctor_name().map(|d| view! { <p>{d}</p> })}
                    {appointment
                        .description_text()
                        .map(|d| view! { <p class="italic">{d.to_string()}</p> })}
                </div>
                {on_cancel.filter(|_| cancellable).map(|cb| view! {
                    <div class="card-actions justify-end">
                        <button
                            class="btn btn-sm btn-error btn-outline"
                            disabled=move || notify.is_offline()
                            on:click=move |_| cb.run(id.clone())
                        >
                            "Cancel"
                        </button>
                    </div>
                })}
            </div>
        </div>
    }
}
