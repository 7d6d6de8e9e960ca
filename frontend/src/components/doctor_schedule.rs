use crate::api::{or_offline, use_api};
use crate::auth::use_auth;
use crate::components::icons::{Play, Stethoscope};
use crate::components::widgets::{EmptyState, Spinner, StatusBadge, format_date, format_time};
use crate::notify::use_notify;
use crate::web::router::Link;
use chrono::{Local, Utc};
use leptos::prelude::*;
use leptos::task::spawn_local;
use vetdesk_shared::protocol::AppointmentFilter;
use vetdesk_shared::schedule::{Agenda, doctor_agenda};
use vetdesk_shared::{Appointment, AppointmentStatus, Operation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Today,
    Upcoming,
    Past,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Today, Tab::Upcoming, Tab::Past];

    fn label(&self) -> &'static str {
        match self {
            Tab::Today => "Today",
            Tab::Upcoming => "Upcoming",
            Tab::Past => "Past",
        }
    }

    fn pick(&self, agenda: &Agenda) -> Vec<Appointment> {
        match self {
            Tab::Today => agenda.today.clone(),
            Tab::Upcoming => agenda.upcoming.clone(),
            Tab::Past => agenda.past.clone(),
        }
    }

    fn empty_message(&self) -> &'static str {
        match self {
            Tab::Today => "No appointments scheduled for today.",
            Tab::Upcoming => "No upcoming appointments.",
            Tab::Past => "No past appointments.",
        }
    }
}

/// 医生日程
#[component]
pub fn DoctorSchedulePage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let notify = use_notify();

    let (appointments, set_appointments) = signal(Vec::<Appointment>::new());
    let (loading, set_loading) = signal(true);
    let (tab, set_tab) = signal(Tab::Today);

    let load = {
        let api = api.clone();
        move || {
            let Some(user) = auth.user_untracked() else {
                return;
            };
            let api = api.clone();
            set_loading.set(true);
            spawn_local(async move {
                let filter = AppointmentFilter::for_doctor(user.id.clone());
                let result = api.list_appointments(filter.clone()).await;
                match or_offline(&api, result, |data| data.appointments(&filter)) {
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

    let on_start = Callback::new(move |id: String| {
        let api = api.clone();
        spawn_local(async move {
            match api.start_appointment(&id).await {
                Ok(_) => {
                    notify.success("Appointment started");
                    set_appointments.update(|list| {
                        if let Some(a) = list.iter_mut().find(|a| a.id == id) {
                            a.status = AppointmentStatus::InProgress;
                        }
                    });
                }
                Err(e) => notify.error(e.user_message(Operation::StartAppointment)),
            }
        });
    });

    let agenda = Memo::new(move |_| {
        appointments.with(|list| doctor_agenda(list, Utc::now(), &Local))
    });

    view! {
        <div class="container mx-auto px-4 py-8 max-w-5xl">
            <div class="flex items-center gap-3 mb-6">
                <Stethoscope attr:class="h-8 w-8 text-primary" />
                <h1 class="text-3xl font-bold">"My Schedule"</h1>
            </div>

            <div role="tablist" class="tabs tabs-boxed mb-6 w-fit">
                {Tab::ALL
                    .into_iter()
                    .map(|t| view! {
                        <a
                            role="tab"
                            class=move || if tab.get() == t { "tab tab-active" } else { "tab" }
                            on:click=move |_| set_tab.set(t)
                        >
                            {t.label()}
                            <span class="badge badge-sm ml-2">
                                {move || agenda.with(|a| t.pick(a).len())}
                            </span>
                        </a>
                    })
                    .collect_view()}
            </div>

            <Show when=move || !loading.get() fallback=|| view! { <Spinner /> }>
                {move || {
                    let current = tab.get();
                    let list = agenda.with(|a| current.pick(a));
                    if list.is_empty() {
                        return view! { <EmptyState message=current.empty_message() /> }.into_any();
                    }
                    view! {
                        <div class="overflow-x-auto bg-base-100 rounded-box shadow">
                            <table class="table">
                                <thead>
                                    <tr>
                                        <th>"Date"</th>
                                        <th>"Time"</th>
                                        <th>"Pet"</th>
                                        <th>"Owner"</th>
                                        <th>"Status"</th>
                                        <th></th>
                                    </tr>
                                </thead>
                                <tbody>
                                    {list
                                        .into_iter()
                                        .map(|a| view! { <ScheduleRow appointment=a on_start=on_start /> })
                                        .collect_view()}
                                </tbody>
                            </table>
                        </div>
                    }
                    .into_any()
                }}
            </Show>
        </div>
    }
}

#[component]
fn ScheduleRow(appointment: Appointment, on_start: Callback<String>) -> impl IntoView {
    let notify = use_notify();
    let details_path = format!("/doctor/appointment/{}", appointment.id);
    let id = appointment.id.clone();
    let can_start = appointment.status == AppointmentStatus::Scheduled;

    view! {
        <tr class="hover">
            <td>{format_date(appointment.appointment_date)}</td>
            <td>{format_time(appointment.appointment_date)}</td>
            <td>
                <div class="font-semibold">{appointment.pet_name().to_string()}</div>
                {appointment
                    .description_text()
                    .map(|d| view! { <div class="text-xs text-base-content/60">{d.to_string()}</div> })}
            </td>
            <td>{appointment.owner_name().unwrap_or_default()}</td>
            <td><StatusBadge status=appointment.status /></td>
            <td class="flex gap-2 justify-end">
                {can_start.then(|| view! {
                    <button
                        class="btn btn-xs btn-primary gap-1"
                        disabled=move || notify.is_offline()
                        on:click=move |_| on_start.run(id.clone())
                    >
                        <Play attr:class="h-3 w-3" />
                        "Start"
                    </button>
                })}
                <Link to=details_path class="btn btn-xs btn-ghost">"Details"</Link>
            </td>
        </tr>
    }
}
