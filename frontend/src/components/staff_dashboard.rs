//! 前台总览：诊所统计与今日 / 后续预约

use crate::api::{or_offline, use_api};
use crate::components::icons::{Calendar, LayoutDashboard, PawPrint, Stethoscope, UserIcon};
use crate::components::widgets::{EmptyState, Spinner, StatusBadge, format_date, format_time};
use crate::notify::use_notify;
use chrono::{Local, Utc};
use leptos::prelude::*;
use leptos::task::spawn_local;
use vetdesk_shared::protocol::AppointmentFilter;
use vetdesk_shared::schedule::staff_agenda;
use vetdesk_shared::{Appointment, Operation, Stats};

#[component]
pub fn StaffDashboardPage() -> impl IntoView {
    let api = use_api();
    let notify = use_notify();

    let (appointments, set_appointments) = signal(Vec::<Appointment>::new());
    let (stats, set_stats) = signal(Stats::default());
    let (loading, set_loading) = signal(true);

    spawn_local(async move {
        let (appointment_result, stats_result) = futures::join!(
            api.list_appointments(AppointmentFilter::default()),
            api.stats()
        );

        let mut offline = false;
        match or_offline(&api, appointment_result, |data| {
            data.appointments(&AppointmentFilter::default())
        }) {
            Ok(sourced) => {
                offline |= sourced.is_offline();
                set_appointments.set(sourced.into_inner());
            }
            Err(e) => notify.error(e.user_message(Operation::FetchAppointments)),
        }
        match or_offline(&api, stats_result, |data| data.stats(&Local)) {
            Ok(sourced) => {
                offline |= sourced.is_offline();
                set_stats.set(sourced.into_inner());
            }
            Err(e) => notify.error(e.user_message(Operation::FetchStats)),
        }
        notify.set_offline(offline);
        set_loading.set(false);
    });

    let agenda = Memo::new(move |_| {
        appointments.with(|list| staff_agenda(list, Utc::now(), &Local))
    });

    view! {
        <div class="container mx-auto px-4 py-8 max-w-6xl space-y-8">
            <div class="flex items-center gap-3">
                <LayoutDashboard attr:class="h-8 w-8 text-primary" />
                <h1 class="text-3xl font-bold">"Clinic Dashboard"</h1>
            </div>

            <Show when=move || !loading.get() fallback=|| view! { <Spinner /> }>
                <div class="stats stats-vertical md:stats-horizontal shadow w-full bg-base-100">
                    <div class="stat">
                        <div class="stat-figure text-primary"><UserIcon attr:class="h-8 w-8" /></div>
                        <div class="stat-title">"Pet Owners"</div>
                        <div class="stat-value">{move || stats.get().total_owners}</div>
                    </div>
                    <div class="stat">
                        <div class="stat-figure text-secondary"><Stethoscope attr:class="h-8 w-8" /></div>
                        <div class="stat-title">"Total Appointments"</div>
                        <div class="stat-value">{move || stats.get().total_appointments}</div>
                    </div>
                    <div class="stat">
                        <div class="stat-figure text-accent"><PawPrint attr:class="h-8 w-8" /></div>
                        <div class="stat-title">"Pets"</div>
                        <div class="stat-value">{move || stats.get().total_pets}</div>
                    </div>
                    <div class="stat">
                        <div class="stat-figure text-info"><Calendar attr:class="h-8 w-8" /></div>
                        <div class="stat-title">"Today's Appointments"</div>
                        <div class="stat-value">{move || stats.get().today_appointments}</div>
                    </div>
                </div>

                <section>
                    <h2 class="text-xl font-semibold mb-3">"Today"</h2>
                    {move || agenda_table(agenda.with(|a| a.today.clone()), "No appointments today.")}
                </section>

                <section>
                    <h2 class="text-xl font-semibold mb-3">"Upcoming"</h2>
                    {move || agenda_table(agenda.with(|a| a.upcoming.clone()), "No upcoming appointments.")}
                </section>
            </Show>
        </div>
    }
}

fn agenda_table(list: Vec<Appointment>, empty: &'static str) -> AnyView {
    if list.is_empty() {
        return view! { <EmptyState message=empty /> }.into_any();
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
                        <th>"Doctor"</th>
                        <th>"Status"</th>
                    </tr>
                </thead>
                <tbody>
                    {list
                        .into_iter()
                        .map(|a| view! {
                            <tr class="hover">
                                <td>{format_date(a.appointment_date)}</td>
                                <td>{format_time(a.appointment_date)}</td>
                                <td>{a.pet_name().to_string()}</td>
                                <td>{a.owner_name().unwrap_or_default()}</td>
                                <td>{a.doctor_name().unwrap_or_default()}</td>
                                <td><StatusBadge status=a.status /></td>
                            </tr>
                        })
                        .collect_view()}
                </tbody>
            </table>
        </div>
    }
    .into_any()
}
