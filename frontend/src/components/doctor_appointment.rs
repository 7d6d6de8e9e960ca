//! 医生查看单个预约并填写诊断记录
//!
//! 只有被指派的医生可以进入；预约结束后记录只读。
//! "Complete" 会先保存记录再推进状态，保存失败时不改变状态。

use crate::api::{or_offline, use_api};
use crate::auth::use_auth;
use crate::components::icons::{ArrowLeft, Calendar, CheckCircle, Clock, Play};
use crate::components::widgets::{Spinner, StatusBadge, format_date, format_time};
use crate::notify::use_notify;
use crate::web::confirm;
use crate::web::router::{Link, use_navigate};
use leptos::prelude::*;
use leptos::task::spawn_local;
use vetdesk_shared::access::{ensure_assigned_doctor, ensure_details_editable, ensure_transition};
use vetdesk_shared::protocol::DetailsInput;
use vetdesk_shared::{ApiError, Appointment, AppointmentStatus, Operation};

const SCHEDULE_PATH: &str = "/doctor/schedule";

#[derive(Debug, Clone, Default, PartialEq)]
struct DetailsDraft {
    diagnosis: String,
    treatment: String,
    notes: String,
}

impl DetailsDraft {
    fn from_appointment(appointment: &Appointment) -> Self {
        let details = appointment.details.clone().unwrap_or_default();
        Self {
            diagnosis: details.diagnosis.unwrap_or_default(),
            treatment: details.treatment.unwrap_or_default(),
            notes: details.notes.unwrap_or_default(),
        }
    }

    fn to_input(&self) -> DetailsInput {
        DetailsInput::from_text(&self.diagnosis, &self.treatment, &self.notes)
    }
}

#[component]
pub fn DoctorAppointmentPage(#[prop(into)] id: String) -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let notify = use_notify();
    let navigate = use_navigate();

    let (appointment, set_appointment) = signal(Option::<Appointment>::None);
    let draft = RwSignal::new(DetailsDraft::default());
    let (busy, set_busy) = signal(false);

    {
        let api = api.clone();
        let id = id.clone();
        spawn_local(async move {
            let result = api.get_appointment(&id).await.map(Some);
            let loaded = or_offline(&api, result, |data| data.appointment(&id)).and_then(|sourced| {
                notify.set_offline(sourced.is_offline());
                sourced
                    .into_inner()
                    .ok_or_else(|| ApiError::from_status(404, ""))
            });

            match loaded {
                Ok(found) => {
                    let allowed = match auth.user_untracked() {
                        Some(user) => ensure_assigned_doctor(&found, &user),
                        None => return navigate("/login"),
                    };
                    if let Err(denied) = allowed {
                        notify.error(denied.to_string());
                        return navigate(SCHEDULE_PATH);
                    }
                    draft.set(DetailsDraft::from_appointment(&found));
                    set_appointment.set(Some(found));
                }
                Err(e) if e.is_not_found() => {
                    notify.error("Appointment not found");
                    navigate(SCHEDULE_PATH);
                }
                Err(e) => {
                    notify.error(e.user_message(Operation::FetchAppointment));
                    navigate(SCHEDULE_PATH);
                }
            }
        });
    }

    let status = move || appointment.with(|a| a.as_ref().map(|a| a.status));
    let locked = move || {
        appointment.with(|a| a.as_ref().is_none_or(|a| ensure_details_editable(a).is_err()))
    };
    let actions_disabled = move || busy.get() || notify.is_offline();

    let apply_status = move |next: AppointmentStatus| {
        set_appointment.update(|a| {
            if let Some(a) = a {
                a.status = next;
            }
        });
    };

    let on_save = {
        let api = api.clone();
        let id = id.clone();
        Callback::new(move |_: ()| {
            let api = api.clone();
            let id = id.clone();
            let input = draft.get_untracked().to_input();
            set_busy.set(true);
            spawn_local(async move {
                match api.save_appointment_details(&id, input).await {
                    Ok(details) => {
                        notify.success("Appointment details saved");
                        set_appointment.update(|a| {
                            if let Some(a) = a {
                                a.details = Some(details);
                            }
                        });
                    }
                    Err(e) => notify.error(e.user_message(Operation::SaveDetails)),
                }
                set_busy.set(false);
            });
        })
    };

    let on_start = {
        let api = api.clone();
        let id = id.clone();
        Callback::new(move |_: ()| {
            let Some(current) = appointment.get_untracked() else {
                return;
            };
            if let Err(denied) = ensure_transition(&current, AppointmentStatus::InProgress) {
                return notify.error(denied.to_string());
            }
            let api = api.clone();
            let id = id.clone();
            set_busy.set(true);
            spawn_local(async move {
                match api.start_appointment(&id).await {
                    Ok(_) => {
                        notify.success("Appointment started");
                        apply_status(AppointmentStatus::InProgress);
                    }
                    Err(e) => notify.error(e.user_message(Operation::StartAppointment)),
                }
                set_busy.set(false);
            });
        })
    };

    let on_complete = {
        let id = id.clone();
        Callback::new(move |_: ()| {
            let Some(current) = appointment.get_untracked() else {
                return;
            };
            if let Err(denied) = ensure_transition(&current, AppointmentStatus::Completed) {
                return notify.error(denied.to_string());
            }
            if !confirm("Are you sure you want to complete this appointment?") {
                return;
            }
            let api = api.clone();
            let id = id.clone();
            let input = draft.get_untracked().to_input();
            set_busy.set(true);
            spawn_local(async move {
                if let Err(e) = api.save_appointment_details(&id, input).await {
                    notify.error(e.user_message(Operation::SaveDetails));
                    set_busy.set(false);
                    return;
                }
                match api.complete_appointment(&id).await {
                    Ok(_) => {
                        notify.success("Appointment completed");
                        navigate(SCHEDULE_PATH);
                    }
                    Err(e) => notify.error(e.user_message(Operation::CompleteAppointment)),
                }
                set_busy.set(false);
            });
        })
    };

    let text_area = move |id: &'static str,
                          label: &'static str,
                          get: fn(&DetailsDraft) -> String,
                          set: fn(&mut DetailsDraft, String)| {
        view! {
            <div class="form-control">
                <label class="label" for=id>
                    <span class="label-text font-semibold">{label}</span>
                </label>
                <textarea
                    id=id
                    class="textarea textarea-bordered h-24"
                    disabled=locked
                    prop:value=move || draft.with(get)
                    on:input=move |ev| draft.update(|d| set(d, event_target_value(&ev)))
                ></textarea>
            </div>
        }
    };

    view! {
        <div class="container mx-auto px-4 py-8 max-w-3xl">
            <Link to=SCHEDULE_PATH class="btn btn-ghost btn-sm gap-1 mb-4">
                <ArrowLeft attr:class="h-4 w-4" />
                "Back to schedule"
            </Link>

            <Show when=move || appointment.with(Option::is_some) fallback=|| view! { <Spinner /> }>
                {move || appointment.get().map(|a| view! {
                    <div class="card bg-base-100 shadow mb-6">
                        <div class="card-body">
                            <div class="flex justify-between items-start">
                                <h1 class="card-title text-2xl">{a.pet_name().to_string()}</h1>
                                <StatusBadge status=a.status />
                            </div>
                            <div class="grid grid-cols-1 sm:grid-cols-2 gap-2 text-sm text-base-content/80">
                                <p class="flex items-center gap-2">
                                    <Calendar attr:class="h-4 w-4" />
                                    {format_date(a.appointment_date)}
                                </p>
                                <p class="flex items-center gap-2">
                                    <Clock attr:class="h-4 w-4" />
                                    {format_time(a.appointment_date)}
                                </p>
                                {a.pet.as_ref().map(|p| view! {
                                    <p>
                                        <span class="font-semibold">"Pet: "</span>
                                        <span class="capitalize">{p.species.clone()}</span>
                                        {p.breed.clone().map(|b| format!(", {}", b))}
                                    </p>
                                })}
                                {a.owner_name().map(|o| view! {
                                    <p><span class="font-semibold">"Owner: "</span>{o}</p>
                                })}
                            </div>
                            {a.description_text().map(|d| view! {
                                <p class="mt-2"><span class="font-semibold">"Reason: "</span>{d.to_string()}</p>
                            })}
                        </div>
                    </div>
                })}

                <div class="card bg-base-100 shadow">
                    <div class="card-body space-y-2">
                        <h2 class="card-title">"Medical Record"</h2>
                        {text_area("diagnosis", "Diagnosis", |d| d.diagnosis.clone(), |d, v| d.diagnosis = v)}
                        {text_area("treatment", "Treatment", |d| d.treatment.clone(), |d, v| d.treatment = v)}
                        {text_area("notes", "Notes", |d| d.notes.clone(), |d, v| d.notes = v)}

                        <div class="card-actions justify-end mt-4">
                            <Show when=move || !locked()>
                                <button
                                    class="btn btn-outline"
                                    disabled=actions_disabled
                                    on:click=move |_| on_save.run(())
                                >
                                    "Save Notes"
                                </button>
                            </Show>
                            <Show when=move || status() == Some(AppointmentStatus::Scheduled)>
                                <button
                                    class="btn btn-primary gap-1"
                                    disabled=actions_disabled
                                    on:click=move |_| on_start.run(())
                                >
                                    <Play attr:class="h-4 w-4" />
                                    "Start Appointment"
                                </button>
                            </Show>
                            <Show when=move || status() == Some(AppointmentStatus::InProgress)>
                                <button
                                    class="btn btn-success gap-1"
                                    disabled=actions_disabled
                                    on:click=move |_| on_complete.run(())
                                >
                                    <CheckCircle attr:class="h-4 w-4" />
                                    "Complete Appointment"
                                </button>
                            </Show>
                        </div>
                    </div>
                </div>
            </Show>
        </div>
    }
}
