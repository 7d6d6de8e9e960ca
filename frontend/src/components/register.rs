use crate::api::use_api;
use crate::auth::{sign_up, use_auth};
use crate::notify::use_notify;
use crate::web::router::{Link, use_navigate};
use leptos::prelude::*;
use leptos::task::spawn_local;
use vetdesk_shared::session::SignUpOutcome;
use vetdesk_shared::validation::SignUpForm;
use vetdesk_shared::{Operation, Role};

/// 前台账号由诊所创建，不开放自助注册
const SELF_SERVICE_ROLES: [Role; 2] = [Role::PetOwner, Role::Doctor];

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let notify = use_notify();
    let navigate = use_navigate();

    let form = RwSignal::new(SignUpForm::default());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let req = match form.get_untracked().validate() {
            Ok(req) => req,
            Err(e) => {
                set_error_msg.set(Some(e.to_string()));
                return;
            }
        };

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let api = api.clone();
        spawn_local(async move {
            match sign_up(auth, &api, &req).await {
                Ok(SignUpOutcome::SignedIn(user)) => {
                    notify.success("Registration successful!");
                    navigate(user.role.landing_path());
                }
                Ok(SignUpOutcome::LoginRequired(_)) => {
                    notify.success("Registration successful! Please log in.");
                    navigate("/login");
                }
                Err(e) => {
                    log::warn!("sign up failed: {}", e);
                    set_error_msg.set(Some(e.user_message(Operation::SignUp)));
                }
            }
            set_is_submitting.set(false);
        });
    };

    let text_field = move |id: &'static str,
                           label: &'static str,
                           kind: &'static str,
                           get: fn(&SignUpForm) -> String,
                           set: fn(&mut SignUpForm, String)| {
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
        <div class="hero min-h-[80vh] bg-base-200">
            <div class="hero-content flex-col w-full max-w-lg">
                <h1 class="text-3xl font-bold">"Create an account"</h1>
                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        {move || error_msg.get().map(|msg| view! {
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{msg}</span>
                            </div>
                        })}

                        <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                            {text_field("first_name", "First name", "text", |f| f.first_name.clone(), |f, v| f.first_name = v)}
                            {text_field("last_name", "Last name", "text", |f| f.last_name.clone(), |f, v| f.last_name = v)}
                        </div>
                        {text_field("email", "Email", "email", |f| f.email.clone(), |f, v| f.email = v)}
                        {text_field("password", "Password", "password", |f| f.password.clone(), |f, v| f.password = v)}
                        {text_field("phone", "Phone (optional)", "tel", |f| f.phone.clone(), |f, v| f.phone = v)}

                        <div class="form-control">
                            <label class="label" for="role">
                                <span class="label-text">"I am a"</span>
                            </label>
                            <select
                                id="role"
                                class="select select-bordered"
                                on:change=move |ev| {
                                    let value = event_target_value(&ev);
                                    let role = SELF_SERVICE_ROLES
                                        .into_iter()
                                        .find(|r| r.as_str() == value)
                                        .unwrap_or_default();
                                    form.update(|f| f.role = role);
                                }
                            >
                                {SELF_SERVICE_ROLES
                                    .into_iter()
                                    .map(|role| view! {
                                        <option
                                            value=role.as_str()
                                            selected=move || form.with(|f| f.role == role)
                                        >
                                            {role.label()}
                                        </option>
                                    })
                                    .collect_view()}
                            </select>
                        </div>

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() { "Creating account..." } else { "Register" }}
                            </button>
                        </div>
                        <p class="text-center text-sm mt-2">
                            "Already registered? "
                            <Link to="/login" class="link link-primary">"Sign in"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
