use crate::api::{or_offline, use_api};
use crate::auth::use_auth;
use crate::components::icons::{Pencil, Plus, Trash2};
use crate::components::widgets::{EmptyState, Spinner, format_date};
use crate::notify::use_notify;
use crate::web::confirm;
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use vetdesk_shared::{Operation, Pet};

/// 宠物主人的宠物列表
#[component]
pub fn PetsPage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let notify = use_notify();

    let (pets, set_pets) = signal(Vec::<Pet>::new());
    let (loading, set_loading) = signal(true);

    let load_pets = {
        let api = api.clone();
        move || {
            let Some(user) = auth.user_untracked() else {
                return;
            };
            let api = api.clone();
            set_loading.set(true);
            spawn_local(async move {
                let result = api.list_pets(Some(&user.id)).await;
                match or_offline(&api, result, |data| data.pets(Some(&user.id))) {
                    Ok(sourced) => {
                        notify.set_offline(sourced.is_offline());
                        set_pets.set(sourced.into_inner());
                    }
                    Err(e) => notify.error(e.user_message(Operation::FetchPets)),
                }
                set_loading.set(false);
            });
        }
    };

    // 初始加载
    Effect::new(move |_| {
        if auth.user().is_some() {
            load_pets();
        }
    });

    let handle_delete = move |pet: Pet| {
        if !confirm(&format!("Are you sure you want to delete {}?", pet.name)) {
            return;
        }
        let api = api.clone();
        spawn_local(async move {
            match api.delete_pet(&pet.id).await {
                Ok(()) => {
                    notify.success("Pet deleted successfully");
                    set_pets.update(|list| list.retain(|p| p.id != pet.id));
                }
                Err(e) => notify.error(e.user_message(Operation::DeletePet)),
            }
        });
    };
    let on_delete = Callback::new(handle_delete);

    view! {
        <div class="container mx-auto px-4 py-8 max-w-5xl">
            <div class="flex justify-between items-center mb-6">
                <h1 class="text-3xl font-bold">"My Pets"</h1>
                <Link to="/pets/add" class="btn btn-primary gap-2">
                    <Plus attr:class="h-4 w-4" />
                    "Add Pet"
                </Link>
            </div>

            <Show when=move || !loading.get() fallback=|| view! { <Spinner /> }>
                <Show
                    when=move || pets.with(|p| !p.is_empty())
                    fallback=|| view! { <EmptyState message="You haven't added any pets yet." /> }
                >
                    <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-4">
                        <For
                            each=move || pets.get()
                            key=|pet| pet.id.clone()
                            children=move |pet: Pet| view! { <PetCard pet=pet on_delete=on_delete /> }
                        />
                    </div>
                </Show>
            </Show>
        </div>
    }
}

#[component]
fn PetCard(pet: Pet, on_delete: Callback<Pet>) -> impl IntoView {
    let notify = use_notify();
    let edit_path = format!("/pets/edit/{}", pet.id);
    let born = pet
        .date_of_birth
        .map(|d| d.format("%b %-d, %Y").to_string());
    let added = pet.created_at.map(format_date);
    let breed = pet.breed.clone();
    let target = pet.clone();

    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body">
                <h2 class="card-title">{pet.name.clone()}</h2>
                <div class="text-sm space-y-1 text-base-content/80">
                    <p><span class="font-semibold">"Type: "</span><span class="capitalize">{pet.species.clone()}</span></p>
                    {breed.map(|b| view! { <p><span class="font-semibold">"Breed: "</span>{b}</p> })}
                    <p><span class="font-semibold">"Gender: "</span><span class="capitalize">{pet.gender.clone()}</span></p>
                    {born.map(|d| view! { <p><span class="font-semibold">"Born: "</span>{d}</p> })}
                    {added.map(|d| view! { <p class="text-xs text-base-content/50">"Added " {d}</p> })}
                </div>
                <div class="card-actions justify-end mt-2">
                    <Link to=edit_path class="btn btn-sm btn-ghost gap-1">
                        <Pencil attr:class="h-4 w-4" />
                        "Edit"
                    </Link>
                    <button
                        class="btn btn-sm btn-error btn-outline gap-1"
                        disabled=move || notify.is_offline()
                        on:click=move |_| on_delete.run(target.clone())
                    >
                        <Trash2 attr:class="h-4 w-4" />
                        "Delete"
                    </button>
                </div>
            </div>
        </div>
    }
}
