//! Multi-file upload form.

use js_sys::Uint8Array;
use leptos::{ev, html, prelude::*};
use leptos_icons::Icon;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::File;

use crate::app::AppContext;
use crate::components::icons as ic;
use crate::core::transport::UploadFile;
use crate::core::upload::upload_files;
use crate::models::AppRoute;

stylance::import_crate_style!(css, "src/components/upload.module.css");

/// Copy a picked file into memory.
async fn read_file(file: &File) -> Result<UploadFile, JsValue> {
    let buffer = JsFuture::from(file.array_buffer()).await?;
    let mime = match file.type_() {
        t if t.is_empty() => "application/octet-stream".to_string(),
        t => t,
    };
    Ok(UploadFile {
        name: file.name(),
        mime,
        bytes: Uint8Array::new(&buffer).to_vec(),
    })
}

#[component]
pub fn UploadPage() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let input = NodeRef::<html::Input>::new();
    let picked = RwSignal::new(Vec::<String>::new());
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    let picked_files = move || -> Vec<File> {
        let Some(list) = input.get_untracked().and_then(|i| i.files()) else {
            return Vec::new();
        };
        (0..list.length()).filter_map(|i| list.item(i)).collect()
    };

    let on_change = move |_| {
        error.set(None);
        picked.set(picked_files().iter().map(File::name).collect());
    };

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let Some(api) = ctx.api() else {
            ctx.invalidate_session();
            return;
        };
        let files = picked_files();
        error.set(None);
        busy.set(true);
        spawn_local(async move {
            let mut uploads = Vec::with_capacity(files.len());
            for file in &files {
                match read_file(file).await {
                    Ok(upload) => uploads.push(upload),
                    Err(e) => {
                        leptos::logging::warn!("[upload] could not read {}: {:?}", file.name(), e);
                        error.try_set(Some(format!("Could not read {}", file.name())));
                        busy.try_set(false);
                        return;
                    }
                }
            }

            match upload_files(&api, uploads).await {
                Ok(flash) => {
                    ctx.upload_flash.set(Some(flash));
                    AppRoute::Dashboard.push();
                }
                Err(e) if e.is_session_expired() => ctx.invalidate_session(),
                Err(e) => {
                    error.try_set(Some(e.user_message()));
                }
            }
            busy.try_set(false);
        });
    };

    view! {
        <section class=css::card>
            <h1>"Upload files"</h1>
            <form class=css::form on:submit=on_submit>
                {move || error.get().map(|e| view! { <p class=css::error>{e}</p> })}
                <label class=css::drop>
                    <Icon icon=ic::UPLOAD />
                    <span>"Choose files"</span>
                    <input node_ref=input type="file" multiple on:change=on_change />
                </label>
                <ul class=css::picked>
                    {move || {
                        picked
                            .get()
                            .into_iter()
                            .map(|name| view! {
                                <li>
                                    <Icon icon=ic::for_file(&name) />
                                    <span>{name}</span>
                                </li>
                            })
                            .collect_view()
                    }}
                </ul>
                <button
                    class=css::submit
                    type="submit"
                    disabled=move || busy.get() || picked.with(Vec::is_empty)
                >
                    {move || if busy.get() { "Uploading..." } else { "Upload" }}
                </button>
            </form>
        </section>
    }
}
