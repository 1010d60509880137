//! Upload page - drop a document or reopen an earlier session

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;
use web_sys::{File, FileList, HtmlInputElement};

use crate::actions;
use crate::api::ApiClient;
use crate::components::{Progress, SessionList, Task};
use crate::state::AppState;

/// Pick the single file out of a picker or drop, rejecting anything else.
fn single_file(files: Option<FileList>) -> Result<File, String> {
    let files = files.ok_or_else(|| "No file selected.".to_string())?;
    match files.length() {
        0 => Err("No file selected.".to_string()),
        1 => files.item(0).ok_or_else(|| "No file selected.".to_string()),
        _ => Err("Please upload one document at a time.".to_string()),
    }
}

#[component]
pub fn UploadPage() -> impl IntoView {
    let state = expect_context::<AppState>();
    let client = expect_context::<ApiClient>();

    let is_uploading = RwSignal::new(false);
    let is_dragging = RwSignal::new(false);
    let error = RwSignal::new(Option::<String>::None);

    let sessions_loading = RwSignal::new(true);
    let sessions_error = RwSignal::new(Option::<String>::None);
    let busy_session = RwSignal::new(Option::<String>::None);

    // Load the sessions list once on mount
    let client_for_list = client.clone();
    Effect::new(move |_| {
        let client = client_for_list.clone();
        spawn_local(async move {
            match actions::list_sessions(&client).await {
                Ok(sessions) => state.set_sessions(sessions),
                Err(e) => sessions_error.set(Some(e.to_string())),
            }
            sessions_loading.set(false);
        });
    });

    let client_for_upload = client.clone();
    let start_upload = move |files: Option<FileList>| {
        if is_uploading.get_untracked() {
            return;
        }
        let file = match single_file(files) {
            Ok(file) => file,
            Err(msg) => {
                error.set(Some(msg));
                return;
            }
        };
        let file_name = file.name();

        is_uploading.set(true);
        error.set(None);
        let client = client_for_upload.clone();
        spawn_local(async move {
            // On success the coordinator switches to the analysis view and
            // this page is unmounted.
            if let Err(e) = actions::upload_document(&client, &state, &file_name, file).await {
                error.set(Some(e.to_string()));
            }
            is_uploading.set(false);
        });
    };

    let upload_from_picker = start_upload.clone();
    let on_file_change = move |ev: web_sys::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
        else {
            return;
        };
        upload_from_picker(input.files());
        // Allow picking the same file again after a failure
        input.set_value("");
    };

    let on_drop = move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        is_dragging.set(false);
        start_upload(ev.data_transfer().and_then(|dt| dt.files()));
    };

    let on_drag_over = move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        if !is_uploading.get_untracked() {
            is_dragging.set(true);
        }
    };

    let client_for_view = client.clone();
    let open_session = move |session_id: String| {
        if busy_session.get_untracked().is_some() {
            return;
        }
        busy_session.set(Some(session_id.clone()));
        sessions_error.set(None);
        let client = client_for_view.clone();
        spawn_local(async move {
            if let Err(e) = actions::load_session(&client, &state, &session_id).await {
                sessions_error.set(Some(e.to_string()));
            }
            busy_session.set(None);
        });
    };

    let client_for_delete = client;
    let delete_session = move |session_id: String| {
        if busy_session.get_untracked().is_some() {
            return;
        }
        busy_session.set(Some(session_id.clone()));
        sessions_error.set(None);
        let client = client_for_delete.clone();
        spawn_local(async move {
            match actions::delete_session(&client, &state, &session_id).await {
                Ok(()) => state.forget_session(&session_id),
                Err(e) => sessions_error.set(Some(e.to_string())),
            }
            busy_session.set(None);
        });
    };

    view! {
        <div class="max-w-4xl w-full mx-auto px-4 py-12 space-y-12">
            <section class="text-center">
                <h2 class="text-4xl font-bold mb-3">"Understand your legal documents"</h2>
                <p class="text-slate-400">
                    "Upload a contract to get its key terms, clause-by-clause explanations, and answers to your questions."
                </p>
            </section>

            <section>
                <label
                    on:drop=on_drop
                    on:dragover=on_drag_over
                    on:dragleave=move |_| is_dragging.set(false)
                    class=move || format!(
                        "block border-2 border-dashed rounded-2xl p-12 text-center transition-colors {}",
                        if is_uploading.get() {
                            "border-slate-700 bg-slate-800/30 cursor-wait opacity-70"
                        } else if is_dragging.get() {
                            "border-amber-400 bg-amber-500/10 cursor-copy"
                        } else {
                            "border-slate-600 hover:border-amber-500/60 cursor-pointer"
                        }
                    )
                >
                    <input
                        type="file"
                        accept=".pdf,.docx,application/pdf,application/vnd.openxmlformats-officedocument.wordprocessingml.document"
                        class="hidden"
                        disabled=move || is_uploading.get()
                        on:change=on_file_change
                    />
                    {move || if is_uploading.get() {
                        view! {
                            <Progress task=Task::Upload />
                        }.into_any()
                    } else {
                        view! {
                            <div class="flex flex-col items-center gap-3">
                                <div class="text-5xl">"📄"</div>
                                <p class="text-slate-200 font-medium">"Drop a PDF or DOCX here, or click to browse"</p>
                                <p class="text-xs text-slate-500">"One document at a time"</p>
                            </div>
                        }.into_any()
                    }}
                </label>

                {move || error.get().map(|msg| view! {
                    <div class="mt-4 p-3 rounded-lg bg-red-500/10 border border-red-500/40 text-sm text-red-300">
                        {msg}
                    </div>
                })}
            </section>

            <section>
                <h3 class="text-lg font-semibold mb-4">"Previous sessions"</h3>
                {move || sessions_error.get().map(|msg| view! {
                    <div class="mb-4 p-3 rounded-lg bg-red-500/10 border border-red-500/40 text-sm text-red-300">
                        {msg}
                    </div>
                })}
                <Show
                    when=move || !sessions_loading.get()
                    fallback=|| view! { <Progress task=Task::Sessions /> }
                >
                    <SessionList
                        sessions=Signal::derive(move || state.sessions())
                        busy=busy_session
                        on_view=open_session.clone()
                        on_delete=delete_session.clone()
                    />
                </Show>
            </section>
        </div>
    }
}
