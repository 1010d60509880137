//! Document metadata cards

use leptos::prelude::*;

/// One labelled metadata value; empty values render as "Not specified".
#[component]
pub fn MetadataCard(label: &'static str, icon: &'static str, values: Vec<String>) -> impl IntoView {
    let values: Vec<String> = values.into_iter().filter(|v| !v.trim().is_empty()).collect();

    view! {
        <div class="p-4 bg-slate-800 rounded-xl border border-slate-700">
            <div class="flex items-center gap-2 text-xs uppercase tracking-wider text-slate-500 mb-2">
                <span>{icon}</span>
                <span>{label}</span>
            </div>
            {if values.is_empty() {
                view! { <p class="text-sm text-slate-500 italic">"Not specified"</p> }.into_any()
            } else {
                view! {
                    <ul class="space-y-1">
                        {values.into_iter().map(|v| view! {
                            <li class="text-sm text-slate-200">{v}</li>
                        }).collect::<Vec<_>>()}
                    </ul>
                }.into_any()
            }}
        </div>
    }
}

/// Extraction confidence as a coloured badge
#[component]
pub fn ConfidenceBadge(percent: u8) -> impl IntoView {
    let tone = match percent {
        80..=100 => "bg-emerald-500/20 text-emerald-300 border-emerald-500/40",
        50..=79 => "bg-amber-500/20 text-amber-300 border-amber-500/40",
        _ => "bg-red-500/20 text-red-300 border-red-500/40",
    };

    view! {
        <span class=format!("px-2.5 py-1 rounded-full border text-xs font-medium {}", tone)>
            {format!("{}% confidence", percent)}
        </span>
    }
}
