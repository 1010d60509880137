//! Chat message component

use leptos::prelude::*;

use crate::markdown;
use crate::types::{ChatMessage, Role};

/// Render a single chat message
#[component]
pub fn ChatBubble(message: ChatMessage) -> impl IntoView {
    let is_user = message.role == Role::User;
    let time = message.timestamp.format("%H:%M").to_string();

    let body = if is_user {
        view! { <div class="whitespace-pre-wrap break-words">{message.content}</div> }.into_any()
    } else {
        // Assistant replies are Markdown from the backend.
        let html = markdown::to_html(&message.content);
        view! { <div class="prose prose-invert prose-sm max-w-none break-words" inner_html=html></div> }
            .into_any()
    };

    view! {
        <div class=format!(
            "flex items-start gap-3 message-appear {}",
            if is_user { "flex-row-reverse" } else { "" }
        )>
            <div class=format!(
                "w-8 h-8 rounded-full flex items-center justify-center text-white text-sm font-medium shrink-0 {}",
                if is_user {
                    "bg-gradient-to-br from-blue-500 to-cyan-500"
                } else {
                    "bg-gradient-to-br from-amber-500 to-orange-600"
                }
            )>
                {if is_user { "👤" } else { "⚖" }}
            </div>

            <div class=format!(
                "flex flex-col gap-1 max-w-[80%] {}",
                if is_user { "items-end" } else { "items-start" }
            )>
                <div class=format!(
                    "px-4 py-3 rounded-2xl {}",
                    if is_user {
                        "bg-blue-600 text-white rounded-tr-sm"
                    } else {
                        "bg-slate-800 text-slate-100 rounded-tl-sm"
                    }
                )>
                    {body}
                </div>

                <span class="text-xs text-slate-600 mt-1">{time}</span>
            </div>
        </div>
    }
}
