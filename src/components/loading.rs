//! Progress notes for outstanding backend work

use leptos::prelude::*;

/// Backend work a view can be waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Upload,
    Sessions,
    Summary,
    Explanation,
    Reply,
}

impl Task {
    pub fn label(self) -> &'static str {
        match self {
            Task::Upload => "Analyzing document...",
            Task::Sessions => "Loading sessions...",
            Task::Summary => "Reading the whole document...",
            Task::Explanation => "Explaining clause...",
            Task::Reply => "Reviewing the document...",
        }
    }

    /// Extra line for work that can take a while.
    pub fn hint(self) -> Option<&'static str> {
        match self {
            Task::Upload => Some("This can take a minute for long contracts."),
            Task::Summary => Some("Long contracts take a little longer."),
            _ => None,
        }
    }

    fn is_prominent(self) -> bool {
        matches!(self, Task::Upload)
    }
}

/// Spinner with the label of the task being waited on
#[component]
pub fn Progress(task: Task) -> impl IntoView {
    let (ring, layout, text) = if task.is_prominent() {
        ("w-10 h-10 border-4", "flex flex-col items-center gap-3", "text-slate-300 font-medium")
    } else {
        ("w-4 h-4 border-2", "flex items-center gap-2", "text-sm text-slate-400")
    };

    view! {
        <div class=layout role="status">
            <span class=format!(
                "{} inline-block rounded-full border-amber-400 border-t-transparent animate-spin",
                ring
            )></span>
            <div>
                <p class=text>{task.label()}</p>
                {task.hint().map(|hint| view! { <p class="text-xs text-slate-500">{hint}</p> })}
            </div>
        </div>
    }
}

/// Placeholder bubble while the assistant reply is outstanding
#[component]
pub fn ReplyPending() -> impl IntoView {
    view! {
        <div class="flex items-start gap-3 message-appear">
            <div class="w-8 h-8 rounded-full bg-slate-700 flex items-center justify-center text-sm shrink-0">
                "⚖"
            </div>
            <div class="px-4 py-3 bg-slate-800 rounded-2xl rounded-tl-sm space-y-2 w-64">
                <p class="text-xs text-slate-500">{Task::Reply.label()}</p>
                <div class="h-2 rounded bg-slate-700 animate-pulse"></div>
                <div class="h-2 w-2/3 rounded bg-slate-700 animate-pulse"></div>
            </div>
        </div>
    }
}
