use parish_client::{Toast, ToastLevel};
use yew::prelude::*;

#[derive(Clone, PartialEq, Properties)]
pub struct ToastsProps {
    pub toasts: Vec<(u64, Toast)>,
    pub on_dismiss: Callback<u64>,
}

#[function_component(Toasts)]
pub fn toasts(p: &ToastsProps) -> Html {
    html! {
        <div class="toast-container position-fixed bottom-0 end-0 p-3">
            { for p.toasts.iter().map(|(id, toast)| {
                let level = match toast.level {
                    ToastLevel::Success => "text-bg-success",
                    ToastLevel::Info => "text-bg-info",
                    ToastLevel::Error => "text-bg-danger",
                };
                let id = *id;
                html! {
                    <div class={ classes!("toast", "show", level) } role="alert">
                        <div class="d-flex">
                            <div class="toast-body">{ &toast.message }</div>
                            <button
                                type="button"
                                class="btn-close me-2 m-auto"
                                aria-label="Close"
                                onclick={ p.on_dismiss.reform(move |_| id) }
                            ></button>
                        </div>
                    </div>
                }
            }) }
        </div>
    }
}
