use leptos::prelude::*;

#[allow(non_snake_case)]
#[component]
pub fn FeatureCard(
    #[prop(into)] title: String,
    #[prop(into)] icon: String,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="feature-card p-8 rounded-2xl bg-white shadow-sm dark:bg-neutral-900">
            <span class="text-4xl" aria-hidden="true">
                {icon}
            </span>
            <h3 class="mt-4 text-2xl font-semibold">{title}</h3>
            <p class="mt-2 text-lg opacity-80">{children()}</p>
        </div>
    }
}

#[allow(non_snake_case)]
#[component]
pub fn Stat(#[prop(into)] value: String, #[prop(into)] label: String) -> impl IntoView {
    view! {
        <div class="stat flex flex-col items-center">
            <span class="text-5xl font-bold">{value}</span>
            <span class="mt-2 text-sm uppercase tracking-wide opacity-70">{label}</span>
        </div>
    }
}
