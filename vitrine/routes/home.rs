use leptos::prelude::*;
use leptos_meta::Title;

use crate::components::{
    card::{FeatureCard, Stat},
    reveal::Reveal,
};

#[allow(non_snake_case)]
#[component]
pub fn Home() -> impl IntoView {
    view! {
        <Title text="Home" />
        <Reveal id="hero" class="hero py-32 text-center" stagger_ms=150>
            <h1 class="text-6xl font-bold">"Designed to disappear."</h1>
            <p class="mt-4 text-2xl opacity-80">"Everything you need. Nothing in the way."</p>
            <div class="mt-8 flex justify-center gap-4">
                <a href="#buy" class="px-6 py-3 rounded-full text-white bg-[#0071e3] dark:bg-[#2997ff]">
                    "Buy now"
                </a>
                <a href="#features" class="px-6 py-3">
                    "Learn more \u{203A}"
                </a>
            </div>
        </Reveal>
        <Reveal id="features" class="features grid md:grid-cols-3 gap-6 max-w-6xl mx-auto px-4">
            <FeatureCard title="Fast" icon="\u{26A1}">
                "Starts instantly and stays responsive all day."
            </FeatureCard>
            <FeatureCard title="Private" icon="\u{1F512}">
                "Your data stays on your device unless you say otherwise."
            </FeatureCard>
            <FeatureCard title="Durable" icon="\u{1F6E1}">
                "Built from recycled aluminium and tested to last."
            </FeatureCard>
        </Reveal>
        <Reveal id="stats" class="stats grid grid-cols-3 py-24 max-w-4xl mx-auto" threshold=0.25>
            <Stat value="2x" label="Faster graphics" />
            <Stat value="18h" label="Battery life" />
            <Stat value="100%" label="Recycled aluminium" />
        </Reveal>
        <Reveal id="cta" class="cta py-24 text-center">
            <h2 class="text-4xl font-semibold">"Ready when you are."</h2>
            <a href="#buy" class="inline-block mt-6 px-8 py-3 rounded-full text-white bg-[#0071e3] dark:bg-[#2997ff]">
                "Get started"
            </a>
        </Reveal>
    }
}
