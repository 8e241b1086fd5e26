use leptos::{ev, prelude::*, tachys::dom::window};
use state::Theme;
use web_sys::KeyboardEvent;

use crate::components::{context::ThemeContext, themetoggle::ThemeToggle};

/// Scroll offset, in pixels, past which the navbar turns opaque.
pub const SCROLL_THRESHOLD: f64 = 50.0;

pub struct MenuLink {
    pub label: &'static str,
    pub href: &'static str,
}

pub struct MenuColumn {
    pub heading: &'static str,
    pub links: &'static [MenuLink],
}

pub struct MenuSection {
    pub title: &'static str,
    pub columns: &'static [MenuColumn],
}

pub static MENU: &[MenuSection] = &[
    MenuSection {
        title: "Products",
        columns: &[
            MenuColumn {
                heading: "Explore",
                links: &[
                    MenuLink {
                        label: "All products",
                        href: "#products",
                    },
                    MenuLink {
                        label: "Compare",
                        href: "#compare",
                    },
                ],
            },
            MenuColumn {
                heading: "Accessories",
                links: &[
                    MenuLink {
                        label: "Cases",
                        href: "#cases",
                    },
                    MenuLink {
                        label: "Chargers",
                        href: "#chargers",
                    },
                ],
            },
        ],
    },
    MenuSection {
        title: "Support",
        columns: &[MenuColumn {
            heading: "Help",
            links: &[
                MenuLink {
                    label: "Contact us",
                    href: "#contact",
                },
                MenuLink {
                    label: "Repairs",
                    href: "#repairs",
                },
            ],
        }],
    },
];

/// Navbar state that doesn't depend on the DOM.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct NavState {
    pub scrolled: bool,
    pub open_menu: Option<usize>,
    pub mobile_open: bool,
}

impl NavState {
    pub fn scrolled_past(&mut self, scroll_y: f64) { self.scrolled = scroll_y > SCROLL_THRESHOLD; }

    /// Opens panel `index`, closing any other. Activating the open trigger
    /// closes it.
    pub fn toggle_menu(&mut self, index: usize) {
        self.open_menu = if self.open_menu == Some(index) {
            None
        } else {
            Some(index)
        };
    }

    pub fn close_menus(&mut self) { self.open_menu = None; }

    pub fn toggle_mobile(&mut self) {
        self.mobile_open = !self.mobile_open;
        if !self.mobile_open {
            self.open_menu = None;
        }
    }

    pub fn background(&self, theme: Theme) -> &'static str {
        let palette = theme.palette();
        if self.scrolled {
            palette.navbar_background_scrolled
        } else {
            palette.navbar_background
        }
    }
}

#[allow(non_snake_case)]
#[component]
pub fn Nav(
    #[prop(into)] name: Signal<String>,
    #[prop(into)] logo: Signal<String>,
) -> impl IntoView {
    let ctx = expect_context::<ThemeContext>();
    let nav = RwSignal::new(NavState::default());

    let scroll = window_event_listener(ev::scroll, move |_| {
        let y = window().scroll_y().unwrap_or_default();
        if (y > SCROLL_THRESHOLD) != nav.read_untracked().scrolled {
            nav.update(|n| n.scrolled_past(y));
        }
    });
    on_cleanup(move || scroll.remove());

    view! {
        <nav
            class="navbar sticky top-0 z-50 backdrop-blur"
            class:scrolled=move || nav.read().scrolled
            style:background-color=move || nav.read().background(ctx.theme.get())
            style:color=move || ctx.theme.get().palette().text_color
            on:keydown=move |ev: KeyboardEvent| {
                if ev.key() == "Escape" {
                    nav.update(|n| n.close_menus());
                }
            }
        >
            <div class="flex flex-wrap items-center justify-between mx-auto px-4 py-2 max-w-6xl">
                <a href="/" class="flex items-center">
                    <img class="w-8" src=move || logo.get() alt="Logo" />
                    <span class="ml-2 text-xl font-semibold whitespace-nowrap">
                        {move || name.get()}
                    </span>
                </a>
                <button
                    type="button"
                    class="md:hidden p-2 rounded-lg"
                    aria-controls="navbar-menu"
                    aria-expanded=move || nav.read().mobile_open.to_string()
                    on:click=move |_| nav.update(|n| n.toggle_mobile())
                >
                    <span class="sr-only">Open main menu</span>
                    <svg class="w-5 h-5" aria-hidden="true" xmlns="http://www.w3.org/2000/svg" fill="none" viewBox="0 0 17 14">
                        <path
                            stroke="currentColor"
                            stroke-linecap="round"
                            stroke-linejoin="round"
                            stroke-width="2"
                            d="M1 1h15M1 7h15M1 13h15"
                        ></path>
                    </svg>
                </button>
                <ul
                    id="navbar-menu"
                    class="w-full md:flex md:w-auto gap-6"
                    class:hidden=move || !nav.read().mobile_open
                >
                    {MENU
                        .iter()
                        .enumerate()
                        .map(|(i, section)| {
                            view! {
                                <li class="relative">
                                    <button
                                        type="button"
                                        class="mega-trigger py-2"
                                        aria-haspopup="true"
                                        aria-expanded=move || (nav.read().open_menu == Some(i)).to_string()
                                        on:click=move |_| nav.update(|n| n.toggle_menu(i))
                                    >
                                        {section.title}
                                    </button>
                                    <div
                                        class="mega-menu absolute left-0 mt-2 p-6 rounded-xl shadow-lg flex gap-8"
                                        class:hidden=move || nav.read().open_menu != Some(i)
                                        style:background-color=move || ctx.theme.get().palette().navbar_background_scrolled
                                    >
                                        {section
                                            .columns
                                            .iter()
                                            .map(|column| {
                                                view! {
                                                    <div>
                                                        <h4 class="text-xs uppercase opacity-60">{column.heading}</h4>
                                                        <ul>
                                                            {column
                                                                .links
                                                                .iter()
                                                                .map(|link| {
                                                                    view! {
                                                                        <li>
                                                                            <a
                                                                                href=link.href
                                                                                class="block py-1"
                                                                                on:click=move |_| nav.update(|n| n.close_menus())
                                                                            >
                                                                                {link.label}
                                                                            </a>
                                                                        </li>
                                                                    }
                                                                })
                                                                .collect_view()}
                                                        </ul>
                                                    </div>
                                                }
                                            })
                                            .collect_view()}
                                    </div>
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
                <div id="nav-actions" class="flex items-center gap-3">
                    <a href="#search" class="p-2" aria-label="Search">
                        "\u{1F50D}"
                    </a>
                    <ThemeToggle />
                    <a href="#buy" class="px-4 py-1 rounded-full text-white" style:background-color=move || ctx.theme.get().palette().primary_color>
                        "Buy"
                    </a>
                </div>
            </div>
        </nav>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_threshold() {
        let mut nav = NavState::default();
        nav.scrolled_past(50.0);
        assert!(!nav.scrolled);
        nav.scrolled_past(50.5);
        assert!(nav.scrolled);
        nav.scrolled_past(0.0);
        assert!(!nav.scrolled);
    }

    #[test]
    fn test_background_follows_theme_and_scroll() {
        let mut nav = NavState::default();
        assert_eq!(nav.background(Theme::Light), "rgba(255, 255, 255, 0.8)");
        assert_eq!(nav.background(Theme::Dark), "rgba(0, 0, 0, 0.8)");
        nav.scrolled_past(120.0);
        assert_eq!(nav.background(Theme::Light), "rgba(255, 255, 255, 0.95)");
        assert_eq!(nav.background(Theme::Dark), "rgba(0, 0, 0, 0.95)");
    }

    #[test]
    fn test_one_menu_open_at_a_time() {
        let mut nav = NavState::default();
        nav.toggle_menu(0);
        assert_eq!(nav.open_menu, Some(0));
        nav.toggle_menu(1);
        assert_eq!(nav.open_menu, Some(1));
        nav.toggle_menu(1);
        assert_eq!(nav.open_menu, None);
    }

    #[test]
    fn test_escape_and_mobile_close_menus() {
        let mut nav = NavState::default();
        nav.toggle_menu(1);
        nav.close_menus();
        assert_eq!(nav.open_menu, None);

        nav.toggle_mobile();
        nav.toggle_menu(0);
        assert!(nav.mobile_open);
        nav.toggle_mobile();
        assert!(!nav.mobile_open);
        assert_eq!(nav.open_menu, None);
    }

    #[test]
    fn test_menu_sections_have_links() {
        assert!(MENU.iter().all(|s| s.columns.iter().all(|c| !c.links.is_empty())));
    }
}
