//! Page glue for the account modal and the leaderboard
//!
//! Plain DOM manipulation over the elements declared in `index.html`. All
//! backend calls run on the browser executor; results are rendered through
//! `LeaderboardView`.

use std::cell::Cell;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use gloo::utils::document;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlElement, HtmlInputElement};

use crate::leaderboard::view::{AuthForm, AuthOutcome, LeaderboardView, personal_best_line};
use crate::leaderboard::{CloudClient, Credentials, LeaderboardFilter, Session};

fn by_id(id: &str) -> Option<HtmlElement> {
    document().get_element_by_id(id)?.dyn_into().ok()
}

fn set_visible(id: &str, visible: bool) {
    if let Some(el) = by_id(id) {
        let _ = el.class_list().toggle_with_force("hidden", !visible);
    }
}

fn set_text(id: &str, text: &str) {
    if let Some(el) = by_id(id) {
        el.set_text_content(Some(text));
    }
}

fn input_value(id: &str) -> String {
    document()
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
        .unwrap_or_default()
}

fn clear_input(id: &str) {
    if let Some(input) = document()
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    {
        input.set_value("");
    }
}

fn on_click(id: &str, mut handler: impl FnMut() + 'static) {
    if let Some(el) = by_id(id) {
        EventListener::new(&el, "click", move |_| handler()).forget();
    } else {
        log::warn!("Missing element #{id}");
    }
}

/// Submit when Enter is pressed inside an input
fn on_enter(id: &str, handler: Rc<dyn Fn()>) {
    if let Some(el) = by_id(id) {
        EventListener::new(&el, "keypress", move |event| {
            if let Some(event) = event.dyn_ref::<web_sys::KeyboardEvent>()
                && event.key() == "Enter"
            {
                handler();
            }
        })
        .forget();
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum MessageKind {
    Error,
    Success,
}

fn show_message(text: &str, kind: MessageKind) {
    let Some(el) = by_id("authMessage") else {
        return;
    };
    el.set_text_content(Some(text));
    let classes = el.class_list();
    let _ = classes.remove_3("hidden", "error", "success");
    let _ = classes.add_1(match kind {
        MessageKind::Error => "error",
        MessageKind::Success => "success",
    });
}

fn hide_message() {
    set_text("authMessage", "");
    set_visible("authMessage", false);
}

fn show_auth_modal(signup: bool) {
    set_visible("authModal", true);
    set_visible("loginForm", !signup);
    set_visible("signupForm", signup);
    set_text("authTitle", if signup { "Sign Up" } else { "Login" });
    hide_message();
}

fn hide_auth_modal() {
    set_visible("authModal", false);
    for id in [
        "loginEmail",
        "loginPassword",
        "signupUsername",
        "signupEmail",
        "signupPassword",
    ] {
        clear_input(id);
    }
    hide_message();
}

fn update_user_panel(session: &Session) {
    set_visible("userPanel", session.is_authenticated());
    set_visible("loginPrompt", !session.is_authenticated());
    set_text("username", session.display_name());
}

/// Disable the form's button while its request is in flight. Returns false
/// when a request is already pending.
fn set_busy(form: AuthForm, busy: bool) -> bool {
    let Some(button) = by_id(form.button_id()) else {
        return busy;
    };
    if busy && button.has_attribute("disabled") {
        return false;
    }
    let _ = if busy {
        button.set_attribute("disabled", "")
    } else {
        button.remove_attribute("disabled")
    };
    button.set_text_content(Some(form.button_label(busy)));
    true
}

fn show_outcome(outcome: AuthOutcome) {
    let kind = if outcome.success {
        MessageKind::Success
    } else {
        MessageKind::Error
    };
    show_message(&outcome.message, kind);
    if let Some(delay) = outcome.close_after_ms {
        Timeout::new(delay, hide_auth_modal).forget();
    }
}

/// Render rows with text nodes only (usernames are user input)
fn render_table(view: &LeaderboardView) {
    let Some(table) = by_id("leaderboardTable") else {
        return;
    };
    table.set_inner_html("");
    let doc = document();

    let LeaderboardView::Rows(rows) = view else {
        if let Ok(note) = doc.create_element("div") {
            note.set_class_name("loading");
            note.set_text_content(view.message());
            let _ = table.append_child(&note);
        }
        return;
    };

    for row in rows {
        let Ok(entry) = doc.create_element("div") else {
            continue;
        };
        entry.set_class_name(&row.css_class());

        let parts = [
            ("leaderboard-rank", row.rank_label()),
            ("leaderboard-username", row.username.clone()),
            ("leaderboard-details", row.details.clone()),
            ("leaderboard-score", row.score.to_string()),
        ];
        for (class, text) in parts {
            if let Ok(cell) = doc.create_element("div") {
                cell.set_class_name(class);
                cell.set_text_content(Some(&text));
                let _ = entry.append_child(&cell);
            }
        }
        let _ = table.append_child(&entry);
    }
}

fn load_leaderboard(client: Rc<CloudClient>, filter: LeaderboardFilter) {
    render_table(&LeaderboardView::Loading);
    spawn_local(async move {
        let view = LeaderboardView::from_result(client.top_scores(filter).await);

        let best = if client.session().is_authenticated() {
            personal_best_line(client.personal_best(filter).await)
        } else {
            None
        };
        set_visible("personalBest", best.is_some());
        if let Some(line) = best {
            set_text("personalBestScore", &line);
        }

        render_table(&view);
    });
}

fn select_tab(filter: LeaderboardFilter) {
    let Ok(buttons) = document().query_selector_all(".tab-btn") else {
        return;
    };
    for i in 0..buttons.length() {
        if let Some(button) = buttons
            .item(i)
            .and_then(|node| node.dyn_into::<HtmlElement>().ok())
        {
            let active = button.get_attribute("data-difficulty").as_deref() == Some(filter.tab());
            let _ = button.class_list().toggle_with_force("active", active);
        }
    }
}

/// Wire up the account and leaderboard UI. Without a client the cloud
/// controls are hidden.
pub fn install(client: Option<Rc<CloudClient>>) {
    let Some(client) = client else {
        log::info!("Cloud leaderboard not configured");
        for id in ["loginPrompt", "userPanel", "leaderboardBtn"] {
            set_visible(id, false);
        }
        return;
    };

    update_user_panel(&client.session().snapshot());
    client.session().subscribe(update_user_panel);

    on_click("loginPrompt", || show_auth_modal(false));
    on_click("authClose", hide_auth_modal);
    on_click("showSignup", || show_auth_modal(true));
    on_click("showLogin", || show_auth_modal(false));

    let login: Rc<dyn Fn()> = {
        let client = client.clone();
        Rc::new(move || {
            if !set_busy(AuthForm::Login, true) {
                return;
            }
            let client = client.clone();
            let email = input_value("loginEmail");
            let credentials = Credentials::new(&email, &input_value("loginPassword"), "");
            spawn_local(async move {
                let result = client.sign_in(&credentials).await;
                set_busy(AuthForm::Login, false);
                show_outcome(AuthOutcome::new(AuthForm::Login, result));
            });
        })
    };
    let signup: Rc<dyn Fn()> = {
        let client = client.clone();
        Rc::new(move || {
            if !set_busy(AuthForm::SignUp, true) {
                return;
            }
            let client = client.clone();
            let credentials = Credentials::new(
                &input_value("signupEmail"),
                &input_value("signupPassword"),
                &input_value("signupUsername"),
            );
            spawn_local(async move {
                let result = client.sign_up(&credentials).await;
                set_busy(AuthForm::SignUp, false);
                show_outcome(AuthOutcome::new(AuthForm::SignUp, result));
            });
        })
    };

    {
        let login = login.clone();
        on_click("loginBtn", move || login());
    }
    {
        let signup = signup.clone();
        on_click("signupBtn", move || signup());
    }
    on_enter("loginEmail", login.clone());
    on_enter("loginPassword", login);
    on_enter("signupPassword", signup);

    {
        let client = client.clone();
        on_click("logoutBtn", move || {
            let client = client.clone();
            spawn_local(async move {
                if let Err(e) = client.sign_out().await {
                    log::warn!("Sign-out request failed: {e}");
                }
            });
        });
    }

    let tab = Rc::new(Cell::new(LeaderboardFilter::All));
    {
        let client = client.clone();
        let tab = tab.clone();
        on_click("leaderboardBtn", move || {
            set_visible("leaderboardModal", true);
            select_tab(tab.get());
            load_leaderboard(client.clone(), tab.get());
        });
    }
    on_click("leaderboardClose", || set_visible("leaderboardModal", false));

    if let Ok(buttons) = document().query_selector_all(".tab-btn") {
        for i in 0..buttons.length() {
            let Some(button) = buttons
                .item(i)
                .and_then(|node| node.dyn_into::<HtmlElement>().ok())
            else {
                continue;
            };
            let tab_name = button.get_attribute("data-difficulty").unwrap_or_default();
            let filter = LeaderboardFilter::from_tab(&tab_name);
            let client = client.clone();
            let tab = tab.clone();
            EventListener::new(&button, "click", move |_| {
                tab.set(filter);
                select_tab(filter);
                load_leaderboard(client.clone(), filter);
            })
            .forget();
        }
    }

    // Clicking the backdrop closes a modal
    for id in ["authModal", "leaderboardModal"] {
        if let Some(modal) = by_id(id) {
            let target_modal = modal.clone();
            EventListener::new(&modal, "click", move |event| {
                let on_backdrop = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlElement>().ok())
                    .is_some_and(|t| t == target_modal);
                if on_backdrop {
                    let _ = target_modal.class_list().add_1("hidden");
                }
            })
            .forget();
        }
    }

    spawn_local(async move { client.restore().await });
}
