//! Loading pages through the engine facade

use std::sync::Arc;

use probe_engine::hook::{Capability, JsFunction, JsValue, ManualClock, NavigationSource};
use probe_engine::{Config, Engine};

const LOGIN: &str = r##"<!DOCTYPE html>
<html>
<head><title>Sign in</title></head>
<body>
  <form id="login" action="/session" method="POST">
    <input name="user" type="email">
    <input name="pass" type="password">
    <button type="submit">Sign in</button>
  </form>
  <div class="form"><input name="newsletter"><button>Join</button></div>
  <a href="#" onclick="track('nav')">Docs</a>
</body>
</html>"##;

fn engine() -> Engine {
    Engine::new(Config {
        url: "https://app.example/login".into(),
        ..Config::default()
    })
}

#[test]
fn test_report_collects_forms_and_inline_handlers() {
    let page = engine().load_html(LOGIN).unwrap();
    let report = page.report();

    assert_eq!(report.url, "https://app.example/login");
    assert_eq!(report.forms.len(), 2);

    let login = &report.forms[0];
    assert_eq!(login.id, "login");
    assert_eq!(login.action, "/session");
    assert_eq!(login.method.as_deref(), Some("post"));
    assert_eq!(login.elements.len(), 3);
    assert_eq!(login.elements[0].kind.as_deref(), Some("email"));

    let pseudo = &report.forms[1];
    assert_eq!(pseudo.tag_name, "DIV");
    assert_eq!(pseudo.method, None);
    assert_eq!(pseudo.elements.len(), 2);

    assert_eq!(report.inline_listeners.len(), 1);
    assert_eq!(report.inline_listeners[0].listeners[0].kind, "onclick");
    assert!(report.inline_listeners[0].listeners[0].listener.contains("track('nav')"));

    assert!(report.navigated_links.is_empty());
    assert!(report.event_listeners.is_empty());
}

#[test]
fn test_script_activity_shows_in_report() {
    let clock = ManualClock::new();
    let page = engine()
        .load_html_with_clock(LOGIN, Arc::new(clock.clone()))
        .unwrap();
    let host = page.host();

    // A delayed redirect, the way a page script would schedule it
    let redirect_host = host.clone();
    let redirect = JsFunction::new("() => history.pushState({}, '', '/welcome')", move |_, _| {
        redirect_host.call(
            Capability::History,
            "pushState",
            &JsValue::Undefined,
            &[JsValue::Null, JsValue::from(""), JsValue::from("/welcome")],
        )
    });
    host.call(
        Capability::Window,
        "setTimeout",
        &JsValue::Undefined,
        &[JsValue::Function(redirect), JsValue::Number(2000.0)],
    )
    .unwrap();

    clock.advance(200.0);
    assert_eq!(page.run_timers(), 1);

    let report = page.report();
    assert_eq!(report.navigated_links.len(), 1);
    assert_eq!(report.navigated_links[0].source, NavigationSource::PushState);
    assert_eq!(report.navigated_links[0].url.as_deref(), Some("/welcome"));
    assert_eq!(page.url(), "https://app.example/login");
}

#[test]
fn test_report_serializes_with_page_field_names() {
    let page = engine().load_html(LOGIN).unwrap();
    page.host()
        .call(
            Capability::Window,
            "fetch",
            &JsValue::Undefined,
            &[JsValue::from("/api/me")],
        )
        .unwrap();

    let json = serde_json::to_value(page.report()).unwrap();
    assert_eq!(json["navigatedLinks"][0]["source"], "fetch");
    assert_eq!(json["navigatedLinks"][0]["url"], "/api/me");
    assert_eq!(json["forms"][0]["cssSelector"], "FORM#login");
    assert_eq!(json["forms"][0]["xpath"], "/html/body/form");
    assert!(json["eventListeners"].as_array().unwrap().is_empty());
    assert_eq!(json["inlineListeners"][0]["listeners"][0]["type"], "onclick");
}

#[test]
fn test_hook_config_flows_through() {
    let engine = Engine::new(Config::from_json(r#"{"hook": {"hook_navigation": false}}"#).unwrap());
    let page = engine.load_html("<p>x</p>").unwrap();
    page.host()
        .call(Capability::Window, "open", &JsValue::Undefined, &[JsValue::from("/a")])
        .unwrap();
    assert!(page.report().navigated_links.is_empty());
    assert_eq!(page.host().opened_windows(), vec!["/a".to_string()]);
}
