// Copyright 2026 the Scrollfx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web demo: scroll-driven effects built with `scrollfx_web`.
//!
//! Builds a tall page with a fading hero title, a progress bar that scales
//! with the scroll position, a row of cards that slide in while their section
//! passes through the viewport, and a footer that gains a class once the
//! reader is past the middle of the page.
//!
//! Build with: `wasm-pack build --target web demos/scroll_page`
//!
//! Then serve `demos/scroll_page/` and open `index.html` in a browser.

// This crate only runs in the browser; suppress dead-code warnings when
// cargo-checking on a native host target.
#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "this crate only runs in the browser")
)]

use std::cell::RefCell;
use std::io;

use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement};

use scrollfx_core::diagnostics::Diagnostic;
use scrollfx_core::easing::Options;
use scrollfx_core::register::{element_bottom, element_top, register_animation, register_trigger};
use scrollfx_web::{DomHost, Publisher, PublisherConfig};

const NUM_CARDS: usize = 4;

const CARD_COLORS: [&str; NUM_CARDS] = [
    "rgba(242, 67, 54, 0.9)",
    "rgba(77, 176, 80, 0.9)",
    "rgba(33, 150, 243, 0.9)",
    "rgba(255, 194, 8, 0.9)",
];

/// Card animation options, in the same JSON shape a page could embed.
const CARD_OPTIONS: &str = r#"{"easing":"easeOut"}"#;

thread_local! {
    // The publisher owns the frame loop; dropping it would stop every effect.
    static PUBLISHER: RefCell<Option<Publisher<DomHost>>> = const { RefCell::new(None) };
}

/// Buffers one formatted event and sends it to the browser console.
struct ConsoleLine(Vec<u8>);

impl io::Write for ConsoleLine {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleLine {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.0);
        web_sys::console::log_1(&JsValue::from_str(line.trim_end()));
    }
}

fn js(diagnostic: Diagnostic) -> JsValue {
    JsValue::from_str(&diagnostic.to_string())
}

fn create_div(document: &Document, id: Option<&str>, class: Option<&str>) -> Result<HtmlElement, JsValue> {
    let el: HtmlElement = document.create_element("div")?.unchecked_into();
    if let Some(id) = id {
        el.set_id(id);
    }
    if let Some(class) = class {
        el.set_class_name(class);
    }
    Ok(el)
}

fn build_page(document: &Document) -> Result<(), JsValue> {
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;
    let bs = body.style();
    bs.set_property("margin", "0")?;
    bs.set_property("background", "#1a1a2e")?;
    bs.set_property("color", "#eee")?;
    bs.set_property("font-family", "sans-serif")?;

    let progress = create_div(document, Some("progress"), None)?;
    let ps = progress.style();
    ps.set_property("position", "fixed")?;
    ps.set_property("top", "0")?;
    ps.set_property("left", "0")?;
    ps.set_property("width", "100%")?;
    ps.set_property("height", "6px")?;
    ps.set_property("background", "#e94560")?;
    ps.set_property("transform-origin", "0 0")?;
    body.append_child(&progress)?;

    let hero = create_div(document, Some("hero"), None)?;
    hero.style().set_property("height", "100vh")?;
    let title = create_div(document, Some("hero-title"), None)?;
    title.set_text_content(Some("Scroll down"));
    let ts = title.style();
    ts.set_property("padding-top", "40vh")?;
    ts.set_property("text-align", "center")?;
    ts.set_property("font-size", "48px")?;
    hero.append_child(&title)?;
    body.append_child(&hero)?;

    let cards = create_div(document, Some("cards"), None)?;
    let cs = cards.style();
    cs.set_property("display", "flex")?;
    cs.set_property("justify-content", "space-around")?;
    cs.set_property("padding", "20vh 0")?;
    for color in CARD_COLORS {
        let card = create_div(document, None, Some("card"))?;
        let s = card.style();
        s.set_property("width", "160px")?;
        s.set_property("height", "220px")?;
        s.set_property("border-radius", "12px")?;
        s.set_property("background", color)?;
        cards.append_child(&card)?;
    }
    body.append_child(&cards)?;

    let spacer = create_div(document, None, None)?;
    spacer.style().set_property("height", "150vh")?;
    body.append_child(&spacer)?;

    let footer = create_div(document, Some("footer"), Some("dim"))?;
    footer.set_text_content(Some("You made it."));
    let fs = footer.style();
    fs.set_property("height", "50vh")?;
    fs.set_property("text-align", "center")?;
    body.append_child(&footer)?;

    let style = document.create_element("style")?;
    style.set_text_content(Some(
        "#footer{transition:opacity .4s;}#footer.dim{opacity:.2;}#footer.lit{opacity:1;}",
    ));
    document
        .head()
        .ok_or_else(|| JsValue::from_str("document has no head"))?
        .append_child(&style)?;
    Ok(())
}

fn register_effects(publisher: &Publisher<DomHost>) -> Result<(), JsValue> {
    register_animation(publisher, "#progress")
        .map_err(js)?
        .from(0.0, [("scaleX", 0.0)])
        .to(1.0, [("scaleX", 1.0)]);

    register_animation(publisher, "#hero-title")
        .map_err(js)?
        .from(0.0, [("opacity", 1.0), ("translateY", 0.0)])
        .to(0.2, [("opacity", 0.0), ("translateY", -80.0)]);

    let options: Options =
        serde_json::from_str(CARD_OPTIONS).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let start = element_top(publisher, "#cards").map_err(js)?;
    let end = element_bottom(publisher, "#cards").map_err(js)?;
    register_animation(publisher, ".card")
        .map_err(js)?
        .from(start, [("opacity", 0.0), ("translateY", 120.0), ("scaleX", 0.8), ("scaleY", 0.8)])
        .to(end, [("opacity", 1.0), ("translateY", 0.0), ("scaleX", 1.0), ("scaleY", 1.0)])
        .using(options);

    register_trigger(publisher, "#footer")
        .map_err(js)?
        .after(0.5)
        .apply_class("lit")
        .remove_class("dim");

    Ok(())
}

/// Entry point, called automatically by `wasm_bindgen(start)`.
#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    tracing_subscriber::fmt()
        .with_writer(|| ConsoleLine(Vec::new()))
        .with_max_level(tracing::Level::DEBUG)
        .without_time()
        .try_init()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    build_page(&document)?;

    let publisher = scrollfx_web::publisher(PublisherConfig::web())?;
    register_effects(&publisher)?;
    // Style the first frame before the browser paints it.
    publisher.tick();
    tracing::info!(subscribers = publisher.subscriber_count(), "scroll page ready");

    PUBLISHER.with(|slot| *slot.borrow_mut() = Some(publisher));
    Ok(())
}
