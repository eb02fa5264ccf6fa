//! WASM bindings for the catalogue widget.
//!
//! The host page performs the fetch and hands the payload over as JSON; these
//! bindings own the widget state and return render-ready JSON on each update.

use crate::index::IndexOptions;
use crate::item::RawItem;
use crate::query::QueryEngine;
use crate::state::{WidgetConfig, WidgetState};
use crate::store::ItemStore;
use wasm_bindgen::prelude::*;

/// Stateful widget handle.
#[wasm_bindgen]
pub struct Widget {
    state: WidgetState,
}

#[wasm_bindgen]
impl Widget {
    /// Create a widget in the loading state.
    ///
    /// # Arguments
    /// * `bin` - Optional bin filter (empty string for none)
    /// * `options_json` - Optional JSON object of search options
    #[wasm_bindgen(constructor)]
    pub fn new(bin: Option<String>, options_json: Option<String>) -> Result<Widget, JsValue> {
        let index = match options_json.as_deref() {
            Some(json) if !json.trim().is_empty() => serde_json::from_str::<IndexOptions>(json)
                .map_err(|e| JsValue::from_str(&format!("JSON parse error: {}", e)))?,
            _ => IndexOptions::default(),
        };

        let config = WidgetConfig {
            bin: bin.filter(|b| !b.is_empty()),
            index,
        };

        Ok(Widget {
            state: WidgetState::new(config),
        })
    }

    /// Feed the fetched catalogue (a JSON array of records).
    ///
    /// # Returns
    /// JSON view after loading
    pub fn load(&mut self, items_json: &str) -> Result<String, JsValue> {
        let outcome = serde_json::from_str::<Vec<RawItem>>(items_json);
        self.update(|state| state.apply_fetch(outcome));
        self.view()
    }

    /// Report that the host's fetch failed.
    pub fn fail(&mut self, message: &str) -> Result<String, JsValue> {
        let message = message.to_string();
        self.update(|state| state.apply_fetch(Err::<Vec<RawItem>, _>(message)));
        self.view()
    }

    /// Apply a new query.
    ///
    /// # Returns
    /// JSON view with `loading`, `error`, `letters` and `groups`
    #[wasm_bindgen(js_name = setQuery)]
    pub fn set_query(&mut self, query: &str) -> Result<String, JsValue> {
        self.update(|state| state.on_query_change(query));
        self.view()
    }

    /// Current view as JSON.
    pub fn view(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state.view())
            .map_err(|e| JsValue::from_str(&format!("JSON serialize error: {}", e)))
    }
}

impl Widget {
    fn update(&mut self, transition: impl FnOnce(WidgetState) -> WidgetState) {
        let current = std::mem::replace(&mut self.state, WidgetState::new(WidgetConfig::default()));
        self.state = transition(current);
    }
}

/// Display tier for a bin or category label.
///
/// # Returns
/// One of `primary`, `warning`, `success`, `default`
#[wasm_bindgen(js_name = chipTier)]
pub fn chip_tier(label: &str) -> String {
    serde_json::to_value(crate::chip_tier(label))
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| "default".to_string())
}

/// Utility classes for a bin or category label.
#[wasm_bindgen(js_name = chipClasses)]
pub fn chip_classes(label: &str) -> String {
    crate::chip_tier(label).css_classes().to_string()
}

/// One-shot search: filter and group a catalogue without keeping state.
///
/// # Arguments
/// * `query` - Search query (empty for everything)
/// * `items_json` - JSON array of catalogue records
///
/// # Returns
/// JSON object mapping letters to items
#[wasm_bindgen(js_name = searchGrouped)]
pub fn search_grouped(query: &str, items_json: &str) -> Result<String, JsValue> {
    let raw: Vec<RawItem> = serde_json::from_str(items_json)
        .map_err(|e| JsValue::from_str(&format!("JSON parse error: {}", e)))?;

    let store = ItemStore::load(raw, None).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let engine = QueryEngine::with_defaults(store).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let grouped = crate::group(engine.search(query)).map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_json::to_string(&grouped)
        .map_err(|e| JsValue::from_str(&format!("JSON serialize error: {}", e)))
}
