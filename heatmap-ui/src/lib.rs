//! Phần DOM cho heatmap trên WebAssembly: tooltip dùng chung và CSS hiệu ứng.

use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod styles;

pub const TOOLTIP_ELEMENT_ID: &str = "tooltipDiv";
pub const DEFAULT_TOOLTIP_CLASS: &str = "d3-calendar-tooltip";
pub const CELL_ANIMATION_NAME: &str = "heatmap-cell-in";
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
const STYLE_TAG_ATTRIBUTE: &str = "data-heatmap-ui";

/// Thuộc tính `style` của một ô, trễ theo `delay_secs` của ô đó.
#[wasm_bindgen]
pub fn cell_animation_style(delay_secs: f64) -> String {
    format!(
        "animation: {CELL_ANIMATION_NAME} 0.25s ease-out {delay_secs}s; animation-fill-mode: backwards;"
    )
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn px(value: f64) -> String {
    format!("{value}px")
}

#[cfg(target_arch = "wasm32")]
mod wasm_ui {
    use std::cell::RefCell;

    use heatmap_core::Tooltip;
    use wasm_bindgen::prelude::*;

    use crate::dom::DomTooltip;
    use crate::styles;

    thread_local! {
        static TOOLTIP: RefCell<Tooltip<DomTooltip>> =
            RefCell::new(Tooltip::new(DomTooltip::attach_to_window as fn() -> DomTooltip));
    }

    #[wasm_bindgen]
    pub fn install_styles() -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("Không truy cập được document"))?;
        styles::ensure_styles(&document)
    }

    /// Hiện tooltip phía trên con trỏ; phần tử được tạo ở lần gọi đầu.
    #[wasm_bindgen]
    pub fn show_tooltip(html: &str, page_x: f64, page_y: f64) {
        TOOLTIP.with(|tooltip| tooltip.borrow_mut().show(html, page_x, page_y));
    }

    #[wasm_bindgen]
    pub fn hide_tooltip() {
        TOOLTIP.with(|tooltip| tooltip.borrow_mut().hide());
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_ui::{hide_tooltip, install_styles, show_tooltip};

#[cfg(not(target_arch = "wasm32"))]
pub fn install_styles() -> Result<(), JsValue> {
    Err(JsValue::from_str(
        "heatmap-ui chỉ hỗ trợ biên dịch target wasm32",
    ))
}
