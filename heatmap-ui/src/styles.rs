#![cfg(target_arch = "wasm32")]

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Node};

use crate::{CELL_ANIMATION_NAME, STYLE_TAG_ATTRIBUTE};

const STYLE_TAG_SELECTOR: &str = "style[data-heatmap-ui]";

/// Keyframes cho hiệu ứng xuất hiện của ô cùng kiểu mặc định của tooltip.
fn default_styles() -> String {
    format!(
        r#"
@keyframes {CELL_ANIMATION_NAME} {{
  0% {{
    transform: translateY(-12px) scale(0.4);
    opacity: 0;
  }}
  100% {{
    transform: translateY(0) scale(1);
    opacity: 1;
  }}
}}

.d3-calendar-tooltip {{
  pointer-events: none;
  padding: 4px 8px;
  border-radius: 4px;
  background: rgba(17, 24, 28, 0.85);
  color: #ffffff;
  font-size: 12px;
  white-space: nowrap;
}}
"#
    )
}

/// Chèn thẻ `<style>` một lần; đã có thì bỏ qua.
pub fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    if document.query_selector(STYLE_TAG_SELECTOR)?.is_some() {
        return Ok(());
    }

    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("Document không có thẻ <head>"))?;

    let style_el = document.create_element("style")?;
    style_el.set_attribute(STYLE_TAG_ATTRIBUTE, "v1")?;
    style_el.set_text_content(Some(&default_styles()));
    head.append_child(&style_el.dyn_into::<Node>()?)?;

    Ok(())
}
