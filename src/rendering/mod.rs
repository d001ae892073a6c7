//! レンダリングモジュール
//!
//! このモジュールは、ウォールのDOM側を担当します。
//! カード要素の生成、物理の姿勢をCSSトランスフォームとして書き込むシンク、
//! そして`requestAnimationFrame`によるフレームループを提供します。

mod cards;
mod frame;

pub use cards::*;
pub use frame::*;

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use crate::error::{WallError, WallResult};
use crate::testimonial::card_element_id;
use crate::utils::Viewport;
use crate::wall::{CardTransform, TransformSink};

/// ドキュメントを取得
pub fn document() -> WallResult<Document> {
    web_sys::window()
        .ok_or_else(|| WallError::Dom("window not available".to_string()))?
        .document()
        .ok_or_else(|| WallError::Dom("document not available".to_string()))
}

/// IDでHTML要素を取得
pub fn html_element_by_id(document: &Document, id: &str) -> WallResult<HtmlElement> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| WallError::Dom(format!("element #{} not found", id)))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| WallError::Dom(format!("element #{} is not an HtmlElement", id)))
}

/// ウィンドウの内寸
fn window_viewport() -> Viewport {
    let Some(window) = web_sys::window() else {
        return Viewport::default();
    };
    let dimension = |value: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
    };
    Viewport::new(dimension(window.inner_width()), dimension(window.inner_height()))
}

/// コンテナの現在の寸法をビューポートとして測る
///
/// 幅や高さが0の軸はウィンドウの内寸で補います。
pub fn measure(container: &HtmlElement) -> Viewport {
    let rect = container.get_bounding_client_rect();
    Viewport::new(rect.width() as f32, rect.height() as f32).or_fallback(window_viewport())
}

/// カード要素にトランスフォームを書き込むシンク
///
/// 毎フレームIDで要素を引き直すので、途中で取り除かれた要素は単にスキップされます。
pub struct DomTransformSink {
    document: Document,
    wall_id: String,
}

impl DomTransformSink {
    pub fn new(document: Document, wall_id: &str) -> Self {
        Self {
            document,
            wall_id: wall_id.to_string(),
        }
    }
}

impl TransformSink for DomTransformSink {
    fn apply(&mut self, card_id: &str, transform: &CardTransform) -> bool {
        let id = card_element_id(&self.wall_id, card_id);
        let Some(element) = self
            .document
            .get_element_by_id(&id)
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
        else {
            return false;
        };
        element
            .style()
            .set_property("transform", &transform.to_css())
            .is_ok()
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use crate::config::{SiteConfig, WallConfig};
    use crate::testimonial::Testimonial;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn testimonial(id: &str) -> Testimonial {
        Testimonial {
            id: id.to_string(),
            author_name: "<b>Aiko</b>".to_string(),
            author_title: Some("CTO".to_string()),
            author_avatar: None,
            text: "Great product".to_string(),
            rating: Some(4),
        }
    }

    #[wasm_bindgen_test]
    fn test_render_and_sync() {
        let document = document().unwrap();
        let container = document.create_element("div").unwrap();
        container.set_id("test_wall_container");
        document.body().unwrap().append_child(&container).unwrap();
        let container = html_element_by_id(&document, "test_wall_container").unwrap();

        let cards = render_cards(
            &document,
            &container,
            "test-wall",
            &[testimonial("a"), testimonial("b")],
            &SiteConfig::default(),
            &WallConfig::default(),
        )
        .unwrap();
        assert_eq!(cards.len(), 2);

        // ユーザー入力はテキストとして扱われる
        let card = html_element_by_id(&document, "test-wall-card-a").unwrap();
        assert!(card.inner_html().contains("&lt;b&gt;Aiko&lt;/b&gt;"));

        let mut sink = DomTransformSink::new(document.clone(), "test-wall");
        let transform = CardTransform { translate_x: 10.0, translate_y: 20.0, rotation: 0.5 };
        assert!(sink.apply("a", &transform));
        let applied = card.style().get_property_value("transform").unwrap();
        assert!(applied.starts_with("translate("));
        assert!(applied.contains("rotate("));

        // 取り除かれた要素はスキップ
        remove_cards(&cards);
        assert!(!sink.apply("a", &transform));

        container.remove();
    }

    fn mount_container(id: &str, style: &str) -> HtmlElement {
        let document = document().unwrap();
        let container = document.create_element("div").unwrap();
        container.set_id(id);
        container.set_attribute("style", style).unwrap();
        document.body().unwrap().append_child(&container).unwrap();
        html_element_by_id(&document, id).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_partial_render_is_rolled_back() {
        let document = document().unwrap();
        let container = mount_container("test_rollback_container", "width: 400px; height: 300px");

        let result = append_each(&container, &["a", "b", "c"], |id| {
            if *id == "c" {
                return Err(WallError::Dom("broken card".to_string()));
            }
            let card = document.create_element("div").unwrap().dyn_into::<HtmlElement>().unwrap();
            card.set_id(id);
            Ok(card)
        });

        assert!(matches!(result, Err(WallError::Dom(_))));
        assert_eq!(container.child_element_count(), 0);
        container.remove();
    }

    #[wasm_bindgen_test]
    fn test_measure_falls_back_to_window_height() {
        let container = mount_container("test_measure_container", "width: 400px");
        let window = web_sys::window().unwrap();
        let window_height = window.inner_height().unwrap().as_f64().unwrap() as f32;

        let viewport = measure(&container);
        assert_eq!(viewport.width, 400.0);
        assert_eq!(viewport.height, window_height);
        assert!(viewport.height > 0.0);
        container.remove();
    }
}
