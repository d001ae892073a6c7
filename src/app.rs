//! JavaScriptから使うウォールのインスタンス
//!
//! `mount_wall`でカードを描画し、非同期に物理ワールドを初期化します。
//! 初期化は1フレーム待ってから行い、その間に`unmount`された場合はワールドを作りません。

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement};

use crate::config::{SiteConfig, WallConfig, WallLayout};
use crate::error::WallResult;
use crate::input::{watch_hover, watch_resize, ListenerGuard};
use crate::rendering::{
    document, html_element_by_id, measure, next_animation_frame, remove_cards, render_cards,
    DomTransformSink, FrameLoop,
};
use crate::testimonial::{dedup_by_id, parse_testimonials, Testimonial};
use crate::utils::{init_logging, CancellationToken};
use crate::wall::{WallEngine, WallState};

/// 準備完了後にだけ存在する、動作中のウォールの資源
///
/// ドロップするとフレームループが止まり、すべてのリスナーが解除されます。
struct LiveWall {
    _frame_loop: FrameLoop,
    _listeners: Vec<ListenerGuard>,
}

/// マウントされたウォール
#[wasm_bindgen]
pub struct WallApp {
    wall_id: String,
    engine: Rc<RefCell<WallEngine>>,
    live: Rc<RefCell<Option<LiveWall>>>,
    active: CancellationToken,
    cards: Vec<HtmlElement>,
}

/// ウォールをマウントする
///
/// 入力の解析やカードの描画に失敗した場合はエラーを返します。
/// 物理ワールドの初期化は非同期で、失敗してもログに出力するだけです。
#[wasm_bindgen]
pub fn mount_wall(
    container_id: &str,
    testimonials_json: &str,
    site_config_json: &str,
    wall_config_json: Option<String>,
) -> Result<WallApp, JsValue> {
    let config = WallConfig::from_json(wall_config_json.as_deref().unwrap_or(""))?;
    init_logging(config.log_level);

    let site = SiteConfig::from_json(site_config_json)?;
    let testimonials = dedup_by_id(parse_testimonials(testimonials_json)?);
    Ok(WallApp::mount(container_id, testimonials, site, config)?)
}

impl WallApp {
    fn mount(
        container_id: &str,
        testimonials: Vec<Testimonial>,
        site: SiteConfig,
        config: WallConfig,
    ) -> WallResult<Self> {
        let wall_id = format!("wall-{}", uuid::Uuid::new_v4().simple());
        let document = document()?;
        let container = html_element_by_id(&document, container_id)?;
        let cards = render_cards(&document, &container, &wall_id, &testimonials, &site, &config)?;

        log::info!(
            "ウォール {} をマウントしました ({} 件, layout = {:?})",
            wall_id,
            testimonials.len(),
            site.layout
        );

        let app = WallApp {
            wall_id,
            engine: Rc::new(RefCell::new(WallEngine::new(config))),
            live: Rc::new(RefCell::new(None)),
            active: CancellationToken::new(),
            cards,
        };

        if site.layout == WallLayout::Floating {
            app.spawn_initialize(document, container, testimonials);
        }
        Ok(app)
    }

    fn spawn_initialize(&self, document: Document, container: HtmlElement, testimonials: Vec<Testimonial>) {
        if !self.engine.borrow_mut().begin_initialize() {
            return;
        }

        let engine = Rc::clone(&self.engine);
        let live = Rc::clone(&self.live);
        let active = self.active.clone();
        let wall_id = self.wall_id.clone();
        let cards = self.cards.clone();

        wasm_bindgen_futures::spawn_local(async move {
            if let Err(err) = next_animation_frame().await {
                log::error!("初期化を待機できませんでした: {}", err);
                engine.borrow_mut().abort_initialize();
                return;
            }
            if active.is_cancelled() {
                log::debug!("ウォール {} は初期化前にアンマウントされました", wall_id);
                return;
            }

            {
                let mut engine = engine.borrow_mut();
                if !engine.finish_initialize() {
                    return;
                }
                let viewport = measure(&container);
                engine.create_boundary(viewport);
                for testimonial in &testimonials {
                    engine.create_card_body(&testimonial.id, viewport);
                }
            }

            match start_live(&document, &container, &wall_id, &cards, &testimonials, &engine, &active) {
                Ok(started) => *live.borrow_mut() = Some(started),
                Err(err) => log::error!("ウォール {} を開始できませんでした: {}", wall_id, err),
            }
        });
    }
}

/// フレームループとリスナーを開始する
fn start_live(
    document: &Document,
    container: &HtmlElement,
    wall_id: &str,
    cards: &[HtmlElement],
    testimonials: &[Testimonial],
    engine: &Rc<RefCell<WallEngine>>,
    active: &CancellationToken,
) -> WallResult<LiveWall> {
    let mut listeners = Vec::with_capacity(cards.len() * 2 + 1);
    listeners.push(watch_resize(container, engine)?);
    for (card, testimonial) in cards.iter().zip(testimonials) {
        listeners.extend(watch_hover(card, &testimonial.id, engine)?);
    }

    let mut sink = DomTransformSink::new(document.clone(), wall_id);
    let frame_engine = Rc::clone(engine);
    let frame_loop = FrameLoop::start(active.clone(), move |_timestamp| {
        if let Ok(mut engine) = frame_engine.try_borrow_mut() {
            engine.frame(&mut sink);
        }
    })?;

    Ok(LiveWall {
        _frame_loop: frame_loop,
        _listeners: listeners,
    })
}

#[wasm_bindgen]
impl WallApp {
    /// ウォールをアンマウントする
    ///
    /// フレームループとリスナーを止め、物理ワールドを破棄し、カード要素を取り除きます。
    /// 何度呼んでも安全です。
    pub fn unmount(&mut self) {
        self.active.cancel();
        self.live.borrow_mut().take();
        self.engine.borrow_mut().dispose();
        remove_cards(&self.cards);
        self.cards.clear();
        log::info!("ウォール {} をアンマウントしました", self.wall_id);
    }

    /// 現在の状態
    pub fn state(&self) -> String {
        self.engine.borrow().state().as_str().to_string()
    }

    /// ボディを持つカードの数
    pub fn card_count(&self) -> usize {
        self.engine.borrow().card_count()
    }

    /// ウォールID（カード要素のIDの接頭辞）
    pub fn wall_id(&self) -> String {
        self.wall_id.clone()
    }

    /// 準備完了かどうか
    pub fn is_ready(&self) -> bool {
        self.engine.borrow().state() == WallState::Ready
    }
}

impl Drop for WallApp {
    fn drop(&mut self) {
        if self.active.is_active() {
            self.unmount();
        }
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const TESTIMONIALS: &str = r#"[
        {"id": "a", "authorName": "Aiko", "text": "Great"},
        {"id": "b", "authorName": "Ben", "text": "Solid"},
        {"id": "c", "authorName": "Chika", "text": "Fast"}
    ]"#;

    fn mount_container(id: &str) -> HtmlElement {
        let document = document().unwrap();
        let container = document.create_element("div").unwrap();
        container.set_id(id);
        container.set_attribute("style", "width: 1000px; height: 800px").unwrap();
        document.body().unwrap().append_child(&container).unwrap();
        html_element_by_id(&document, id).unwrap()
    }

    async fn wait_frames(count: usize) {
        for _ in 0..count {
            next_animation_frame().await.unwrap();
        }
    }

    #[wasm_bindgen_test]
    async fn test_mount_becomes_ready_and_unmounts() {
        let container = mount_container("test_app_ready");
        let mut app = mount_wall("test_app_ready", TESTIMONIALS, "{}", None).unwrap();
        assert_eq!(app.state(), "initializing");
        assert_eq!(container.child_element_count(), 3);

        wait_frames(3).await;
        assert!(app.is_ready());
        assert_eq!(app.state(), "ready");
        assert_eq!(app.card_count(), 3);

        app.unmount();
        assert_eq!(app.state(), "disposed");
        assert_eq!(app.card_count(), 0);
        assert_eq!(container.child_element_count(), 0);

        // 二度目のアンマウントも安全
        app.unmount();
        assert_eq!(app.state(), "disposed");

        wait_frames(2).await;
        assert_eq!(app.state(), "disposed");
        container.remove();
    }

    #[wasm_bindgen_test]
    async fn test_unmount_during_initialization_installs_no_world() {
        let container = mount_container("test_app_early_unmount");
        let mut app = mount_wall("test_app_early_unmount", TESTIMONIALS, "{}", None).unwrap();
        app.unmount();

        wait_frames(2).await;
        assert_eq!(app.state(), "disposed");
        assert_eq!(app.card_count(), 0);
        assert!(app.engine.borrow().world().is_none());
        assert!(app.live.borrow().is_none());
        container.remove();
    }

    #[wasm_bindgen_test]
    async fn test_static_layout_skips_physics() {
        let container = mount_container("test_app_static");
        let app = mount_wall("test_app_static", TESTIMONIALS, r#"{"layout": "static"}"#, None).unwrap();

        wait_frames(2).await;
        assert_eq!(app.state(), "uninitialized");
        assert_eq!(app.card_count(), 0);
        assert_eq!(container.child_element_count(), 3);

        drop(app);
        assert_eq!(container.child_element_count(), 0);
        container.remove();
    }

    #[wasm_bindgen_test]
    fn test_bad_input_is_rejected() {
        assert!(mount_wall("test_app_missing", TESTIMONIALS, "{}", None).is_err());
        assert!(mount_wall("test_app_missing", "not json", "{}", None).is_err());
    }
}
