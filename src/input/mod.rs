//! 入力処理モジュール
//!
//! カードへのポインターのホバー／解除と、ウィンドウのリサイズを購読します。
//! 購読はすべて`ListenerGuard`として保持し、ドロップすると解除されます。

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, HtmlElement};

use crate::error::{WallError, WallResult};
use crate::rendering::measure;
use crate::wall::WallEngine;

/// イベントリスナーの登録を表すガード
pub struct ListenerGuard {
    target: EventTarget,
    event_type: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl ListenerGuard {
    /// リスナーを登録する
    pub fn listen<F>(target: &EventTarget, event_type: &'static str, handler: F) -> WallResult<Self>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target
            .add_event_listener_with_callback(event_type, callback.as_ref().unchecked_ref())
            .map_err(WallError::from_js)?;
        Ok(Self {
            target: target.clone(),
            event_type,
            callback,
        })
    }

    /// イベントの種類
    pub fn event_type(&self) -> &'static str {
        self.event_type
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Err(err) = self
            .target
            .remove_event_listener_with_callback(self.event_type, self.callback.as_ref().unchecked_ref())
        {
            log::warn!("{} リスナーの解除に失敗しました: {:?}", self.event_type, err);
        }
    }
}

/// カードのホバーイベントを購読する
///
/// エンジンが別の処理で借用中のときは、そのイベントを読み捨てます。
pub fn watch_hover(
    card: &HtmlElement,
    card_id: &str,
    engine: &Rc<RefCell<WallEngine>>,
) -> WallResult<[ListenerGuard; 2]> {
    let enter = {
        let engine = Rc::clone(engine);
        let card_id = card_id.to_string();
        ListenerGuard::listen(card.as_ref(), "mouseenter", move |_event| {
            match engine.try_borrow_mut() {
                Ok(mut engine) => {
                    engine.on_hover_enter(&card_id);
                }
                Err(_) => log::debug!("エンジン使用中のため mouseenter を無視しました"),
            }
        })?
    };

    let leave = {
        let engine = Rc::clone(engine);
        let card_id = card_id.to_string();
        ListenerGuard::listen(card.as_ref(), "mouseleave", move |_event| {
            match engine.try_borrow_mut() {
                Ok(mut engine) => {
                    engine.on_hover_leave(&card_id);
                }
                Err(_) => log::debug!("エンジン使用中のため mouseleave を無視しました"),
            }
        })?
    };

    Ok([enter, leave])
}

/// ウィンドウのリサイズを購読し、コンテナを測り直して境界を作り直す
pub fn watch_resize(container: &HtmlElement, engine: &Rc<RefCell<WallEngine>>) -> WallResult<ListenerGuard> {
    let window = web_sys::window().ok_or_else(|| WallError::Dom("window not available".to_string()))?;
    let engine = Rc::clone(engine);
    let container = container.clone();

    ListenerGuard::listen(window.as_ref(), "resize", move |_event| {
        let viewport = measure(&container);
        match engine.try_borrow_mut() {
            Ok(mut engine) => {
                engine.resize(viewport);
            }
            Err(_) => log::debug!("エンジン使用中のため resize を無視しました"),
        }
    })
}
