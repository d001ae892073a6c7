//! フレームループ
//!
//! `requestAnimationFrame`を使ったループです。コールバックは1つのクロージャを使い回し、
//! キャンセルトークンが有効な間だけ毎フレーム再登録します。

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::channel::oneshot;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

use crate::error::{WallError, WallResult};
use crate::utils::CancellationToken;

fn window() -> WallResult<Window> {
    web_sys::window().ok_or_else(|| WallError::Dom("window not available".to_string()))
}

struct FrameLoopInner {
    token: CancellationToken,
    pending: Cell<Option<i32>>,
    callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
    frames: Cell<u64>,
}

impl FrameLoopInner {
    fn schedule(&self) -> WallResult<()> {
        if self.token.is_cancelled() {
            return Ok(());
        }
        let callback = self.callback.borrow();
        let Some(callback) = callback.as_ref() else {
            return Ok(());
        };
        let handle = window()?
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map_err(WallError::from_js)?;
        self.pending.set(Some(handle));
        Ok(())
    }
}

/// フレームループ
///
/// ドロップ時にキャンセルされます。
pub struct FrameLoop {
    inner: Rc<FrameLoopInner>,
}

impl FrameLoop {
    /// ループを開始する
    ///
    /// `on_frame`にはタイムスタンプ（ミリ秒）が渡されます。
    pub fn start<F>(token: CancellationToken, mut on_frame: F) -> WallResult<Self>
    where
        F: FnMut(f64) + 'static,
    {
        let inner = Rc::new(FrameLoopInner {
            token,
            pending: Cell::new(None),
            callback: RefCell::new(None),
            frames: Cell::new(0),
        });

        // クロージャからは弱参照で持ち、循環参照を作らない
        let weak = Rc::downgrade(&inner);
        let callback = Closure::wrap(Box::new(move |timestamp: f64| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            inner.pending.set(None);
            if inner.token.is_cancelled() {
                return;
            }
            on_frame(timestamp);
            inner.frames.set(inner.frames.get() + 1);
            if let Err(err) = inner.schedule() {
                log::error!("次のフレームを要求できませんでした: {}", err);
            }
        }) as Box<dyn FnMut(f64)>);

        *inner.callback.borrow_mut() = Some(callback);
        inner.schedule()?;
        log::debug!("フレームループを開始しました");
        Ok(Self { inner })
    }

    /// ループを止める
    ///
    /// 保留中のフレームを取り消し、コールバックを解放します。何度呼んでも安全です。
    pub fn cancel(&self) {
        self.inner.token.cancel();
        if let Some(handle) = self.inner.pending.take() {
            if let Ok(window) = window() {
                if let Err(err) = window.cancel_animation_frame(handle) {
                    log::warn!("cancelAnimationFrameに失敗しました: {:?}", err);
                }
            }
        }
        self.inner.callback.borrow_mut().take();
    }

    /// 実行済みのフレーム数
    pub fn frame_count(&self) -> u64 {
        self.inner.frames.get()
    }

    /// 動作中かどうか
    pub fn is_running(&self) -> bool {
        self.inner.token.is_active() && self.inner.callback.borrow().is_some()
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// 次のアニメーションフレームまで待つ
///
/// コンテナのレイアウトが確定してから寸法を測るために使います。
pub async fn next_animation_frame() -> WallResult<f64> {
    let (sender, receiver) = oneshot::channel::<f64>();
    let callback = Closure::once(move |timestamp: f64| {
        let _ = sender.send(timestamp);
    });
    window()?
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .map_err(WallError::from_js)?;

    let timestamp = receiver
        .await
        .map_err(|_| WallError::Dom("animation frame was dropped".to_string()))?;
    // 発火するまでクロージャを生かしておく
    drop(callback);
    Ok(timestamp)
}
