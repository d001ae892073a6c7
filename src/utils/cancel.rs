//! キャンセルトークン
//!
//! 非同期初期化とフレームループが「まだマウントされているか」を確認するためのフラグです。
//! すべてのアクセスはブラウザのメインスレッド上で行われるため、`Rc<Cell<bool>>`で十分です。

use std::cell::Cell;
use std::rc::Rc;

/// 共有可能なキャンセルフラグ
///
/// クローンしたトークンはすべて同じフラグを参照します。
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancellationToken {
    /// 新しい（未キャンセルの）トークンを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// キャンセルする
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    /// キャンセル済みかどうか
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    /// まだ有効かどうか
    pub fn is_active(&self) -> bool {
        !self.is_cancelled()
    }
}
