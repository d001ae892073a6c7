//! ウォールのライフサイクル状態

use std::fmt;

/// ウォールの状態
///
/// `Uninitialized → Initializing → Ready → Disposed`の順に遷移します。
/// ステップ・カード追加・操作・リサイズは`Ready`でのみ有効です。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WallState {
    /// 未初期化（初期化に失敗した場合もここに戻る）
    #[default]
    Uninitialized,
    /// 初期化中（非同期の待機中）
    Initializing,
    /// 準備完了
    Ready,
    /// 破棄済み
    Disposed,
}

impl WallState {
    /// JavaScript側に返す名前
    pub fn as_str(&self) -> &'static str {
        match self {
            WallState::Uninitialized => "uninitialized",
            WallState::Initializing => "initializing",
            WallState::Ready => "ready",
            WallState::Disposed => "disposed",
        }
    }
}

impl fmt::Display for WallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
