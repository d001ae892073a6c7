//! エラー型モジュール
//!
//! ウォール全体で共有されるエラー型を定義します。
//! 実行中のウォール内部のエラーはログに出力して握りつぶし、
//! 入力の解析エラーだけが`mount_wall`の呼び出し元に返されます。

use thiserror::Error;
use wasm_bindgen::JsValue;

/// ウォールのエラー
#[derive(Debug, Error)]
pub enum WallError {
    /// 設定値が不正
    #[error("設定エラー: {0}")]
    InvalidConfig(String),

    /// ビューポートの寸法が不正（NaN・無限大・負の値）
    #[error("不正なビューポート: {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },

    /// JSONの解析に失敗
    #[error("JSON解析エラー: {0}")]
    Parse(#[from] serde_json::Error),

    /// DOM操作に失敗
    #[error("DOMエラー: {0}")]
    Dom(String),
}

impl WallError {
    /// JavaScript側の例外値をDOMエラーに変換
    pub fn from_js(value: JsValue) -> Self {
        WallError::Dom(
            value
                .as_string()
                .unwrap_or_else(|| format!("{:?}", value)),
        )
    }
}

impl From<WallError> for JsValue {
    fn from(err: WallError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

pub type WallResult<T> = Result<T, WallError>;
