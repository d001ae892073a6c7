use wasm_bindgen::prelude::*;

// モジュール宣言
pub mod app;
pub mod config;
pub mod error;
pub mod input;
pub mod physics;
pub mod rendering;
pub mod testimonial;
pub mod utils;
pub mod wall;

pub use app::{mount_wall, WallApp};
pub use config::{SiteConfig, WallConfig, WallLayout};
pub use error::{WallError, WallResult};
pub use testimonial::Testimonial;
pub use wall::{WallEngine, WallState};

// 初期化用のエントリーポイント
#[wasm_bindgen(start)]
pub fn start() {
    // エラーをコンソールにパニックフックとして表示
    console_error_panic_hook::set_once();

    // ロガーの初期化
    utils::init_logging(utils::LogLevel::default());
    log::info!("testimonial wall module initialized");
}

// ログレベル変更用のエクスポート関数
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let level: utils::LogLevel = serde_json::from_value(serde_json::Value::String(level.to_string()))
        .map_err(WallError::from)?;
    utils::init_logging(level);
    Ok(())
}
