//! ロギングユーティリティモジュール
//!
//! `log`ファサードのバックエンドとして`wasm-logger`を使い、ブラウザのコンソールへ出力します。
//! ログレベルは`WallConfig`から設定できます。

use std::sync::Once;

use serde::{Deserialize, Serialize};

static LOGGER_INIT: Once = Once::new();

/// ログレベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// デバッグ情報（カードごと・リサイズごとのイベント）
    Debug,
    /// 情報（ライフサイクルの遷移）
    #[default]
    Info,
    /// 警告（無視された呼び出し）
    Warn,
    /// エラー（初期化の失敗）
    Error,
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

/// ロギング初期化
///
/// ロガー本体の登録は一度だけ行い、2回目以降は最大レベルだけを更新します。
pub fn init_logging(level: LogLevel) {
    let level: log::Level = level.into();
    LOGGER_INIT.call_once(|| {
        wasm_logger::init(wasm_logger::Config::new(level));
    });
    log::set_max_level(level.to_level_filter());
    log::debug!("ログレベルを設定しました: {}", level);
}
