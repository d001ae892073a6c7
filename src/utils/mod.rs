//! ユーティリティモジュール
//!
//! このモジュールには、ウォール全体で使用される単位変換・乱数・ログ・キャンセル処理が含まれています。

pub mod cancel;
pub mod logger;
pub mod math;

// サブモジュールの再エクスポート
pub use cancel::*;
pub use logger::*;
pub use math::*;
