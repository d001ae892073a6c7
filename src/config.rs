//! 設定モジュール
//!
//! ウォールの物理パラメータ（`WallConfig`）と、テナントごとの見た目の設定（`SiteConfig`）を定義します。
//! どちらもホストページからJSONで渡され、省略されたフィールドはデフォルト値になります。

use serde::{Deserialize, Serialize};

use crate::error::{WallError, WallResult};
use crate::utils::{px_to_units, LogLevel};

/// 1シミュレーション単位あたりのピクセル数
pub const DEFAULT_PIXELS_PER_UNIT: f32 = 50.0;
/// カードの画面上の幅（ピクセル）
pub const DEFAULT_CARD_WIDTH: f32 = 220.0;
/// カードの画面上の高さ（ピクセル）
pub const DEFAULT_CARD_HEIGHT: f32 = 160.0;
/// 通常時の線形減衰
pub const DEFAULT_LINEAR_DAMPING: f32 = 0.8;
/// 通常時の角減衰
pub const DEFAULT_ANGULAR_DAMPING: f32 = 0.5;
/// ホバー中の減衰（線形・角とも）
pub const DEFAULT_HOVER_DAMPING: f32 = 10.0;
/// 固定タイムステップ（秒）
pub const DEFAULT_TIMESTEP: f32 = 1.0 / 60.0;

/// ウォールの物理設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WallConfig {
    /// 1シミュレーション単位あたりのピクセル数
    pub pixels_per_unit: f32,
    /// カードの幅（ピクセル）
    pub card_width: f32,
    /// カードの高さ（ピクセル）
    pub card_height: f32,
    /// 通常時の線形減衰
    pub linear_damping: f32,
    /// 通常時の角減衰
    pub angular_damping: f32,
    /// ホバー中の減衰
    pub hover_damping: f32,
    /// 反発係数
    pub restitution: f32,
    /// 摩擦係数
    pub friction: f32,
    /// ホバー解除時の撃力の最小値（軸ごと、単位質量あたり）
    pub impulse_min: f32,
    /// ホバー解除時の撃力の最大値（軸ごと、単位質量あたり）
    pub impulse_max: f32,
    /// 壁の厚さ（ピクセル）
    pub wall_thickness: f32,
    /// 固定タイムステップ（秒）
    pub timestep: f32,
    /// ログレベル
    pub log_level: LogLevel,
}

impl Default for WallConfig {
    fn default() -> Self {
        Self {
            pixels_per_unit: DEFAULT_PIXELS_PER_UNIT,
            card_width: DEFAULT_CARD_WIDTH,
            card_height: DEFAULT_CARD_HEIGHT,
            linear_damping: DEFAULT_LINEAR_DAMPING,
            angular_damping: DEFAULT_ANGULAR_DAMPING,
            hover_damping: DEFAULT_HOVER_DAMPING,
            restitution: 0.9,
            friction: 0.1,
            impulse_min: 1.0,
            impulse_max: 3.0,
            wall_thickness: 100.0,
            timestep: DEFAULT_TIMESTEP,
            log_level: LogLevel::Info,
        }
    }
}

impl WallConfig {
    /// JSON文字列から設定を読み込む
    ///
    /// 空文字列はデフォルト設定として扱います。
    pub fn from_json(json: &str) -> WallResult<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(json)?)
    }

    /// 設定値を検証
    pub fn validate(&self) -> WallResult<()> {
        fn positive(name: &str, value: f32) -> WallResult<()> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(WallError::InvalidConfig(format!("{} must be positive, got {}", name, value)))
            }
        }
        fn non_negative(name: &str, value: f32) -> WallResult<()> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(WallError::InvalidConfig(format!("{} must be non-negative, got {}", name, value)))
            }
        }

        positive("pixelsPerUnit", self.pixels_per_unit)?;
        positive("cardWidth", self.card_width)?;
        positive("cardHeight", self.card_height)?;
        positive("wallThickness", self.wall_thickness)?;
        positive("timestep", self.timestep)?;
        non_negative("linearDamping", self.linear_damping)?;
        non_negative("angularDamping", self.angular_damping)?;
        non_negative("hoverDamping", self.hover_damping)?;
        non_negative("friction", self.friction)?;
        non_negative("impulseMin", self.impulse_min)?;
        non_negative("impulseMax", self.impulse_max)?;

        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(WallError::InvalidConfig(format!(
                "restitution must be within [0, 1], got {}",
                self.restitution
            )));
        }
        if self.impulse_min > self.impulse_max {
            return Err(WallError::InvalidConfig(format!(
                "impulse range is inverted: {} > {}",
                self.impulse_min, self.impulse_max
            )));
        }
        Ok(())
    }

    /// カードの半幅（シミュレーション単位）
    pub fn card_half_extents(&self) -> (f32, f32) {
        (
            px_to_units(self.card_width, self.pixels_per_unit) / 2.0,
            px_to_units(self.card_height, self.pixels_per_unit) / 2.0,
        )
    }

    /// 壁の厚さの半分（シミュレーション単位）
    pub fn wall_half_thickness(&self) -> f32 {
        px_to_units(self.wall_thickness, self.pixels_per_unit) / 2.0
    }
}

/// ウォールのレイアウト
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WallLayout {
    /// 物理シミュレーションでカードを浮遊させる
    #[default]
    Floating,
    /// 物理なしのCSSグリッド
    Static,
}

/// テナントごとのサイト設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteConfig {
    pub primary_color: String,
    pub background_color: String,
    pub text_color: String,
    pub layout: WallLayout,
    pub show_avatars: bool,
    pub show_titles: bool,
    pub show_ratings: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            primary_color: "#6366f1".to_string(),
            background_color: "#f8fafc".to_string(),
            text_color: "#0f172a".to_string(),
            layout: WallLayout::Floating,
            show_avatars: true,
            show_titles: true,
            show_ratings: false,
        }
    }
}

impl SiteConfig {
    /// JSON文字列からサイト設定を読み込む
    pub fn from_json(json: &str) -> WallResult<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(json)?)
    }
}
