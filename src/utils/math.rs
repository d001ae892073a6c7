//! 数学ユーティリティモジュール
//!
//! ピクセルとシミュレーション単位の変換、ビューポート、乱数の補助関数が含まれています。

use rand::Rng;

use crate::error::{WallError, WallResult};

/// 画面上のビューポート（ピクセル単位）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// 幅（ピクセル）
    pub width: f32,
    /// 高さ（ピクセル）
    pub height: f32,
}

impl Viewport {
    /// 新しいビューポートを作成
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// 寸法を検証
    ///
    /// 幅・高さが有限かつ0以上であることを確認します。
    /// 0は許可します（最小化されたウィンドウなど）。
    pub fn validate(&self) -> WallResult<Self> {
        let valid = |v: f32| v.is_finite() && v >= 0.0;
        if valid(self.width) && valid(self.height) {
            Ok(*self)
        } else {
            Err(WallError::InvalidViewport {
                width: self.width,
                height: self.height,
            })
        }
    }

    /// 潰れた軸（0以下・非有限）だけを`fallback`の値で置き換える
    ///
    /// 絶対配置のカードしか持たないコンテナは高さ0に測られるため、
    /// その軸はウィンドウの寸法で補います。
    pub fn or_fallback(self, fallback: Viewport) -> Viewport {
        let usable = |v: f32| v.is_finite() && v > 0.0;
        Viewport {
            width: if usable(self.width) { self.width } else { fallback.width },
            height: if usable(self.height) { self.height } else { fallback.height },
        }
    }

    /// シミュレーション単位での寸法を取得
    pub fn to_units(&self, pixels_per_unit: f32) -> (f32, f32) {
        (
            px_to_units(self.width, pixels_per_unit),
            px_to_units(self.height, pixels_per_unit),
        )
    }
}

/// ピクセルをシミュレーション単位に変換
pub fn px_to_units(px: f32, pixels_per_unit: f32) -> f32 {
    px / pixels_per_unit
}

/// シミュレーション単位をピクセルに変換
pub fn units_to_px(units: f32, pixels_per_unit: f32) -> f32 {
    units * pixels_per_unit
}

/// `[min, max]`の一様乱数
///
/// 範囲が潰れている（`min >= max`）場合は中点を返します。
pub fn random_in_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if min < max {
        rng.gen_range(min..=max)
    } else {
        (min + max) / 2.0
    }
}

/// 大きさが`[min, max]`の一様乱数で、符号がランダムな値
pub fn random_signed_magnitude<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    let magnitude = random_in_range(rng, min, max);
    if rng.gen_bool(0.5) {
        magnitude
    } else {
        -magnitude
    }
}

/// 領域`(0, 0)-(width, height)`の内側から、半幅`half_extents`の箱が収まる中心点をランダムに選ぶ
///
/// 箱が領域より大きい軸では中央に置きます。
pub fn random_interior_point<R: Rng + ?Sized>(
    rng: &mut R,
    area: (f32, f32),
    half_extents: (f32, f32),
) -> (f32, f32) {
    (
        random_in_range(rng, half_extents.0, area.0 - half_extents.0),
        random_in_range(rng, half_extents.1, area.1 - half_extents.1),
    )
}
