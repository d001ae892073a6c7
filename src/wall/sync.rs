//! レイアウト同期
//!
//! 毎フレーム`step()`の直後に呼ばれ、各ボディの位置と回転をカード要素の
//! CSSトランスフォームとして書き出します。

use crate::config::WallConfig;
use crate::physics::{BodyPose, BodyRegistry, PhysicsWorld};
use crate::utils::units_to_px;

/// カード要素に適用する2Dトランスフォーム（ピクセル単位）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardTransform {
    /// 要素左上のX座標
    pub translate_x: f32,
    /// 要素左上のY座標
    pub translate_y: f32,
    /// 回転角（ラジアン）
    pub rotation: f32,
}

impl CardTransform {
    /// ボディの姿勢から要素のトランスフォームを計算
    ///
    /// ボディの位置はカードの中心なので、半分のサイズだけずらして左上に合わせます。
    pub fn from_pose(pose: &BodyPose, config: &WallConfig) -> Self {
        Self {
            translate_x: units_to_px(pose.position.0, config.pixels_per_unit) - config.card_width / 2.0,
            translate_y: units_to_px(pose.position.1, config.pixels_per_unit) - config.card_height / 2.0,
            rotation: pose.rotation,
        }
    }

    /// CSSの`transform`プロパティ値
    pub fn to_css(&self) -> String {
        format!(
            "translate({:.2}px, {:.2}px) rotate({:.4}rad)",
            self.translate_x, self.translate_y, self.rotation
        )
    }
}

/// トランスフォームの書き込み先
///
/// ブラウザではDOM要素、テストでは記録用の構造体になります。
pub trait TransformSink {
    /// カードにトランスフォームを適用する
    ///
    /// 要素が見つからなければ`false`を返します（エラーではありません）。
    fn apply(&mut self, card_id: &str, transform: &CardTransform) -> bool;
}

/// 同期結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncReport {
    pub applied: usize,
    pub skipped: usize,
}

/// 登録済みの全ボディの姿勢を書き出す
pub fn synchronize<S: TransformSink + ?Sized>(
    world: &PhysicsWorld,
    registry: &BodyRegistry,
    config: &WallConfig,
    sink: &mut S,
) -> SyncReport {
    let mut report = SyncReport::default();

    for (card_id, handle) in registry.iter() {
        let Some(pose) = world.pose(handle) else {
            report.skipped += 1;
            continue;
        };
        let transform = CardTransform::from_pose(&pose, config);
        if sink.apply(card_id, &transform) {
            report.applied += 1;
        } else {
            report.skipped += 1;
        }
    }

    report
}
