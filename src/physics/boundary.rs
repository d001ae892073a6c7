//! 境界（壁）の管理
//!
//! ビューポートのすぐ外側に厚い固定ボディを4枚（床・天井・左・右）配置し、
//! シミュレーション空間を常に囲みます。リサイズ時は4枚とも作り直します。

use rapier2d::prelude::RigidBodyHandle;

use super::world::PhysicsWorld;

/// 壁の位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WallSide {
    Floor,
    Ceiling,
    Left,
    Right,
}

/// 1枚の壁の形状（シミュレーション単位）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallGeometry {
    pub side: WallSide,
    pub center: (f32, f32),
    pub half_extents: (f32, f32),
}

/// 領域`(0, 0)-(width, height)`を囲む4枚の壁の形状を計算
///
/// y軸は画面と同じく下向きなので、床は`y = height`の外側に置きます。
/// 床と天井は角を塞ぐために左右の壁の厚さ分だけ長くします。
pub fn wall_geometry(area: (f32, f32), half_thickness: f32) -> [WallGeometry; 4] {
    let (width, height) = area;
    let t = half_thickness;
    let horizontal = (width / 2.0 + 2.0 * t, t);
    let vertical = (t, height / 2.0 + 2.0 * t);

    [
        WallGeometry {
            side: WallSide::Floor,
            center: (width / 2.0, height + t),
            half_extents: horizontal,
        },
        WallGeometry {
            side: WallSide::Ceiling,
            center: (width / 2.0, -t),
            half_extents: horizontal,
        },
        WallGeometry {
            side: WallSide::Left,
            center: (-t, height / 2.0),
            half_extents: vertical,
        },
        WallGeometry {
            side: WallSide::Right,
            center: (width + t, height / 2.0),
            half_extents: vertical,
        },
    ]
}

/// 境界マネージャ
#[derive(Debug, Default)]
pub struct Boundary {
    walls: Vec<(WallSide, RigidBodyHandle)>,
    area: Option<(f32, f32)>,
}

impl Boundary {
    /// 空の境界を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 既存の壁を削除し、新しい領域に合わせて4枚の壁を作り直す
    ///
    /// 同じ寸法で何度呼んでも同じ位置に壁ができます。
    pub fn rebuild(&mut self, world: &mut PhysicsWorld, area: (f32, f32), half_thickness: f32) {
        self.clear(world);

        for geometry in wall_geometry(area, half_thickness) {
            let handle = world.insert_fixed_box(geometry.center, geometry.half_extents);
            self.walls.push((geometry.side, handle));
        }
        self.area = Some(area);

        log::debug!(
            "境界を再構築しました: {:.2}x{:.2} units",
            area.0,
            area.1
        );
    }

    /// すべての壁を削除
    pub fn clear(&mut self, world: &mut PhysicsWorld) {
        for (_, handle) in self.walls.drain(..) {
            world.remove_body(handle);
        }
        self.area = None;
    }

    /// 壁のハンドルを取得
    pub fn wall(&self, side: WallSide) -> Option<RigidBodyHandle> {
        self.walls
            .iter()
            .find(|(s, _)| *s == side)
            .map(|(_, handle)| *handle)
    }

    /// すべての壁のハンドル
    pub fn handles(&self) -> impl Iterator<Item = RigidBodyHandle> + '_ {
        self.walls.iter().map(|(_, handle)| *handle)
    }

    /// 壁の数
    pub fn len(&self) -> usize {
        self.walls.len()
    }

    /// 壁がないかどうか
    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    /// 現在囲んでいる領域（シミュレーション単位）
    pub fn area(&self) -> Option<(f32, f32)> {
        self.area
    }

    /// ワールドを破棄する際に、ハンドルだけを忘れる
    pub fn forget(&mut self) {
        self.walls.clear();
        self.area = None;
    }
}
