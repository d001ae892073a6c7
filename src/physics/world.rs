//! 物理ワールドアダプタ
//!
//! `rapier2d`のパイプラインと各種セットを1つの構造体にまとめ、
//! ウォールが必要とする操作（ボディ追加・削除、ステップ、姿勢取得、撃力）だけを公開します。

use rapier2d::prelude::*;

/// 軸並行境界ボックス（シミュレーション単位）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    /// 2つのボックスを包むボックス
    pub fn merge(self, other: Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// `tolerance`より深く重なっているか
    ///
    /// 接しているだけの場合は重なりとみなしません。
    pub fn overlaps(&self, other: &Bounds, tolerance: f32) -> bool {
        self.min_x < other.max_x - tolerance
            && other.min_x < self.max_x - tolerance
            && self.min_y < other.max_y - tolerance
            && other.min_y < self.max_y - tolerance
    }

    /// 中心座標
    pub fn center(&self) -> (f32, f32) {
        ((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }
}

/// 動的な箱型ボディの生成パラメータ
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicBoxDesc {
    pub center: (f32, f32),
    pub half_extents: (f32, f32),
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub restitution: f32,
    pub friction: f32,
}

/// ボディの姿勢
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPose {
    /// 位置（シミュレーション単位）
    pub position: (f32, f32),
    /// 回転角（ラジアン）
    pub rotation: f32,
}

/// 物理ワールド
///
/// 重力はゼロ固定で、カードは落下せずに漂います。
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    step_count: u64,
}

impl PhysicsWorld {
    /// 新しい物理ワールドを作成
    pub fn new(timestep: f32) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = timestep;

        Self {
            gravity: vector![0.0, 0.0],
            integration_parameters,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            step_count: 0,
        }
    }

    /// 固定の箱型ボディを追加
    pub fn insert_fixed_box(&mut self, center: (f32, f32), half_extents: (f32, f32)) -> RigidBodyHandle {
        let body = RigidBodyBuilder::fixed()
            .translation(vector![center.0, center.1])
            .build();
        let handle = self.bodies.insert(body);

        let collider = ColliderBuilder::cuboid(half_extents.0, half_extents.1).build();
        self.colliders.insert_with_parent(collider, handle, &mut self.bodies);
        handle
    }

    /// 動的な箱型ボディを追加
    pub fn insert_dynamic_box(&mut self, desc: &DynamicBoxDesc) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![desc.center.0, desc.center.1])
            .linear_damping(desc.linear_damping)
            .angular_damping(desc.angular_damping)
            .build();
        let handle = self.bodies.insert(body);

        let collider = ColliderBuilder::cuboid(desc.half_extents.0, desc.half_extents.1)
            .restitution(desc.restitution)
            .friction(desc.friction)
            .build();
        self.colliders.insert_with_parent(collider, handle, &mut self.bodies);
        handle
    }

    /// ボディとその衝突形状を削除
    pub fn remove_body(&mut self, handle: RigidBodyHandle) -> bool {
        self.bodies
            .remove(
                handle,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }

    /// シミュレーションを固定タイムステップ1回分進める
    pub fn step(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &(),
            &(),
        );
        self.step_count += 1;
    }

    /// ボディの姿勢を取得
    pub fn pose(&self, handle: RigidBodyHandle) -> Option<BodyPose> {
        let body = self.bodies.get(handle)?;
        let translation = body.translation();
        Some(BodyPose {
            position: (translation.x, translation.y),
            rotation: body.rotation().angle(),
        })
    }

    /// ボディの減衰係数を取得 (線形, 角)
    pub fn damping(&self, handle: RigidBodyHandle) -> Option<(f32, f32)> {
        let body = self.bodies.get(handle)?;
        Some((body.linear_damping(), body.angular_damping()))
    }

    /// ボディの減衰係数を設定
    pub fn set_damping(&mut self, handle: RigidBodyHandle, linear: f32, angular: f32) -> bool {
        match self.bodies.get_mut(handle) {
            Some(body) => {
                body.set_linear_damping(linear);
                body.set_angular_damping(angular);
                true
            }
            None => false,
        }
    }

    /// 質量に比例した撃力を加え、速度を`delta_velocity`だけ変える
    ///
    /// カードの大きさに関係なく、同じ値で同じ速さの変化になります。
    pub fn apply_velocity_change(&mut self, handle: RigidBodyHandle, delta_velocity: (f32, f32)) -> bool {
        match self.bodies.get_mut(handle) {
            Some(body) => {
                let linvel = *body.linvel() + vector![delta_velocity.0, delta_velocity.1];
                body.set_linvel(linvel, true);
                true
            }
            None => false,
        }
    }

    /// ボディの線速度
    pub fn linear_velocity(&self, handle: RigidBodyHandle) -> Option<(f32, f32)> {
        let linvel = self.bodies.get(handle)?.linvel();
        Some((linvel.x, linvel.y))
    }

    /// ボディに付いた衝突形状の境界ボックス
    pub fn body_bounds(&self, handle: RigidBodyHandle) -> Option<Bounds> {
        let body = self.bodies.get(handle)?;
        body.colliders()
            .iter()
            .filter_map(|collider| self.colliders.get(*collider))
            .map(|collider| {
                let aabb = collider.compute_aabb();
                Bounds {
                    min_x: aabb.mins.x,
                    min_y: aabb.mins.y,
                    max_x: aabb.maxs.x,
                    max_y: aabb.maxs.y,
                }
            })
            .reduce(Bounds::merge)
    }

    /// ボディが固定かどうか
    pub fn is_fixed(&self, handle: RigidBodyHandle) -> Option<bool> {
        self.bodies.get(handle).map(|body| body.is_fixed())
    }

    /// ボディの数
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// 衝突形状の数
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// これまでに実行したステップ数
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// タイムステップ（秒）
    pub fn timestep(&self) -> f32 {
        self.integration_parameters.dt
    }
}
