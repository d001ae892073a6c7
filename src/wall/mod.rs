//! ウォールモジュール
//!
//! 物理ワールド・ボディレジストリ・境界をまとめて所有し、
//! ライフサイクル（`WallState`）に従って各操作を受け付ける`WallEngine`を提供します。
//! ブラウザには依存しないので、ネイティブのテストでそのまま動かせます。

pub mod interaction;
pub mod state;
pub mod sync;

pub use state::WallState;
pub use sync::{CardTransform, SyncReport, TransformSink};

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::config::WallConfig;
use crate::error::WallResult;
use crate::physics::{BodyRegistry, Boundary, DynamicBoxDesc, PhysicsWorld, RigidBodyHandle};
use crate::utils::{random_interior_point, Viewport};

/// ウォールエンジン
pub struct WallEngine {
    config: WallConfig,
    state: WallState,
    /// `Ready`の間だけ存在する
    world: Option<PhysicsWorld>,
    registry: BodyRegistry,
    boundary: Boundary,
    viewport: Option<Viewport>,
    rng: SmallRng,
}

impl WallEngine {
    /// 新しいエンジンを作成（乱数はエントロピーから初期化）
    pub fn new(config: WallConfig) -> Self {
        Self::with_rng(config, SmallRng::from_entropy())
    }

    /// シード付きでエンジンを作成
    pub fn with_seed(config: WallConfig, seed: u64) -> Self {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(config: WallConfig, rng: SmallRng) -> Self {
        Self {
            config,
            state: WallState::Uninitialized,
            world: None,
            registry: BodyRegistry::new(),
            boundary: Boundary::new(),
            viewport: None,
            rng,
        }
    }

    /// 現在の状態
    pub fn state(&self) -> WallState {
        self.state
    }

    /// 準備完了かどうか
    pub fn is_ready(&self) -> bool {
        self.state == WallState::Ready && self.world.is_some()
    }

    /// 設定
    pub fn config(&self) -> &WallConfig {
        &self.config
    }

    /// 初期化を開始する（`Uninitialized → Initializing`）
    ///
    /// 既に初期化中・準備完了・破棄済みの場合は`false`を返し、何もしません。
    pub fn begin_initialize(&mut self) -> bool {
        if self.state != WallState::Uninitialized {
            log::warn!("初期化の重複呼び出しを無視しました (state = {})", self.state);
            return false;
        }
        self.state = WallState::Initializing;
        true
    }

    /// 初期化を中断して`Uninitialized`に戻す
    pub fn abort_initialize(&mut self) {
        if self.state == WallState::Initializing {
            self.state = WallState::Uninitialized;
        }
    }

    /// 初期化を完了する（`Initializing → Ready`）
    ///
    /// 失敗した場合はログに出力し、`Uninitialized`に戻ります。再試行はしません。
    pub fn finish_initialize(&mut self) -> bool {
        if self.state != WallState::Initializing {
            log::warn!("初期化中ではないため完了できません (state = {})", self.state);
            return false;
        }

        match self.build_world() {
            Ok(world) => {
                self.world = Some(world);
                self.state = WallState::Ready;
                log::info!("物理ワールドを初期化しました");
                true
            }
            Err(err) => {
                log::error!("物理ワールドの初期化に失敗しました: {}", err);
                self.state = WallState::Uninitialized;
                false
            }
        }
    }

    /// 同期的に初期化する
    pub fn initialize(&mut self) -> bool {
        self.begin_initialize() && self.finish_initialize()
    }

    fn build_world(&self) -> WallResult<PhysicsWorld> {
        self.config.validate()?;
        Ok(PhysicsWorld::new(self.config.timestep))
    }

    /// ビューポートに合わせて境界を作り直す
    ///
    /// 何度呼んでも安全です。カードのボディは動かしません。
    pub fn create_boundary(&mut self, viewport: Viewport) -> bool {
        if self.state != WallState::Ready {
            return false;
        }
        let viewport = match viewport.validate() {
            Ok(viewport) => viewport,
            Err(err) => {
                log::warn!("境界の作成をスキップしました: {}", err);
                return false;
            }
        };
        let Some(world) = self.world.as_mut() else {
            return false;
        };

        let area = viewport.to_units(self.config.pixels_per_unit);
        self.boundary.rebuild(world, area, self.config.wall_half_thickness());
        self.viewport = Some(viewport);
        true
    }

    /// リサイズ
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        if self.viewport == Some(viewport) && !self.boundary.is_empty() {
            return true;
        }
        log::debug!("リサイズ: {}x{}", viewport.width, viewport.height);
        self.create_boundary(viewport)
    }

    /// カードのボディを作成する
    ///
    /// 同じカードIDのボディが既にあれば何もしません。
    pub fn create_card_body(&mut self, card_id: &str, viewport: Viewport) -> Option<RigidBodyHandle> {
        if self.state != WallState::Ready || self.registry.contains(card_id) {
            return None;
        }
        let viewport = viewport.validate().ok()?;
        let world = self.world.as_mut()?;

        let half_extents = self.config.card_half_extents();
        let area = viewport.to_units(self.config.pixels_per_unit);
        let center = random_interior_point(&mut self.rng, area, half_extents);

        let handle = world.insert_dynamic_box(&DynamicBoxDesc {
            center,
            half_extents,
            linear_damping: self.config.linear_damping,
            angular_damping: self.config.angular_damping,
            restitution: self.config.restitution,
            friction: self.config.friction,
        });
        self.registry.insert(card_id, handle);
        log::debug!("カード {} のボディを ({:.2}, {:.2}) に作成しました", card_id, center.0, center.1);
        Some(handle)
    }

    /// シミュレーションを1ステップ進める
    pub fn step(&mut self) {
        if self.state != WallState::Ready {
            return;
        }
        if let Some(world) = self.world.as_mut() {
            world.step();
        }
    }

    /// 直近のステップの結果をシンクに書き出す
    pub fn synchronize<S: TransformSink + ?Sized>(&self, sink: &mut S) -> SyncReport {
        match (&self.world, self.state) {
            (Some(world), WallState::Ready) => sync::synchronize(world, &self.registry, &self.config, sink),
            _ => SyncReport::default(),
        }
    }

    /// 1フレーム分の処理（ステップ→同期）
    pub fn frame<S: TransformSink + ?Sized>(&mut self, sink: &mut S) -> SyncReport {
        self.step();
        self.synchronize(sink)
    }

    /// ホバー開始
    pub fn on_hover_enter(&mut self, card_id: &str) -> bool {
        if self.state != WallState::Ready {
            return false;
        }
        match self.world.as_mut() {
            Some(world) => interaction::on_hover_enter(world, &self.registry, &self.config, card_id),
            None => false,
        }
    }

    /// ホバー終了
    pub fn on_hover_leave(&mut self, card_id: &str) -> bool {
        if self.state != WallState::Ready {
            return false;
        }
        match self.world.as_mut() {
            Some(world) => {
                interaction::on_hover_leave(world, &self.registry, &self.config, &mut self.rng, card_id)
                    .is_some()
            }
            None => false,
        }
    }

    /// すべての物理リソースを解放する
    pub fn dispose(&mut self) {
        if self.state == WallState::Disposed {
            return;
        }
        // ワールドごと破棄するので、個々のボディは削除しない
        self.world = None;
        self.boundary.forget();
        self.registry.clear();
        self.viewport = None;
        self.state = WallState::Disposed;
        log::info!("物理ワールドを破棄しました");
    }

    /// カードの位置（シミュレーション単位）
    pub fn card_position(&self, card_id: &str) -> Option<(f32, f32)> {
        let handle = self.registry.get(card_id)?;
        self.world.as_ref()?.pose(handle).map(|pose| pose.position)
    }

    /// カードの減衰係数 (線形, 角)
    pub fn card_damping(&self, card_id: &str) -> Option<(f32, f32)> {
        let handle = self.registry.get(card_id)?;
        self.world.as_ref()?.damping(handle)
    }

    /// ボディを持つカードの数
    pub fn card_count(&self) -> usize {
        self.registry.len()
    }

    /// 境界の壁の数
    pub fn boundary_count(&self) -> usize {
        self.boundary.len()
    }

    /// ワールド内のボディの総数
    pub fn body_count(&self) -> usize {
        self.world.as_ref().map_or(0, |world| world.body_count())
    }

    /// 現在のビューポート
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn world(&self) -> Option<&PhysicsWorld> {
        self.world.as_ref()
    }

    pub fn registry(&self) -> &BodyRegistry {
        &self.registry
    }

    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MapSink(HashMap<String, CardTransform>);

    impl TransformSink for MapSink {
        fn apply(&mut self, card_id: &str, transform: &CardTransform) -> bool {
            self.0.insert(card_id.to_string(), *transform);
            true
        }
    }

    fn ready_engine(seed: u64) -> WallEngine {
        let mut engine = WallEngine::with_seed(WallConfig::default(), seed);
        assert!(engine.initialize());
        engine
    }

    #[test]
    fn test_state_machine() {
        let mut engine = WallEngine::with_seed(WallConfig::default(), 1);
        assert_eq!(engine.state(), WallState::Uninitialized);

        assert!(engine.begin_initialize());
        assert_eq!(engine.state(), WallState::Initializing);
        assert!(!engine.begin_initialize());

        assert!(engine.finish_initialize());
        assert_eq!(engine.state(), WallState::Ready);
        assert!(!engine.initialize());
        assert!(engine.is_ready());

        engine.dispose();
        assert_eq!(engine.state(), WallState::Disposed);
        assert!(!engine.initialize());
        assert_eq!(engine.state(), WallState::Disposed);
    }

    #[test]
    fn test_initialize_failure_stays_uninitialized() {
        let config = WallConfig { timestep: -1.0, ..Default::default() };
        let mut engine = WallEngine::with_seed(config, 1);
        assert!(!engine.initialize());
        assert_eq!(engine.state(), WallState::Uninitialized);
        assert!(engine.world().is_none());
    }

    #[test]
    fn test_abort_initialize() {
        let mut engine = WallEngine::with_seed(WallConfig::default(), 1);
        assert!(engine.begin_initialize());
        engine.abort_initialize();
        assert_eq!(engine.state(), WallState::Uninitialized);
    }

    #[test]
    fn test_calls_before_ready_are_noops() {
        let mut engine = WallEngine::with_seed(WallConfig::default(), 1);
        let viewport = Viewport::new(1000.0, 800.0);
        assert!(!engine.create_boundary(viewport));
        assert!(engine.create_card_body("a", viewport).is_none());
        assert!(!engine.on_hover_enter("a"));
        assert!(!engine.on_hover_leave("a"));
        assert!(!engine.resize(viewport));
        engine.step();

        let mut sink = MapSink::default();
        assert_eq!(engine.frame(&mut sink), SyncReport::default());
        assert_eq!(engine.card_count(), 0);
    }

    #[test]
    fn test_at_most_one_body_per_card() {
        let mut engine = ready_engine(2);
        let viewport = Viewport::new(1000.0, 800.0);
        engine.create_boundary(viewport);

        let first = engine.create_card_body("a", viewport);
        assert!(first.is_some());
        for _ in 0..5 {
            assert!(engine.create_card_body("a", viewport).is_none());
        }
        assert_eq!(engine.card_count(), 1);
        assert_eq!(engine.body_count(), 4 + 1);
        assert_eq!(engine.registry().get("a"), first);
    }

    #[test]
    fn test_boundary_counts_and_resize() {
        let mut engine = ready_engine(3);
        assert!(engine.create_boundary(Viewport::new(1000.0, 800.0)));
        assert_eq!(engine.boundary_count(), 4);

        assert!(engine.resize(Viewport::new(600.0, 400.0)));
        assert_eq!(engine.boundary_count(), 4);
        assert_eq!(engine.body_count(), 4);
        assert_eq!(engine.boundary().area(), Some((12.0, 8.0)));

        assert!(!engine.resize(Viewport::new(f32::NAN, 400.0)));
        assert_eq!(engine.boundary().area(), Some((12.0, 8.0)));
    }

    #[test]
    fn test_hover_roundtrip_through_engine() {
        let mut engine = ready_engine(4);
        let viewport = Viewport::new(1000.0, 800.0);
        engine.create_boundary(viewport);
        engine.create_card_body("a", viewport);

        assert!(engine.on_hover_enter("a"));
        assert_eq!(engine.card_damping("a"), Some((10.0, 10.0)));
        assert!(engine.on_hover_leave("a"));
        assert_eq!(engine.card_damping("a"), Some((0.8, 0.5)));
        assert!(!engine.on_hover_enter("missing"));
    }

    #[test]
    fn test_dispose_clears_world() {
        let mut engine = ready_engine(5);
        let viewport = Viewport::new(1000.0, 800.0);
        engine.create_boundary(viewport);
        engine.create_card_body("a", viewport);
        engine.on_hover_leave("a");
        assert!(engine.card_position("a").is_some());

        engine.dispose();
        engine.step();
        engine.step();
        assert!(engine.card_position("a").is_none());
        assert!(engine.world().is_none());
        assert_eq!(engine.body_count(), 0);
        assert_eq!(engine.boundary_count(), 0);

        let mut sink = MapSink::default();
        assert_eq!(engine.frame(&mut sink), SyncReport::default());
        assert!(sink.0.is_empty());

        // 二重破棄は無害
        engine.dispose();
        assert_eq!(engine.state(), WallState::Disposed);
    }

    #[test]
    fn test_cards_stay_contained() {
        let mut engine = ready_engine(42);
        let viewport = Viewport::new(1000.0, 800.0);
        engine.create_boundary(viewport);
        for id in ["one", "two", "three"] {
            engine.create_card_body(id, viewport);
        }

        let mut sink = MapSink::default();
        for _ in 0..60 {
            engine.frame(&mut sink);
        }

        assert_eq!(sink.0.len(), 3);
        for id in ["one", "two", "three"] {
            let (x, y) = engine.card_position(id).unwrap();
            assert!((-2.0..=1000.0 / 50.0 + 2.0).contains(&x), "{} x = {}", id, x);
            assert!((-2.0..=800.0 / 50.0 + 2.0).contains(&y), "{} y = {}", id, y);
        }
    }

    #[test]
    fn test_cards_stay_contained_after_kicks() {
        let mut engine = ready_engine(9);
        let viewport = Viewport::new(1000.0, 800.0);
        engine.create_boundary(viewport);
        for id in ["one", "two", "three"] {
            engine.create_card_body(id, viewport);
        }

        let mut sink = MapSink::default();
        for frame in 0..240 {
            if frame % 20 == 0 {
                for id in ["one", "two", "three"] {
                    engine.on_hover_enter(id);
                    engine.on_hover_leave(id);
                }
            }
            engine.frame(&mut sink);
        }

        for id in ["one", "two", "three"] {
            let (x, y) = engine.card_position(id).unwrap();
            assert!((-2.0..=22.0).contains(&x));
            assert!((-2.0..=18.0).contains(&y));
        }
    }
}
