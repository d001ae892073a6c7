//! ポインター操作への反応
//!
//! ホバー中はカードを強く減衰させてその場に落ち着かせ、
//! ホバーが外れたら減衰を戻して小さな撃力で再び漂わせます。

use rand::Rng;

use crate::config::WallConfig;
use crate::physics::{BodyRegistry, PhysicsWorld};
use crate::utils::random_signed_magnitude;

/// ホバー開始
///
/// 未登録のカードIDでは何もせず`false`を返します。
pub fn on_hover_enter(
    world: &mut PhysicsWorld,
    registry: &BodyRegistry,
    config: &WallConfig,
    card_id: &str,
) -> bool {
    let Some(handle) = registry.get(card_id) else {
        return false;
    };
    world.set_damping(handle, config.hover_damping, config.hover_damping)
}

/// ホバー終了
///
/// 減衰を通常値に戻し、両軸にランダムな撃力を加えます。
/// 撃力は質量に比例させ、単位質量あたりの値（速度の変化）を返します。
pub fn on_hover_leave<R: Rng + ?Sized>(
    world: &mut PhysicsWorld,
    registry: &BodyRegistry,
    config: &WallConfig,
    rng: &mut R,
    card_id: &str,
) -> Option<(f32, f32)> {
    let handle = registry.get(card_id)?;
    if !world.set_damping(handle, config.linear_damping, config.angular_damping) {
        return None;
    }

    let impulse = (
        random_signed_magnitude(rng, config.impulse_min, config.impulse_max),
        random_signed_magnitude(rng, config.impulse_min, config.impulse_max),
    );
    world.apply_velocity_change(handle, impulse);
    Some(impulse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::DynamicBoxDesc;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn setup() -> (PhysicsWorld, BodyRegistry, WallConfig) {
        let config = WallConfig::default();
        let mut world = PhysicsWorld::new(config.timestep);
        let mut registry = BodyRegistry::new();
        let handle = world.insert_dynamic_box(&DynamicBoxDesc {
            center: (10.0, 8.0),
            half_extents: config.card_half_extents(),
            linear_damping: config.linear_damping,
            angular_damping: config.angular_damping,
            restitution: config.restitution,
            friction: config.friction,
        });
        registry.insert("card", handle);
        (world, registry, config)
    }

    #[test]
    fn test_hover_enter_sets_high_damping() {
        let (mut world, registry, config) = setup();
        assert!(on_hover_enter(&mut world, &registry, &config, "card"));
        let handle = registry.get("card").unwrap();
        assert_eq!(world.damping(handle), Some((10.0, 10.0)));
    }

    #[test]
    fn test_enter_leave_restores_defaults() {
        let (mut world, registry, config) = setup();
        let mut rng = SmallRng::seed_from_u64(3);
        let handle = registry.get("card").unwrap();

        for _ in 0..5 {
            on_hover_enter(&mut world, &registry, &config, "card");
            on_hover_enter(&mut world, &registry, &config, "card");
            on_hover_leave(&mut world, &registry, &config, &mut rng, "card");
            assert_eq!(world.damping(handle), Some((0.8, 0.5)));
        }
    }

    #[test]
    fn test_leave_resumes_motion() {
        let (mut world, registry, config) = setup();
        let mut rng = SmallRng::seed_from_u64(5);
        let handle = registry.get("card").unwrap();

        let impulse = on_hover_leave(&mut world, &registry, &config, &mut rng, "card").unwrap();
        assert!(impulse.0.abs() >= config.impulse_min && impulse.0.abs() <= config.impulse_max);
        assert!(impulse.1.abs() >= config.impulse_min && impulse.1.abs() <= config.impulse_max);

        world.step();
        let (vx, vy) = world.linear_velocity(handle).unwrap();
        assert!(vx.abs() > 0.0 && vy.abs() > 0.0);
        assert_eq!(vx.signum(), impulse.0.signum());
    }

    #[test]
    fn test_leave_drifts_visibly() {
        let (mut world, registry, config) = setup();
        let mut rng = SmallRng::seed_from_u64(8);
        let handle = registry.get("card").unwrap();

        on_hover_enter(&mut world, &registry, &config, "card");
        on_hover_leave(&mut world, &registry, &config, &mut rng, "card");
        world.step();
        let (vx, vy) = world.linear_velocity(handle).unwrap();
        assert!(vx.abs() > config.impulse_min * 0.9);
        assert!(vy.abs() > config.impulse_min * 0.9);

        // 10秒後には1単位（50px）以上離れている
        for _ in 0..599 {
            world.step();
        }
        let pose = world.pose(handle).unwrap();
        let drift = ((pose.position.0 - 10.0).powi(2) + (pose.position.1 - 8.0).powi(2)).sqrt();
        assert!(drift > 1.0, "drift = {}", drift);
    }

    #[test]
    fn test_unknown_card_is_noop() {
        let (mut world, registry, config) = setup();
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(!on_hover_enter(&mut world, &registry, &config, "nope"));
        assert!(on_hover_leave(&mut world, &registry, &config, &mut rng, "nope").is_none());
    }
}
