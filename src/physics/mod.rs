//! 物理システムモジュール
//!
//! このモジュールは、ウォールの物理シミュレーションを担当します。
//! 剛体シミュレーション自体は`rapier2d`に任せ、ここではその周りのアダプタ
//! （ワールド、カードとボディの対応表、境界の壁）を提供します。

pub mod boundary;
pub mod registry;
pub mod world;

pub use boundary::{wall_geometry, Boundary, WallGeometry, WallSide};
pub use registry::BodyRegistry;
pub use world::{BodyPose, Bounds, DynamicBoxDesc, PhysicsWorld};

// ハンドル型はダウンストリームでもそのまま使う
pub use rapier2d::prelude::RigidBodyHandle;
