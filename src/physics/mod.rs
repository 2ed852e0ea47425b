//! 物理システムモジュール
//!
//! このモジュールは、サンドボックス内の剛体シミュレーションを担当します。
//! 衝突形状、物理エンティティ、衝突検出、衝突応答と積分、固定時間ステップ制御を提供します。

pub mod collision;
pub mod dynamics;
pub mod entity;
pub mod shape;
pub mod step;

pub use collision::{detect, Contact, DEFAULT_NORMAL};
pub use dynamics::{CollisionResolver, ForceGenerator, Integrator};
pub use entity::{Entity, Material};
pub use shape::{Aabb, Shape, ShapeKind};
pub use step::{FixedTimestep, LoopState};
