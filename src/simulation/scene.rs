//! 初期シーンの配置
//!
//! シード付きの乱数で箱と円をワールド内に配置し、必要なら静的な床を敷きます。
//! 同じシードと設定からは常に同じシーンが生成されます。

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::physics::entity::Entity;
use crate::physics::shape::Shape;
use crate::simulation::Simulation;
use crate::utils::math::Vector2;

/// 初期シーンを配置
///
/// # 引数
///
/// * `simulation` - 配置先のシミュレーション
///
/// # 戻り値
///
/// 生成したエンティティのID（挿入順）
pub fn seed_scene(simulation: &mut Simulation) -> Result<Vec<u32>> {
    let config = simulation.config().clone();
    let width = config.world.width as f32;
    let height = config.world.height as f32;
    let mut rng = SmallRng::seed_from_u64(config.scene.seed);
    let mut ids = Vec::with_capacity(config.scene.boxes + config.scene.circles + 1);

    // 床の上面より下には置かない
    let floor_top = if config.scene.floor {
        config.spawn.box_half_length * 2.0
    } else {
        0.0
    };

    let box_extents = config.spawn.box_shape().half_extents();
    for _ in 0..config.scene.boxes {
        let x = rng.gen_range(0..config.world.width) as f32 * 0.8;
        let y = rng.gen_range(0..config.world.height) as f32 - 200.0;
        let position = clamp_into(Vector2::new(x, y), box_extents, floor_top, width, height);
        ids.push(simulation.spawn_box(position, false)?);
    }

    let circle_extents = config.spawn.circle_shape().half_extents();
    for _ in 0..config.scene.circles {
        let x = rng.gen_range(0..config.world.width) as f32 - 20.0;
        let y = rng.gen_range(0..config.world.height) as f32 - 20.0;
        let position = clamp_into(Vector2::new(x, y), circle_extents, floor_top, width, height);
        ids.push(simulation.spawn_circle(position, false)?);
    }

    if config.scene.floor {
        let shape = Shape::rect(width * 0.5, config.spawn.box_half_length)?;
        let position = Vector2::new(width * 0.5, config.spawn.box_half_length);
        let mut floor = Entity::new(0, shape, position, config.spawn.mass, config.spawn.material)?;
        floor.set_kinematic(true);
        ids.push(simulation.add_entity(floor));
    }

    log::info!("seeded scene with {} entities (seed {})", ids.len(), config.scene.seed);
    Ok(ids)
}

/// 形状がワールドからはみ出さないように位置を制限
fn clamp_into(position: Vector2, half_extents: Vector2, floor_top: f32, width: f32, height: f32) -> Vector2 {
    let x = position.x.min(width - half_extents.x).max(half_extents.x);
    let y = position.y.min(height - half_extents.y).max(floor_top + half_extents.y);
    Vector2::new(x, y)
}
