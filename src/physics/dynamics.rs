//! 物理演算モジュール
//!
//! このモジュールは、物理エンティティの動力学をシミュレートします。
//! 1ティックごとの運動積分、入力による力の生成、衝突応答（位置補正と衝撃）を提供します。

use crate::physics::collision::Contact;
use crate::physics::entity::Entity;
use crate::utils::math::Vector2;

/// 衝突解決器
#[derive(Debug, Clone)]
pub struct CollisionResolver {
    /// 位置補正の割合（0-1）
    correction_rate: f32,
    /// 許容する貫通量（これを超えた分だけ補正する）
    penetration_slop: f32,
    /// これ未満の接近速度では跳ね返さない（静止接触）
    resting_speed: f32,
}

impl CollisionResolver {
    /// 新しい衝突解決器を作成
    pub fn new() -> Self {
        Self {
            correction_rate: 1.0,
            penetration_slop: 0.01,
            resting_speed: 1.0,
        }
    }

    /// パラメータをカスタマイズした衝突解決器を作成
    pub fn with_params(correction_rate: f32, penetration_slop: f32, resting_speed: f32) -> Self {
        Self {
            correction_rate: correction_rate.clamp(0.0, 1.0),
            penetration_slop: penetration_slop.max(0.0),
            resting_speed: resting_speed.max(0.0),
        }
    }

    /// 許容貫通量を取得
    pub fn penetration_slop(&self) -> f32 {
        self.penetration_slop
    }

    /// 衝突を解決
    ///
    /// 法線はAからBへ向いている必要があります。
    ///
    /// # 戻り値
    ///
    /// 衝突が処理された場合はtrue（両方キネマティックの場合はfalse）
    pub fn resolve(&self, entity_a: &mut Entity, entity_b: &mut Entity, contact: &Contact) -> bool {
        let inverse_mass_a = entity_a.inverse_mass();
        let inverse_mass_b = entity_b.inverse_mass();
        let inverse_mass_sum = inverse_mass_a + inverse_mass_b;

        // 両方静的なら何もしない
        if inverse_mass_sum <= 0.0 {
            return false;
        }

        let normal = contact.normal;

        // 位置補正（めり込み解消）
        self.correct_position(entity_a, entity_b, contact, inverse_mass_a, inverse_mass_b);

        // 法線方向の相対速度
        let velocity_along_normal = (entity_b.velocity - entity_a.velocity).dot(normal);

        // 静止接触ではなく、実際にぶつかったかどうか
        let impact = velocity_along_normal < -self.resting_speed;

        // 既に離れる方向に動いている場合は衝撃を与えない
        if velocity_along_normal <= 0.0 {
            // 反発係数（2つの物体の反発係数の平均）
            let mut restitution = (entity_a.material.bounciness + entity_b.material.bounciness) * 0.5;

            // 重力だけで押し付けられている場合は跳ね返さない
            if -velocity_along_normal < self.resting_speed {
                restitution = 0.0;
            }

            // 衝撃の大きさ
            let j = -(1.0 + restitution) * velocity_along_normal / inverse_mass_sum;
            let impulse = normal * j;

            if inverse_mass_a > 0.0 {
                entity_a.velocity -= impulse * inverse_mass_a;
            }
            if inverse_mass_b > 0.0 {
                entity_b.velocity += impulse * inverse_mass_b;
            }
        }

        // 形状ごとの見た目の反応
        let kind_a = entity_a.kind();
        let kind_b = entity_b.kind();
        entity_a.on_collision(kind_b, impact);
        entity_b.on_collision(kind_a, impact);

        true
    }

    /// 位置補正（逆質量の比で貫通量を分配）
    fn correct_position(
        &self,
        entity_a: &mut Entity,
        entity_b: &mut Entity,
        contact: &Contact,
        inverse_mass_a: f32,
        inverse_mass_b: f32,
    ) {
        let correction_magnitude = (contact.penetration - self.penetration_slop).max(0.0)
            * self.correction_rate
            / (inverse_mass_a + inverse_mass_b);

        if correction_magnitude <= 0.0 {
            return;
        }

        let correction = contact.normal * correction_magnitude;

        if inverse_mass_a > 0.0 {
            entity_a.position -= correction * inverse_mass_a;
        }
        if inverse_mass_b > 0.0 {
            entity_b.position += correction * inverse_mass_b;
        }
    }
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// 積分器（1ティック = 1単位時間の陰的オイラー法）
#[derive(Debug, Clone)]
pub struct Integrator {
    /// 最大速度（1ティックあたり）
    max_speed: f32,
}

impl Integrator {
    /// 新しい積分器を作成
    pub fn new() -> Self {
        Self { max_speed: 50.0 }
    }

    /// パラメータをカスタマイズした積分器を作成
    pub fn with_max_speed(max_speed: f32) -> Self {
        Self { max_speed }
    }

    /// 最大速度を取得
    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    /// 物理エンティティを1ティック進める
    pub fn integrate(&self, entity: &mut Entity) {
        if entity.is_kinematic() {
            // 静的物体は更新しない
            entity.force = Vector2::ZERO;
            return;
        }

        // F = ma より a = F/m
        let acceleration = entity.force * (1.0 / entity.mass());
        entity.velocity += acceleration;

        // 減衰を適用
        entity.velocity = entity.velocity * (1.0 - entity.material.friction);

        // 速度の大きさを制限
        let speed_squared = entity.velocity.length_squared();
        if speed_squared > self.max_speed * self.max_speed {
            entity.velocity = entity.velocity * (self.max_speed / speed_squared.sqrt());
        }

        if !entity.velocity.is_finite() {
            log::warn!("entity {}: non-finite velocity reset to zero", entity.id);
            entity.velocity = Vector2::ZERO;
        }

        // 静止判定（微小な振動を抑える）
        if entity.velocity.length() < entity.material.deactivation {
            entity.velocity = Vector2::ZERO;
        }

        // 位置を更新
        entity.position += entity.velocity;

        // 力の蓄積をクリア
        entity.force = Vector2::ZERO;
    }
}

impl Default for Integrator {
    fn default() -> Self {
        Self::new()
    }
}

/// 力の生成器
///
/// 入力に応じた力をエンティティに加えます。重力は移動入力に結び付いており、
/// 縦方向の入力がある間だけ働きます。
#[derive(Debug, Clone)]
pub struct ForceGenerator {
    /// 重力定数
    gravity: f32,
    /// 移動入力1単位あたりの力の倍率
    move_force: f32,
}

impl ForceGenerator {
    /// 新しい力の生成器を作成
    pub fn new(gravity: f32, move_force: f32) -> Self {
        Self { gravity, move_force }
    }

    /// 移動入力による力を適用
    ///
    /// # 引数
    ///
    /// * `entity` - 対象エンティティ（キネマティックの場合は無視される）
    /// * `movement` - 入力方向（各軸 -1, 0, 1）
    pub fn apply_movement(&self, entity: &mut Entity, movement: Vector2) {
        if entity.is_kinematic() {
            return;
        }

        let mass = entity.mass();
        let force = Vector2::new(
            movement.x * self.move_force * mass,
            movement.y * self.move_force * -self.gravity * mass,
        );

        entity.apply_force(force);
    }
}
